//! HTTP gateway for the training assistant.
//!
//! Routes:
//! - `GET /health`
//! - `POST /summary`: activity and fitness summary for recent days, optionally sent to Signal
//! - `POST /chat`: one turn with the training agent
//!
//! Every response carries an `x-request-id` header, taken from the request
//! when present.

pub mod dates;
pub mod error;
pub mod request_id;
pub mod routes;
pub mod state;

pub use dates::{compute_date_range, Clock, DateRange, FixedClock, InvalidTimezone, SystemClock};
pub use error::{ApiError, ValidationError};
pub use request_id::REQUEST_ID_HEADER;
pub use routes::{router, MAX_BODY_BYTES};
pub use state::AppState;
