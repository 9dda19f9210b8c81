//! Signal REST gateway client.
//!
//! This crate wraps the gateway's `POST /v2/send` endpoint behind the
//! [`SignalSender`] trait. The HTTP implementation retries exactly once when
//! the gateway answers with a 5xx status and reports every other failure as a
//! [`SignalError`].
//!
//! # Example
//!
//! ```no_run
//! use signal_sender::{HttpSignalSender, SignalConfig, SignalSender};
//!
//! # async fn example() -> Result<(), signal_sender::SignalError> {
//! let config = SignalConfig::new("http://localhost:8080", "+15551234567");
//! let sender = HttpSignalSender::new(config)?;
//!
//! let result = sender.send("Weekly summary ready").await?;
//! println!("Sent at timestamp: {:?}", result.timestamp);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{build_signal_sender, HttpSignalSender, SignalSender};
pub use config::SignalConfig;
pub use error::SignalError;
pub use types::{SendRequest, SendResult};
