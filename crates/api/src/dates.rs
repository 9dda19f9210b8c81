//! Date-range arithmetic for summary requests.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The timezone name is not in the tz database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown timezone: {0}")]
pub struct InvalidTimezone(pub String);

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// `days` full days ending yesterday in `tz`, as seen at `now`.
    ///
    /// `days` must be at least 1.
    pub fn ending_yesterday(days: u32, tz: Tz, now: DateTime<Utc>) -> Self {
        let today = now.with_timezone(&tz).date_naive();
        let end = today - Days::new(1);
        let start = end - Days::new(u64::from(days.saturating_sub(1)));
        Self { start, end }
    }
}

/// Resolve an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz, InvalidTimezone> {
    name.parse::<Tz>()
        .map_err(|_| InvalidTimezone(name.to_string()))
}

/// Range of `days` days ending yesterday in `timezone`, according to `clock`.
pub fn compute_date_range(
    days: u32,
    timezone: &str,
    clock: &dyn Clock,
) -> Result<DateRange, InvalidTimezone> {
    let tz = parse_timezone(timezone)?;
    Ok(DateRange::ending_yesterday(days, tz, clock.now()))
}
