//! `POST /summary`: date-bounded activity and fitness summary, optionally relayed to Signal.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use training_agents::{SummaryDeps, SUMMARY_PROMPT};

use crate::dates::{parse_timezone, DateRange};
use crate::error::{ApiError, ValidationError};
use crate::state::AppState;

/// Smallest accepted day count.
pub const MIN_DAYS: i64 = 1;
/// Largest accepted day count.
pub const MAX_DAYS: i64 = 30;

/// A validated summary request.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    pub activity_days: u32,
    pub fitness_days: u32,
    pub send_signal: bool,
    pub timezone: Tz,
}

impl SummaryRequest {
    /// Validate a decoded body, stopping at the first failing field.
    ///
    /// Fields are checked in order: `activity_days`, `fitness_days`,
    /// `send_signal`, `timezone`. Unknown fields are ignored. Day counts and
    /// the flag are coerced from numbers and strings the way a lax-mode
    /// pydantic model would.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::body("Request body must be a JSON object"))?;

        let activity_days = day_count(object, "activity_days")?;
        let fitness_days = day_count(object, "fitness_days")?;

        let send_signal = match object.get("send_signal") {
            None => false,
            Some(value) => {
                coerce_bool(value).ok_or_else(|| ValidationError::field("send_signal", "must be a boolean"))?
            }
        };

        let timezone = match object.get("timezone") {
            None => return Err(ValidationError::field("timezone", "field required")),
            Some(Value::String(name)) => parse_timezone(name)
                .map_err(|e| ValidationError::field("timezone", e.to_string()))?,
            Some(_) => return Err(ValidationError::field("timezone", "must be a string")),
        };

        Ok(Self {
            activity_days,
            fitness_days,
            send_signal,
            timezone,
        })
    }
}

fn day_count(object: &Map<String, Value>, field: &'static str) -> Result<u32, ValidationError> {
    let value = object
        .get(field)
        .ok_or_else(|| ValidationError::field(field, "field required"))?;
    let days = coerce_int(value).ok_or_else(|| ValidationError::field(field, "must be an integer"))?;
    if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
        return Err(ValidationError::field(
            field,
            format!("must be between {} and {}", MIN_DAYS, MAX_DAYS),
        ));
    }
    u32::try_from(days).map_err(|_| ValidationError::field(field, "must be an integer"))
}

/// Integers, integral floats and numeric strings.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(integral)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(number: f64) -> Option<i64> {
    (number.is_finite() && number.fract() == 0.0 && number.abs() < i64::MAX as f64)
        .then_some(number as i64)
}

/// Booleans, the numbers 0 and 1, and the usual yes/no spellings.
fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 0.0 => Some(false),
            Some(n) if n == 1.0 => Some(true),
            _ => None,
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "on" | "t" | "true" | "y" | "yes" => Some(true),
            "0" | "off" | "f" | "false" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Successful summary response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub activity_range: DateRange,
    pub fitness_range: DateRange,
    pub sent_signal: bool,
    pub signal_timestamp: Option<String>,
}

/// Summary endpoint.
pub async fn summary(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    handle_summary(&state, &body?).await.map(Json)
}

async fn handle_summary(state: &AppState, body: &[u8]) -> Result<SummaryResponse, ApiError> {
    info!(bytes = body.len(), "Summary request received");

    let value: Value = serde_json::from_slice(body).map_err(ApiError::MalformedBody)?;
    let request = SummaryRequest::from_value(&value)?;
    debug!(
        activity_days = request.activity_days,
        fitness_days = request.fitness_days,
        send_signal = request.send_signal,
        timezone = request.timezone.name(),
        "Summary request validated"
    );

    let now = state.clock.now();
    let activity_range = DateRange::ending_yesterday(request.activity_days, request.timezone, now);
    let fitness_range = DateRange::ending_yesterday(request.fitness_days, request.timezone, now);

    // Checked before the agent runs so an unconfigured sender costs no model call.
    let signal_sender = if request.send_signal {
        Some(
            state
                .signal_sender
                .clone()
                .ok_or(ApiError::SignalNotConfigured)?,
        )
    } else {
        None
    };

    let deps = SummaryDeps {
        activity_start_date: activity_range.start,
        activity_end_date: activity_range.end,
        fitness_start_date: fitness_range.start,
        fitness_end_date: fitness_range.end,
    };

    let started = Instant::now();
    let summary = state
        .summary_agent
        .run(SUMMARY_PROMPT, &deps)
        .await
        .map_err(ApiError::Summary)?;
    info!(
        agent = state.summary_agent.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        chars = summary.len(),
        "Summary generated"
    );

    let signal_timestamp = match signal_sender {
        Some(sender) => {
            let started = Instant::now();
            let result = sender.send(&summary).await?;
            info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                timestamp = ?result.timestamp,
                "Summary sent to Signal"
            );
            result.timestamp
        }
        None => None,
    };

    Ok(SummaryResponse {
        summary,
        activity_range,
        fitness_range,
        sent_signal: request.send_signal,
        signal_timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "activity_days": 1,
            "fitness_days": 7,
            "timezone": "Europe/London"
        })
    }

    #[test]
    fn test_valid_request_defaults_send_signal() {
        let request = SummaryRequest::from_value(&valid()).unwrap();
        assert_eq!(request.activity_days, 1);
        assert_eq!(request.fitness_days, 7);
        assert!(!request.send_signal);
        assert_eq!(request.timezone, chrono_tz::Europe::London);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut body = valid();
        body["activity_days"] = json!(30);
        body["fitness_days"] = json!(1);
        assert!(SummaryRequest::from_value(&body).is_ok());
    }

    #[test]
    fn test_rejects_zero_activity_days() {
        let mut body = valid();
        body["activity_days"] = json!(0);
        let err = SummaryRequest::from_value(&body).unwrap_err();
        assert_eq!(err.field, Some("activity_days"));
        assert_eq!(err.message, "must be between 1 and 30");
    }

    #[test]
    fn test_rejects_thirty_one_fitness_days() {
        let mut body = valid();
        body["fitness_days"] = json!(31);
        let err = SummaryRequest::from_value(&body).unwrap_err();
        assert_eq!(err.field, Some("fitness_days"));
    }

    #[test]
    fn test_rejects_unknown_timezone() {
        let mut body = valid();
        body["timezone"] = json!("Not/AZone");
        let err = SummaryRequest::from_value(&body).unwrap_err();
        assert_eq!(err.field, Some("timezone"));
        assert_eq!(err.message, "Unknown timezone: Not/AZone");
    }

    #[test]
    fn test_reports_first_failure_only() {
        let body = json!({
            "activity_days": 0,
            "fitness_days": 99,
            "timezone": "Not/AZone"
        });
        let err = SummaryRequest::from_value(&body).unwrap_err();
        assert_eq!(err.field, Some("activity_days"));
    }

    #[test]
    fn test_rejects_wrong_types() {
        for days in [json!("seven"), json!(7.5), json!(true), json!(null), json!([7])] {
            let mut body = valid();
            body["activity_days"] = days;
            let err = SummaryRequest::from_value(&body).unwrap_err();
            assert_eq!(err.field, Some("activity_days"));
            assert_eq!(err.message, "must be an integer");
        }

        for flag in [json!("maybe"), json!(2), json!({}), json!(null)] {
            let mut body = valid();
            body["send_signal"] = flag;
            let err = SummaryRequest::from_value(&body).unwrap_err();
            assert_eq!(err.field, Some("send_signal"));
            assert_eq!(err.message, "must be a boolean");
        }
    }

    #[test]
    fn test_day_counts_are_coerced() {
        let mut body = valid();
        body["activity_days"] = json!("7");
        body["fitness_days"] = json!(14.0);
        let request = SummaryRequest::from_value(&body).unwrap();
        assert_eq!(request.activity_days, 7);
        assert_eq!(request.fitness_days, 14);

        let mut body = valid();
        body["activity_days"] = json!(" 3 ");
        assert_eq!(SummaryRequest::from_value(&body).unwrap().activity_days, 3);
    }

    #[test]
    fn test_coerced_day_counts_are_range_checked() {
        let mut body = valid();
        body["activity_days"] = json!("31");
        let err = SummaryRequest::from_value(&body).unwrap_err();
        assert_eq!(err.field, Some("activity_days"));
        assert_eq!(err.message, "must be between 1 and 30");

        let mut body = valid();
        body["fitness_days"] = json!(0.0);
        let err = SummaryRequest::from_value(&body).unwrap_err();
        assert_eq!(err.field, Some("fitness_days"));
        assert_eq!(err.message, "must be between 1 and 30");
    }

    #[test]
    fn test_send_signal_is_coerced() {
        let cases = [
            (json!("true"), true),
            (json!("YES"), true),
            (json!("on"), true),
            (json!("t"), true),
            (json!("y"), true),
            (json!("1"), true),
            (json!(1), true),
            (json!("False"), false),
            (json!("no"), false),
            (json!("off"), false),
            (json!("f"), false),
            (json!("n"), false),
            (json!("0"), false),
            (json!(0), false),
        ];
        for (flag, expected) in cases {
            let mut body = valid();
            body["send_signal"] = flag.clone();
            let request = SummaryRequest::from_value(&body).unwrap();
            assert_eq!(request.send_signal, expected, "send_signal = {}", flag);
        }
    }

    #[test]
    fn test_rejects_missing_fields_and_non_objects() {
        let err = SummaryRequest::from_value(&json!({"activity_days": 3})).unwrap_err();
        assert_eq!(err.field, Some("fitness_days"));
        assert_eq!(err.message, "field required");

        let err = SummaryRequest::from_value(&json!([1, 2])).unwrap_err();
        assert_eq!(err.field, None);
    }
}
