//! Wire types for the gateway's send endpoint.

use serde::Serialize;
use serde_json::Value;

/// Body of `POST /v2/send`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SendRequest {
    /// The message text.
    pub message: String,
    /// Account to send from.
    pub number: String,
    /// Recipients (phone numbers).
    pub recipients: Vec<String>,
}

impl SendRequest {
    /// A message the account sends to itself.
    pub fn note_to_self(number: impl Into<String>, message: impl Into<String>) -> Self {
        let number = number.into();
        Self {
            message: message.into(),
            recipients: vec![number.clone()],
            number,
        }
    }
}

/// Result of a successful send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendResult {
    /// Gateway timestamp of the sent message, when it reported one.
    pub timestamp: Option<String>,
}

impl SendResult {
    /// Extract the timestamp from a 201 response body.
    ///
    /// Strings are kept as-is, numbers and booleans are stringified. Anything
    /// else, including an unparsable body, yields no timestamp.
    pub fn from_body(body: &[u8]) -> Self {
        let timestamp = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| match value.get("timestamp") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Bool(b)) => Some(b.to_string()),
                _ => None,
            });
        Self { timestamp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_note_to_self_serializes_expected_shape() {
        let request = SendRequest::note_to_self("+1234567890", "Hello");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "message": "Hello",
                "number": "+1234567890",
                "recipients": ["+1234567890"],
            })
        );
    }

    #[test]
    fn test_timestamp_from_string_and_number() {
        let result = SendResult::from_body(br#"{"timestamp":"1712345678901"}"#);
        assert_eq!(result.timestamp.as_deref(), Some("1712345678901"));

        let result = SendResult::from_body(br#"{"timestamp":1712345678901}"#);
        assert_eq!(result.timestamp.as_deref(), Some("1712345678901"));
    }

    #[test]
    fn test_timestamp_missing_or_unparsable() {
        assert_eq!(SendResult::from_body(b"").timestamp, None);
        assert_eq!(SendResult::from_body(b"not json").timestamp, None);
        assert_eq!(SendResult::from_body(br#"{"other":1}"#).timestamp, None);
        assert_eq!(SendResult::from_body(br#"{"timestamp":null}"#).timestamp, None);
        assert_eq!(SendResult::from_body(br#"[1,2,3]"#).timestamp, None);
    }
}
