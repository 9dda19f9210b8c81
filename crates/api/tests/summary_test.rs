//! Router tests for `/summary`, `/health` and request IDs, using stub collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use agent_core::{async_trait, Agent, AgentError, AgentRun, ChatAgent, ChatMessage};
use api::{router, AppState, FixedClock, MAX_BODY_BYTES, REQUEST_ID_HEADER};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use signal_sender::{SendResult, SignalError, SignalSender};
use tower::ServiceExt;
use training_agents::{SummaryDeps, SUMMARY_PROMPT};

struct StubSummaryAgent {
    output: Option<&'static str>,
    calls: AtomicUsize,
    last: Mutex<Option<(String, SummaryDeps)>>,
}

impl StubSummaryAgent {
    fn returning(output: &'static str) -> Arc<Self> {
        Arc::new(Self {
            output: Some(output),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            output: None,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent<SummaryDeps> for StubSummaryAgent {
    async fn run(&self, prompt: &str, deps: &SummaryDeps) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((prompt.to_string(), *deps));
        self.output
            .map(str::to_string)
            .ok_or_else(|| AgentError::Network("model endpoint down at 10.0.0.7".to_string()))
    }

    fn name(&self) -> &str {
        "stub-summary"
    }
}

struct UnusedChatAgent;

#[async_trait]
impl ChatAgent for UnusedChatAgent {
    async fn chat(&self, _prompt: &str, _history: &[ChatMessage]) -> Result<AgentRun, AgentError> {
        Err(AgentError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "unused"
    }
}

struct StubSender {
    result: Result<Option<&'static str>, u16>,
    sent: Mutex<Vec<String>>,
}

impl StubSender {
    fn ok(timestamp: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(timestamp),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            result: Err(status),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignalSender for StubSender {
    async fn send(&self, message: &str) -> Result<SendResult, SignalError> {
        self.sent.lock().unwrap().push(message.to_string());
        match self.result {
            Ok(timestamp) => Ok(SendResult {
                timestamp: timestamp.map(str::to_string),
            }),
            Err(status) => Err(SignalError::Status(status)),
        }
    }
}

fn app(agent: Arc<StubSummaryAgent>, sender: Option<Arc<StubSender>>) -> Router {
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap());
    let state = AppState::new(
        agent,
        Arc::new(UnusedChatAgent),
        sender.map(|s| s as Arc<dyn SignalSender>),
    )
    .with_clock(Arc::new(clock));
    router(state)
}

fn post_summary(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/summary")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_summary_without_signal() {
    let agent = StubSummaryAgent::returning("stub summary");
    let body = json!({"activity_days": 1, "fitness_days": 7, "timezone": "Europe/London"});

    let (status, json) = send(app(agent.clone(), None), post_summary(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "summary": "stub summary",
            "activity_range": {"start": "2025-03-09", "end": "2025-03-09"},
            "fitness_range": {"start": "2025-03-03", "end": "2025-03-09"},
            "sent_signal": false,
            "signal_timestamp": null
        })
    );
    assert_eq!(agent.calls(), 1);
}

#[tokio::test]
async fn test_summary_passes_prompt_and_dates_to_agent() {
    let agent = StubSummaryAgent::returning("stub summary");
    let body = json!({"activity_days": 2, "fitness_days": 14, "timezone": "Europe/London"});

    let (status, _) = send(app(agent.clone(), None), post_summary(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let (prompt, deps) = agent.last.lock().unwrap().clone().unwrap();
    assert_eq!(prompt, SUMMARY_PROMPT);
    assert_eq!(
        deps,
        SummaryDeps {
            activity_start_date: date(2025, 3, 8),
            activity_end_date: date(2025, 3, 9),
            fitness_start_date: date(2025, 2, 24),
            fitness_end_date: date(2025, 3, 9),
        }
    );
}

#[tokio::test]
async fn test_summary_sent_to_signal() {
    let agent = StubSummaryAgent::returning("stub summary");
    let sender = StubSender::ok(Some("abc123"));
    let body = json!({
        "activity_days": 1,
        "fitness_days": 7,
        "send_signal": true,
        "timezone": "Europe/London"
    });

    let (status, json) = send(app(agent, Some(sender.clone())), post_summary(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sent_signal"], true);
    assert_eq!(json["signal_timestamp"], "abc123");
    assert_eq!(json["summary"], "stub summary");
    assert_eq!(sender.sent(), vec!["stub summary".to_string()]);
}

#[tokio::test]
async fn test_signal_without_timestamp_returns_null() {
    let sender = StubSender::ok(None);
    let body = json!({
        "activity_days": 1,
        "fitness_days": 1,
        "send_signal": true,
        "timezone": "UTC"
    });

    let (status, json) = send(
        app(StubSummaryAgent::returning("ok"), Some(sender)),
        post_summary(body.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sent_signal"], true);
    assert_eq!(json["signal_timestamp"], Value::Null);
}

#[tokio::test]
async fn test_signal_requested_but_not_configured() {
    let agent = StubSummaryAgent::returning("stub summary");
    let body = json!({
        "activity_days": 1,
        "fitness_days": 7,
        "send_signal": true,
        "timezone": "Europe/London"
    });

    let (status, json) = send(app(agent.clone(), None), post_summary(body.to_string())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json,
        json!({"code": "signal_error", "message": "Signal API is not configured"})
    );
    assert_eq!(agent.calls(), 0);
}

#[tokio::test]
async fn test_signal_failure_discards_summary() {
    let agent = StubSummaryAgent::returning("secret summary text");
    let sender = StubSender::failing(502);
    let body = json!({
        "activity_days": 1,
        "fitness_days": 7,
        "send_signal": true,
        "timezone": "Europe/London"
    });

    let (status, json) = send(app(agent.clone(), Some(sender.clone())), post_summary(body.to_string())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "signal_error");
    assert_eq!(json["message"], "Signal API returned HTTP 502");
    assert!(json.get("summary").is_none());
    assert!(!json.to_string().contains("secret summary text"));
    assert_eq!(agent.calls(), 1);
    assert_eq!(sender.sent().len(), 1);
}

#[tokio::test]
async fn test_agent_failure_is_summary_error() {
    let agent = StubSummaryAgent::failing();
    let sender = StubSender::ok(Some("never"));
    let body = json!({
        "activity_days": 1,
        "fitness_days": 7,
        "send_signal": true,
        "timezone": "Europe/London"
    });

    let (status, json) = send(app(agent, Some(sender.clone())), post_summary(body.to_string())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json,
        json!({"code": "summary_error", "message": "Summary generation failed"})
    );
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_rejected_before_agent() {
    let agent = StubSummaryAgent::returning("stub summary");

    let (status, json) = send(app(agent.clone(), None), post_summary("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({"code": "validation_error", "message": "Invalid JSON body"})
    );
    assert_eq!(agent.calls(), 0);
}

#[tokio::test]
async fn test_validation_failures() {
    let cases = [
        (
            json!({"activity_days": 0, "fitness_days": 7, "timezone": "Europe/London"}),
            "activity_days: must be between 1 and 30",
        ),
        (
            json!({"activity_days": 1, "fitness_days": 31, "timezone": "Europe/London"}),
            "fitness_days: must be between 1 and 30",
        ),
        (
            json!({"activity_days": 1, "fitness_days": 7, "timezone": "Not/AZone"}),
            "timezone: Unknown timezone: Not/AZone",
        ),
    ];

    for (body, message) in cases {
        let agent = StubSummaryAgent::returning("stub summary");
        let (status, json) = send(app(agent.clone(), None), post_summary(body.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "validation_error");
        assert_eq!(json["message"], message);
        assert_eq!(agent.calls(), 0);
    }
}

#[tokio::test]
async fn test_lax_types_are_coerced() {
    let agent = StubSummaryAgent::returning("stub summary");
    let sender = StubSender::ok(Some("abc123"));
    let body = json!({
        "activity_days": "2",
        "fitness_days": 7.0,
        "send_signal": "true",
        "timezone": "Europe/London"
    });

    let (status, json) = send(app(agent.clone(), Some(sender.clone())), post_summary(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["activity_range"], json!({"start": "2025-03-08", "end": "2025-03-09"}));
    assert_eq!(json["fitness_range"], json!({"start": "2025-03-03", "end": "2025-03-09"}));
    assert_eq!(json["sent_signal"], true);
    assert_eq!(sender.sent().len(), 1);
}

#[tokio::test]
async fn test_oversized_body_gets_json_envelope() {
    let agent = StubSummaryAgent::returning("stub summary");
    let body = format!(
        r#"{{"activity_days": 1, "fitness_days": 7, "timezone": "UTC", "pad": "{}"}}"#,
        "x".repeat(MAX_BODY_BYTES)
    );

    let (status, json) = send(app(agent.clone(), None), post_summary(body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        json,
        json!({"code": "validation_error", "message": "Request body too large"})
    );
    assert_eq!(agent.calls(), 0);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let body = json!({"activity_days": 1, "fitness_days": 1, "timezone": "UTC"}).to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/summary")
        .header(REQUEST_ID_HEADER, "req-42")
        .body(Body::from(body.clone()))
        .unwrap();
    let response = app(StubSummaryAgent::returning("ok"), None)
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");

    let response = app(StubSummaryAgent::returning("ok"), None)
        .oneshot(post_summary(body))
        .await
        .unwrap();
    let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(app(StubSummaryAgent::returning("ok"), None), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "ok"}));
}
