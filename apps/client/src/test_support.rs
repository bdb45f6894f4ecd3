//! In-process stand-in for the profile/autofill backend, used by unit tests.
//!
//! Serves the three endpoints the client depends on and records every request
//! so tests can count calls and inspect multipart parts.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::Notify;

pub const TEST_TOKEN: &str = "test-session-token";

/// Canned responses. `submit_gate`, when set, holds the `/submit/` response
/// until the test calls `notify_one` on it.
#[derive(Clone)]
pub struct StubConfig {
    pub profile: (StatusCode, String),
    pub save: StatusCode,
    pub submit: (StatusCode, String),
    pub submit_gate: Option<Arc<Notify>>,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            profile: (StatusCode::OK, "{}".to_string()),
            save: StatusCode::OK,
            submit: (
                StatusCode::OK,
                json!({ "status": "started", "job_id": "job-1" }).to_string(),
            ),
            submit_gate: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordedSubmission {
    pub form_url: Option<String>,
    pub json_file: Option<Value>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub authorization: Vec<String>,
    pub profile_gets: usize,
    pub profile_posts: Vec<Value>,
    pub submissions: Vec<RecordedSubmission>,
}

impl Recorded {
    pub fn total_requests(&self) -> usize {
        self.profile_gets + self.profile_posts.len() + self.submissions.len()
    }
}

struct Stub {
    config: StubConfig,
    recorded: Mutex<Recorded>,
}

impl Stub {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.recorded.lock().unwrap().authorization.push(value);
    }
}

pub struct StubBackend {
    pub base_url: String,
    stub: Arc<Stub>,
}

impl StubBackend {
    pub fn recorded(&self) -> Recorded {
        self.stub.recorded.lock().unwrap().clone()
    }

    /// Polls until `done` holds, failing the test after about two seconds.
    pub async fn wait_until(&self, done: impl Fn(&Recorded) -> bool) {
        for _ in 0..200 {
            if done(&self.recorded()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("stub backend never reached the expected state");
    }
}

pub async fn spawn_backend(config: StubConfig) -> StubBackend {
    let stub = Arc::new(Stub {
        config,
        recorded: Mutex::new(Recorded::default()),
    });

    let app = Router::new()
        .route("/profile", get(get_profile).post(post_profile))
        .route("/submit/", post(submit))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubBackend {
        base_url: format!("http://{addr}"),
        stub,
    }
}

async fn get_profile(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> (StatusCode, String) {
    stub.record_auth(&headers);
    stub.recorded.lock().unwrap().profile_gets += 1;
    stub.config.profile.clone()
}

async fn post_profile(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    stub.record_auth(&headers);
    stub.recorded.lock().unwrap().profile_posts.push(body);
    stub.config.save
}

async fn submit(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    stub.record_auth(&headers);

    let mut submission = RecordedSubmission::default();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let text = field.text().await.unwrap_or_default();

        match name.as_str() {
            "form_url" => submission.form_url = Some(text),
            "json_file" => {
                submission.file_name = file_name;
                submission.content_type = content_type;
                submission.json_file = serde_json::from_str(&text).ok();
            }
            _ => {}
        }
    }
    stub.recorded.lock().unwrap().submissions.push(submission);

    if let Some(gate) = &stub.config.submit_gate {
        gate.notified().await;
    }

    stub.config.submit.clone()
}
