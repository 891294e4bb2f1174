//! Mock `generateContent` backend for integration tests
//!
//! Serves queued canned responses and records every request it receives

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Router, routing};
use tokio_util::sync::CancellationToken;

/// Request as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path segment after `/models/`, e.g. `gemini-3-pro-preview:generateContent`
    pub model_action: String,
    /// Value of the `key` query parameter
    pub api_key: Option<String>,
    /// Raw request body
    pub body: String,
}

impl RecordedRequest {
    /// Body parsed as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// Mock Gemini backend
pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    responses: Mutex<VecDeque<(StatusCode, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Option<Duration>,
}

impl MockGemini {
    /// Start a mock with no queued responses
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(None).await
    }

    /// Start a mock that waits `delay` before answering
    pub async fn start_delayed(delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(Some(delay)).await
    }

    async fn start_inner(delay: Option<Duration>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            delay,
            ..MockState::default()
        });

        let app = Router::new()
            .route("/v1beta/models/{model_action}", routing::post(handle_generate))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL including the API version segment
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Queue a 200 response with a JSON body
    pub fn push_json(&self, body: &serde_json::Value) {
        self.push_raw(StatusCode::OK, body.to_string());
    }

    /// Queue an arbitrary response
    pub fn push_raw(&self, status: StatusCode, body: impl Into<String>) {
        self.state
            .responses
            .lock()
            .expect("mock lock poisoned")
            .push_back((status, body.into()));
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("mock lock poisoned").clone()
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(
    State(state): State<Arc<MockState>>,
    Path(model_action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse {
    state.requests.lock().expect("mock lock poisoned").push(RecordedRequest {
        model_action,
        api_key: query.get("key").cloned(),
        body,
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let (status, body) = state
        .responses
        .lock()
        .expect("mock lock poisoned")
        .pop_front()
        .unwrap_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"error":{"code":500,"message":"no canned response","status":"INTERNAL"}}"#.to_owned(),
            )
        });

    (status, [("content-type", "application/json")], body)
}
