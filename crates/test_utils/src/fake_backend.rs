//! Fake Claims and Support Backends
//!
//! An in-process `axum` server bound to `127.0.0.1:0` that answers the
//! routes the HTTP adapters call. Replies are scripted per request line
//! (`METHOD /path?query`); anything unscripted gets an empty 404. Every
//! request is recorded with its headers and JSON body.
//!
//! ```rust,ignore
//! let backend = FakeBackend::start().await;
//! backend.with_claim(42, json!({"players": []})).await;
//! let adapter = ClaimsApiAdapter::new(client, ExternalSystemConfig::new(backend.base_url()));
//! ```

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

pub use axum::http::Method;

/// Path of the batched legacy reprocessing endpoint
pub const LEGACY_REPROCESS_PATH: &str = "/claims/actions/deadline/reprocess";

/// A scripted HTTP reply
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    /// A reply whose body is sent verbatim
    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::raw(status, "")
    }
}

/// A request received by the fake backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[derive(Default)]
struct FakeState {
    replies: RwLock<HashMap<String, Reply>>,
    requests: RwLock<Vec<RecordedRequest>>,
    delay: RwLock<Option<Duration>>,
}

/// Running fake backend; the server stops when this is dropped
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<FakeState>,
    server: JoinHandle<()>,
}

impl FakeBackend {
    /// Binds an ephemeral port and starts serving
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Failed to read fake backend address");

        let server = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "Fake backend stopped");
            }
        });

        Self { addr, state, server }
    }

    /// Base URL to configure adapters with
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Scripts the reply to `METHOD path` (path may carry a query string)
    pub async fn respond(&self, method: Method, path_and_query: &str, reply: Reply) {
        self.state
            .replies
            .write()
            .await
            .insert(route_key(&method, path_and_query), reply);
    }

    /// Delays every reply
    pub async fn set_delay(&self, delay: Duration) {
        *self.state.delay.write().await = Some(delay);
    }

    /// Claim detail served by `GET /v1/claims/{id}`
    pub async fn with_claim(&self, id: u64, body: Value) {
        self.respond(Method::GET, &format!("/v1/claims/{}", id), Reply::json(200, body))
            .await;
    }

    /// Marks the claim as current generation (`GET /v1/claims/{id}/state` answers 200)
    pub async fn with_current_state(&self, id: u64) {
        self.respond(
            Method::GET,
            &format!("/v1/claims/{}/state", id),
            Reply::json(200, json!({ "status": "opened" })),
        )
        .await;
    }

    /// Support cases served by `GET /cx/cases/search/v2?claim_id={id}`
    pub async fn with_cases(&self, id: u64, statuses: &[&str]) {
        let results: Vec<Value> = statuses.iter().map(|s| json!({ "status": s })).collect();
        self.respond(
            Method::GET,
            &format!("/cx/cases/search/v2?claim_id={}", id),
            Reply::json(200, json!({ "results": results })),
        )
        .await;
    }

    /// Reply of the batched legacy reprocessing endpoint
    pub async fn with_legacy_reprocess(&self, reply: Reply) {
        self.respond(Method::POST, LEGACY_REPROCESS_PATH, reply).await;
    }

    /// Reply of the per-claim current reprocessing endpoint
    pub async fn with_current_process(&self, id: u64, reply: Reply) {
        self.respond(
            Method::POST,
            &format!("/post-purchase/state/deadline/process-claim/{}", id),
            reply,
        )
        .await;
    }

    /// Every request received so far, in arrival order
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.read().await.clone()
    }

    /// Requests received on one path
    pub async fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn route_key(method: &Method, path_and_query: &str) -> String {
    format!("{} {}", method, path_and_query)
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    state.requests.write().await.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
        body: serde_json::from_slice(&body).ok(),
    });

    let delay = *state.delay.read().await;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let reply = {
        let replies = state.replies.read().await;
        replies
            .get(&route_key(&method, &path_and_query))
            .or_else(|| replies.get(&route_key(&method, uri.path())))
            .cloned()
    };

    match reply {
        Some(reply) => {
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
