//! Stub WebDriver remote end for session tests.
//!
//! Serves just enough of the W3C protocol for the scenarios in this crate and
//! records every request it receives.

use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::runtime::Builder;
use tokio::sync::oneshot;

pub const SESSION_ID: &str = "stub-session";
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// One request as the stub saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct Inner {
    requests: Vec<Recorded>,
    current_url: String,
    rome_display_checks: u32,
    stale_display_checks: u32,
    reject_sessions: bool,
}

#[derive(Clone, Default)]
struct StubState(Arc<Mutex<Inner>>);

pub struct WebDriverStub {
    base_url: String,
    state: StubState,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl WebDriverStub {
    pub fn spawn() -> Self {
        let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind stub");
        listener.set_nonblocking(true).expect("nonblocking stub");
        let addr = listener.local_addr().expect("stub addr");

        let state = StubState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let join = thread::spawn(move || {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("stub listener");
                let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });
                let _ = server.await;
            });
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            shutdown: Some(shutdown_tx),
            join: Some(join),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state
            .0
            .lock()
            .map(|inner| inner.requests.clone())
            .unwrap_or_default()
    }

    /// Answer new-session requests with a plain-text 401, as an auth proxy does
    pub fn reject_sessions(&self) {
        if let Ok(mut inner) = self.state.0.lock() {
            inner.reject_sessions = true;
        }
    }

    /// `METHOD /path` lines, for order assertions
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

impl Drop for WebDriverStub {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut inner = state.0.lock().expect("stub state");
    inner.requests.push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        body: body.clone(),
        authorization,
    });

    let session_prefix = format!("/session/{SESSION_ID}");
    if method == Method::POST && path == "/session" {
        if inner.reject_sessions {
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
        return ok(json!({
            "sessionId": SESSION_ID,
            "capabilities": { "browserName": "chrome" },
        }));
    }

    let Some(command) = path.strip_prefix(&session_prefix) else {
        return error(StatusCode::NOT_FOUND, "invalid session id", &path);
    };
    let segments: Vec<&str> = command.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("DELETE", []) => ok(Value::Null),
        ("POST", ["url"]) => {
            inner.current_url = body["url"].as_str().unwrap_or_default().to_string();
            ok(Value::Null)
        }
        ("GET", ["url"]) => ok(Value::from(inner.current_url.clone())),
        ("POST", ["window", "maximize"]) => ok(json!({ "width": 1920, "height": 1080 })),
        ("POST", ["element"]) => {
            let value = body["value"].as_str().unwrap_or_default();
            let id = if value.contains("Nowhere") {
                return error(StatusCode::NOT_FOUND, "no such element", value);
            } else if value.contains("Stale") {
                "stale"
            } else if value.contains("Rome") {
                "rome"
            } else if value.contains("South Korea") {
                "korea"
            } else {
                "body"
            };
            ok(json!({ ELEMENT_KEY: id }))
        }
        ("GET", ["element", id, "displayed"]) => {
            // Rome only becomes visible on the second check
            if *id == "rome" {
                inner.rome_display_checks += 1;
                ok(Value::from(inner.rome_display_checks > 1))
            } else if *id == "stale" {
                // Re-rendered under the first check
                inner.stale_display_checks += 1;
                if inner.stale_display_checks == 1 {
                    return error(StatusCode::NOT_FOUND, "stale element reference", "gone");
                }
                ok(Value::from(true))
            } else {
                ok(Value::from(true))
            }
        }
        ("GET", ["element", _, "enabled"]) => ok(Value::from(true)),
        ("GET", ["element", id, "text"]) => ok(Value::from(format!("text of {id}"))),
        ("POST", ["element", _, "click"]) => ok(Value::Null),
        ("POST", ["element", _, "value"]) => ok(Value::Null),
        ("POST", ["actions"]) | ("DELETE", ["actions"]) => ok(Value::Null),
        _ => error(StatusCode::NOT_FOUND, "unknown command", &path),
    }
}

fn ok(value: Value) -> Response {
    (StatusCode::OK, Json(json!({ "value": value }))).into_response()
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "value": { "error": code, "message": message, "stacktrace": "" } })),
    )
        .into_response()
}
