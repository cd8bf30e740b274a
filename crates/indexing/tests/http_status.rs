//! Poller against a stub status endpoint over real HTTP

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use peex_common::IndexingConfig;
use peex_indexing::{CorrelationId, IndexingError, IndexingWaiter};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct StubState {
    calls: Arc<AtomicU32>,
    api_keys: Arc<Mutex<Vec<Option<String>>>>,
}

/// Task "ok" publishes on the third poll, "stuck" never does, "broken" errors
async fn task_status(
    State(state): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let call = state.calls.fetch_add(1, Ordering::SeqCst) + 1;
    if let Ok(mut keys) = state.api_keys.lock() {
        keys.push(
            headers
                .get("x-peex-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );
    }

    match id.as_str() {
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "indexer unavailable" })),
        ),
        "ok" if call >= 3 => (
            StatusCode::OK,
            Json(json!({ "entries": [
                { "name": "candidates", "status": "published" },
                { "name": "candidates_geo", "status": "published" },
            ]})),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({ "entries": [
                { "name": "candidates", "status": "published" },
                { "name": "candidates_geo", "status": "notPublished" },
            ]})),
        ),
    }
}

async fn spawn_stub() -> (String, StubState) {
    let state = StubState::default();
    let app = Router::new()
        .route("/1/tasks/:id", get(task_status))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

fn config(base_url: String) -> IndexingConfig {
    IndexingConfig {
        base_url,
        api_key: Some("search-key".to_string()),
        max_attempts: 4,
        interval_ms: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn waits_until_every_index_is_published() {
    let (base_url, state) = spawn_stub().await;
    let waiter = IndexingWaiter::from_config(&config(base_url)).unwrap();

    let attempt = waiter.wait_for(&CorrelationId::new("ok")).await.unwrap();
    assert_eq!(attempt, 3);
    assert_eq!(state.calls.load(Ordering::SeqCst), 3);

    let keys = state.api_keys.lock().unwrap().clone();
    assert!(keys.iter().all(|k| k.as_deref() == Some("search-key")));
}

#[tokio::test]
async fn gives_up_with_last_response() {
    let (base_url, state) = spawn_stub().await;
    let waiter = IndexingWaiter::from_config(&config(base_url)).unwrap();

    let err = waiter
        .wait_for(&CorrelationId::new("stuck"))
        .await
        .unwrap_err();
    match err {
        IndexingError::NotIndexed {
            attempts,
            last_response,
            ..
        } => {
            assert_eq!(attempts, 4);
            assert!(last_response.contains("notPublished"));
        }
        other => panic!("expected NotIndexed, got {other:?}"),
    }
    assert_eq!(state.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn endpoint_errors_are_not_retried() {
    let (base_url, state) = spawn_stub().await;
    let waiter = IndexingWaiter::from_config(&config(base_url)).unwrap();

    let err = waiter
        .wait_for(&CorrelationId::new("broken"))
        .await
        .unwrap_err();
    assert!(matches!(err, IndexingError::Status { status: 500, .. }));
    assert_eq!(state.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn wraps_a_write() {
    let (base_url, _state) = spawn_stub().await;
    let waiter = IndexingWaiter::from_config(&IndexingConfig {
        correlation_field: "task".to_string(),
        ..config(base_url)
    })
    .unwrap();

    let response = waiter
        .after(|| async { Ok::<_, std::io::Error>(json!({ "task": "ok", "uuid": "c-1" })) })
        .await
        .unwrap();
    assert_eq!(response["uuid"], "c-1");
}
