//! Stub ingestion worker: a real HTTP listener recording dispatch payloads.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Dispatch payloads received by the stub worker, in arrival order.
#[derive(Clone, Default)]
pub struct RecordedDispatches {
    payloads: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl RecordedDispatches {
    pub async fn all(&self) -> Vec<serde_json::Value> {
        self.payloads.lock().await.clone()
    }
}

async fn record(
    State(recorded): State<RecordedDispatches>,
    Json(payload): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    recorded.payloads.lock().await.push(payload);
    Json(serde_json::json!({ "accepted": true }))
}

/// Starts a stub worker on an ephemeral port; returns its dispatch URL and
/// the payload recorder.
pub async fn spawn_stub_worker() -> (String, RecordedDispatches) {
    let recorded = RecordedDispatches::default();

    let app = Router::new()
        .route("/ingest", post(record))
        .with_state(recorded.clone());

    let addr = serve_on_ephemeral_port(app).await;
    (format!("http://{}/ingest", addr), recorded)
}

/// Starts a stub worker that rejects every dispatch with a 500.
pub async fn spawn_rejecting_worker() -> String {
    let app = Router::new().route(
        "/ingest",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "worker exploded") }),
    );

    let addr = serve_on_ephemeral_port(app).await;
    format!("http://{}/ingest", addr)
}

async fn serve_on_ephemeral_port(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub worker");
    let addr = listener.local_addr().expect("Failed to read stub worker addr");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Stub worker stopped unexpectedly");
    });

    addr
}
