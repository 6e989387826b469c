//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use node_bootstrap::NodeConfig;
use tokio::net::TcpListener;

/// A request seen by the mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: String,
}

#[derive(Clone)]
struct MockState {
    responses: Arc<HashMap<String, (u16, Vec<u8>)>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// A mock HTTP server answering from a fixed table; unknown paths get 404.
pub struct MockServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(Recorded {
        method,
        path: path.clone(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    match state.responses.get(&path) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::OK),
            body.clone(),
        ),
        None => (StatusCode::NOT_FOUND, b"not found".to_vec()),
    }
}

/// Start a mock server on an ephemeral port.
pub async fn start_mock_server(responses: &[(&str, u16, &[u8])]) -> MockServer {
    let responses = responses
        .iter()
        .map(|(path, status, body)| (path.to_string(), (*status, body.to_vec())))
        .collect();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        responses: Arc::new(responses),
        requests: requests.clone(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(record).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockServer { addr, requests }
}

/// A default config rooted in `dir` that downloads from `artifacts`.
pub fn test_config(dir: &Path, artifacts: &MockServer) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.workspace.path = dir.to_path_buf();
    config.artifacts.url_template = format!("{}/{{arch}}/{{file}}", artifacts.url());
    config.artifacts.timeout_secs = 5;
    config.control.timeout_secs = 5;
    config
}
