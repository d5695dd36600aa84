//! Loopback signaling server for tests
//!
//! Serves the full signaling surface with canned responses, records every
//! call in arrival order together with its session-token header, and can
//! be told to fail specific calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::signaling::SESSION_TOKEN_HEADER;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub path: &'static str,
    pub token: Option<String>,
}

#[derive(Clone)]
struct ServerState {
    addr: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    fail_connect: Arc<AtomicBool>,
    fail_record_start: Arc<AtomicBool>,
}

impl ServerState {
    fn record(&self, path: &'static str, headers: &HeaderMap) {
        let token = headers
            .get(SESSION_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        self.calls.lock().unwrap().push(RecordedCall { path, token });
    }
}

pub(crate) struct TestServer {
    pub addr: String,
    state: ServerState,
}

impl TestServer {
    pub(crate) async fn spawn() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());

        let state = ServerState {
            addr: addr.clone(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_connect: Arc::new(AtomicBool::new(false)),
            fail_record_start: Arc::new(AtomicBool::new(false)),
        };

        let app = Router::new()
            .route("/initialize", post(initialize))
            .route("/transport/connect", post(transport_connect))
            .route("/transport/produce", post(transport_produce))
            .route("/record/start", post(record_start))
            .route("/record/ping", get(record_ping))
            .route("/record/stop", post(record_stop))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, path: &str) -> usize {
        self.calls().iter().filter(|call| call.path == path).count()
    }

    pub(crate) fn fail_connect(&self) {
        self.state.fail_connect.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_record_start(&self) {
        self.state.fail_record_start.store(true, Ordering::SeqCst);
    }

    /// No ping was recorded after the first stop call
    pub(crate) fn no_ping_after_stop(&self) -> bool {
        let mut stopped = false;
        for call in self.calls() {
            match call.path {
                "/record/stop" => stopped = true,
                "/record/ping" if stopped => return false,
                _ => {}
            }
        }
        true
    }
}

async fn initialize(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(_auth): Json<Value>,
) -> Json<Value> {
    state.record("/initialize", &headers);
    Json(json!({
        "fqdn": state.addr,
        "sessionToken": "tok1",
        "routerRtpCapabilities": {
            "codecs": [{ "kind": "audio", "mimeType": "audio/opus" }]
        },
        "transportInfo": {
            "id": "t1",
            "iceServers": [{ "urls": ["stun:stun.example.com:3478"] }],
            "iceTransportPolicy": "relay",
            "iceCandidates": [{ "foundation": "udpcandidate", "protocol": "udp" }],
            "dtlsParameters": { "role": "auto", "fingerprints": [] }
        }
    }))
}

async fn transport_connect(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.record("/transport/connect", &headers);
    if state.fail_connect.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if body.get("dtlsParameters").is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({})))
}

async fn transport_produce(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.record("/transport/produce", &headers);
    if body.get("kind") != Some(&json!("audio")) || body.get("rtpParameters").is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({ "id": "p1-server" })))
}

async fn record_start(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.record("/record/start", &headers);
    if state.fail_record_start.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if body.get("producerId").is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({ "id": "rec1" })))
}

async fn record_ping(State(state): State<ServerState>, headers: HeaderMap) -> StatusCode {
    state.record("/record/ping", &headers);
    StatusCode::OK
}

async fn record_stop(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Json<Value> {
    state.record("/record/stop", &headers);
    Json(json!({}))
}
