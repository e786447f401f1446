// crates/lifestyle-risk-server/tests/http_transport.rs
// ============================================================================
// Module: HTTP Transport Tests
// Description: End-to-end webhook calls over a loopback socket.
// Purpose: Validate routing, CORS, body limits, and persistence wiring.
// Dependencies: lifestyle-risk-server, lifestyle-risk-config, tokio, tempfile
// ============================================================================

//! ## Overview
//! Boots the server from configuration with the bundled forest model and a
//! temporary `SQLite` store, then speaks raw HTTP/1.1 to it.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::net::SocketAddr;
use std::path::PathBuf;

use lifestyle_risk_config::RiskConfig;
use lifestyle_risk_config::StoreType;
use lifestyle_risk_core::MessageVariant;
use lifestyle_risk_server::RiskServer;
use lifestyle_risk_store_sqlite::SqlitePredictionStore;
use lifestyle_risk_store_sqlite::SqliteStoreConfig;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const REFERENCE_BODY: &str = r#"{"queryResult":{"parameters":{"Gender":"Male","Age":34,"SleepDuration":7,"PhysicalActivityLevel":45,"StressLevel":3,"BMICategory":"Normal Weight","DailySteps":8000,"Sleep_Disorder":"No Disorder","Food_Habits":"Healthy","Smoking_Status":"Non-smoker"}}}"#;

struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
    store_path: PathBuf,
    _dir: TempDir,
}

impl RunningServer {
    async fn stop(self) -> PathBuf {
        let _ = self.shutdown.send(());
        self.handle.await.expect("server task");
        self.store_path
    }
}

fn test_config(dir: &TempDir) -> RiskConfig {
    let mut config = RiskConfig::default();
    config.model.path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models/lifestyle-risk-forest.json");
    config.responder.variant = MessageVariant::Terse;
    config.store.store_type = StoreType::Sqlite;
    config.store.path = Some(dir.path().join("predictions.sqlite"));
    config.server.max_body_bytes = 2048;
    config
}

async fn start_server() -> RunningServer {
    let dir = TempDir::new().expect("temp dir");
    let config = test_config(&dir);
    let store_path = config.store.path.clone().expect("store path");
    let server = tokio::task::spawn_blocking(move || RiskServer::from_config(config))
        .await
        .expect("init join")
        .expect("server init");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (shutdown, receiver) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .serve_listener(listener, async move {
                let _ = receiver.await;
            })
            .await
            .expect("serve");
    });
    RunningServer {
        addr,
        shutdown,
        handle,
        store_path,
        _dir: dir,
    }
}

async fn send(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(request.as_bytes()).await.expect("write");
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.expect("read");
    String::from_utf8_lossy(&buf).to_string()
}

fn post(path: &str, body: &str) -> String {
    format!(
        "POST {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn get(path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
}

fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or_default()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn predict_over_http_persists_prediction() {
    let server = start_server().await;
    let response = send(server.addr, &post("/predict", REFERENCE_BODY)).await;
    assert!(status_line(&response).contains("200"), "{response}");
    assert!(
        response.ends_with(r#"{"fulfillmentText":"The predicted disease is: Minimal or No Risks"}"#),
        "{response}"
    );
    let store_path = server.stop().await;
    let store = SqlitePredictionStore::new(SqliteStoreConfig::new(store_path)).expect("store");
    let rows = store.list_recent(10).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].disease_name, "Minimal or No Risks");
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_body_still_answers_ok() {
    let server = start_server().await;
    let response = send(server.addr, &post("/predict", "not json")).await;
    assert!(status_line(&response).contains("200"), "{response}");
    assert!(response.contains("Error: Missing or invalid data for field: queryResult"));
    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_body_is_rejected() {
    let server = start_server().await;
    let body = format!(r#"{{"padding":"{}"}}"#, "x".repeat(4096));
    let response = send(server.addr, &post("/predict", &body)).await;
    assert!(status_line(&response).contains("413"), "{response}");
    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn health_endpoints_report_ok() {
    let server = start_server().await;
    let health = send(server.addr, &get("/health")).await;
    assert!(status_line(&health).contains("200"), "{health}");
    assert!(health.ends_with(r#"{"status":"ok"}"#), "{health}");
    let ready = send(server.addr, &get("/ready")).await;
    assert!(status_line(&ready).contains("200"), "{ready}");
    assert!(ready.ends_with(r#"{"status":"ready"}"#), "{ready}");
    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn cors_preflight_allows_agent_origin_only() {
    let server = start_server().await;
    let preflight = |origin: &str| {
        format!(
            "OPTIONS /predict HTTP/1.1\r\nHost: localhost\r\nOrigin: {origin}\r\n\
             Access-Control-Request-Method: POST\r\nConnection: close\r\n\r\n"
        )
    };
    let allowed = send(server.addr, &preflight("https://dialogflow.cloud.google.com")).await;
    assert!(
        allowed
            .to_ascii_lowercase()
            .contains("access-control-allow-origin: https://dialogflow.cloud.google.com"),
        "{allowed}"
    );
    let denied = send(server.addr, &preflight("https://evil.example")).await;
    assert!(!denied.to_ascii_lowercase().contains("access-control-allow-origin"), "{denied}");
    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_route_is_not_found() {
    let server = start_server().await;
    let response = send(server.addr, &get("/webhook")).await;
    assert!(status_line(&response).contains("404"), "{response}");
    server.stop().await;
}
