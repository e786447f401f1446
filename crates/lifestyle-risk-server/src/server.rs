// crates/lifestyle-risk-server/src/server.rs
// ============================================================================
// Module: Webhook Server
// Description: HTTP transport for the lifestyle risk webhook.
// Purpose: Accept agent fulfillment calls and return fulfillment text.
// Dependencies: axum, tokio, tower-http, tracing, lifestyle-risk-*
// ============================================================================

//! ## Overview
//! The server exposes `POST /predict` for the conversational agent plus
//! `GET /health` and `GET /ready` checks. Prediction work runs on the blocking
//! pool because the classifier and the `SQLite` store are synchronous. Every
//! webhook call answers `200` with a `fulfillmentText` body; failures are
//! expressed in the text, never in the status code.
//! Security posture: request bodies are untrusted, size-limited, and never
//! logged verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use lifestyle_risk_config::RiskConfig;
use lifestyle_risk_config::ServerConfig;
use lifestyle_risk_core::PipelineOutcome;
use lifestyle_risk_core::PipelineReport;
use lifestyle_risk_core::PredictionPipeline;
use lifestyle_risk_core::PredictionStore;
use lifestyle_risk_core::StoreOutcome;
use lifestyle_risk_core::runtime::format_model_unavailable;
use lifestyle_risk_model::ForestModel;
use lifestyle_risk_store_sqlite::SqlitePredictionStore;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::clock::SystemClock;
use crate::telemetry::NoopMetrics;
use crate::telemetry::WebhookMetricEvent;
use crate::telemetry::WebhookMetrics;
use crate::telemetry::WebhookOutcome;


// ============================================================================
// SECTION: Errors
// ============================================================================

/// Webhook server errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum RiskServerError {
    /// Server configuration could not be applied.
    #[error("server config error: {0}")]
    Config(String),
    /// Model or store initialization failed.
    #[error("server init error: {0}")]
    Init(String),
    /// Listener or transport failure.
    #[error("server io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared request-handling state.
///
/// # Invariants
/// - The pipeline's classifier and store are shared immutably across requests.
pub struct ServerState {
    /// Prediction pipeline.
    pipeline: PredictionPipeline,
    /// Metrics sink.
    metrics: Arc<dyn WebhookMetrics>,
}

impl ServerState {
    /// Builds request state from a pipeline and metrics sink.
    #[must_use]
    pub fn new(pipeline: PredictionPipeline, metrics: Arc<dyn WebhookMetrics>) -> Self {
        Self {
            pipeline,
            metrics,
        }
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Configured webhook server.
pub struct RiskServer {
    /// Transport settings.
    config: ServerConfig,
    /// Shared request state.
    state: Arc<ServerState>,
}

impl RiskServer {
    /// Loads the model and store named by `config` and builds the server.
    ///
    /// Performs blocking file and database I/O.
    ///
    /// # Errors
    ///
    /// Returns [`RiskServerError::Init`] when the model or store cannot be opened.
    pub fn from_config(config: RiskConfig) -> Result<Self, RiskServerError> {
        config.validate().map_err(|err| RiskServerError::Config(err.to_string()))?;
        let model = ForestModel::load(&config.model.path)
            .map_err(|err| RiskServerError::Init(err.to_string()))?;
        info!(
            model = %config.model.path.display(),
            trees = model.tree_count(),
            classes = model.classes().len(),
            "model loaded"
        );
        let mut pipeline = PredictionPipeline::new(Arc::new(model), Arc::new(SystemClock))
            .with_variant(config.responder.variant);
        if let Some(sqlite) = config.store.sqlite() {
            let path = sqlite.path.display().to_string();
            let store = SqlitePredictionStore::new(sqlite)
                .map_err(|err| RiskServerError::Init(err.to_string()))?;
            info!(store = %path, "prediction store opened");
            pipeline = pipeline.with_store(Arc::new(store));
        }
        Ok(Self::new(config.server, ServerState::new(pipeline, Arc::new(NoopMetrics))))
    }

    /// Builds a server from prepared state.
    #[must_use]
    pub fn new(config: ServerConfig, state: ServerState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// Builds the HTTP router.
    ///
    /// # Errors
    ///
    /// Returns [`RiskServerError::Config`] when a CORS origin is not a valid header value.
    pub fn router(&self) -> Result<Router, RiskServerError> {
        build_router(Arc::clone(&self.state), &self.config)
    }

    /// Binds the configured address and serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns [`RiskServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), RiskServerError> {
        let addr: SocketAddr = self
            .config
            .bind
            .parse()
            .map_err(|_| RiskServerError::Config(format!("invalid bind address: {}", self.config.bind)))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| RiskServerError::Io(format!("bind {addr}: {err}")))?;
        self.serve_listener(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`RiskServerError`] when the router cannot be built or serving fails.
    pub async fn serve_listener(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RiskServerError> {
        let router = self.router()?;
        let local = listener.local_addr().map_err(|err| RiskServerError::Io(err.to_string()))?;
        info!(bind = %local, "webhook server listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| RiskServerError::Io(err.to_string()))?;
        info!("webhook server stopped");
        Ok(())
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the webhook router with body limits and CORS.
///
/// # Errors
///
/// Returns [`RiskServerError::Config`] when a CORS origin is not a valid header value.
pub fn build_router(
    state: Arc<ServerState>,
    config: &ServerConfig,
) -> Result<Router, RiskServerError> {
    let cors = build_cors(&config.cors_allowed_origins)?;
    Ok(Router::new()
        .route("/predict", post(handle_predict))
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .with_state(state))
}

/// Builds the CORS layer for the configured origins.
fn build_cors(origins: &[String]) -> Result<CorsLayer, RiskServerError> {
    let mut values = Vec::with_capacity(origins.len());
    for origin in origins {
        let value = HeaderValue::from_str(origin)
            .map_err(|_| RiskServerError::Config(format!("invalid cors origin: {origin}")))?;
        values.push(value);
    }
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(values))
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles a webhook fulfillment call.
pub(crate) async fn handle_predict(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let request_bytes = body.len();
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let pipeline = state.pipeline.clone();
    let joined = tokio::task::spawn_blocking(move || pipeline.respond_payload(&payload)).await;
    let (message, mut event) = match joined {
        Ok(report) => {
            log_report(&report);
            let event = WebhookMetricEvent {
                outcome: WebhookOutcome::from(&report.outcome),
                error_kind: match &report.outcome {
                    PipelineOutcome::FieldError {
                        error_kind, ..
                    } => Some(*error_kind),
                    _ => None,
                },
                store: Some(report.store.as_str()),
                request_bytes,
                response_bytes: 0,
            };
            (report.message, event)
        }
        Err(err) => {
            error!(error = %err, "prediction task failed");
            let event = WebhookMetricEvent {
                outcome: WebhookOutcome::Internal,
                error_kind: None,
                store: None,
                request_bytes,
                response_bytes: 0,
            };
            (format_model_unavailable(), event)
        }
    };
    let (response, response_bytes) = json_response(StatusCode::OK, &message);
    event.response_bytes = response_bytes;
    state.metrics.record_request(event.clone());
    state.metrics.record_latency(event, started.elapsed());
    response
}

/// Handles liveness checks.
pub(crate) async fn handle_health() -> impl IntoResponse {
    json_response(StatusCode::OK, &json!({"status": "ok"})).0
}

/// Handles readiness checks.
///
/// Store checks may wait on the connection lock, so they run on the blocking pool.
pub(crate) async fn handle_ready(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let store: Arc<dyn PredictionStore> = match state.pipeline.store() {
        Some(store) => Arc::clone(store),
        None => return json_response(StatusCode::OK, &json!({"status": "ready"})).0,
    };
    let ready = match tokio::task::spawn_blocking(move || store.readiness()).await {
        Ok(result) => result.map_err(|err| err.to_string()),
        Err(err) => Err(format!("readiness task failed: {err}")),
    };
    match ready {
        Ok(()) => json_response(StatusCode::OK, &json!({"status": "ready"})).0,
        Err(message) => {
            warn!(error = %message, "prediction store not ready");
            json_response(StatusCode::SERVICE_UNAVAILABLE, &json!({"status": "unavailable"})).0
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Logs a pipeline report without raw parameter values.
fn log_report(report: &PipelineReport) {
    match &report.outcome {
        PipelineOutcome::Predicted {
            class_id,
            disease,
        } => info!(class_id = class_id.get(), disease = disease.name(), "prediction served"),
        PipelineOutcome::FieldError {
            field,
            error_kind,
        } => info!(field = %field, error_kind = *error_kind, "request rejected"),
        PipelineOutcome::ModelError {
            message,
        } => error!(error = %message, "classifier failed"),
    }
    if let StoreOutcome::Failed {
        message,
    } = &report.store
    {
        warn!(error = %message, "prediction not persisted");
    }
}

/// Serializes `body` as a JSON response and returns it with its byte length.
fn json_response<T: Serialize>(status: StatusCode, body: &T) -> (Response, usize) {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            let len = bytes.len();
            let mut response = (status, Body::from(bytes)).into_response();
            response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            (response, len)
        }
        Err(err) => {
            error!(error = %err, "response serialization failed");
            (StatusCode::INTERNAL_SERVER_ERROR.into_response(), 0)
        }
    }
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
