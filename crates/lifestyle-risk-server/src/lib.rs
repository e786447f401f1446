// crates/lifestyle-risk-server/src/lib.rs
// ============================================================================
// Module: Lifestyle Risk Server
// Description: Webhook transport for lifestyle disease-risk predictions.
// Purpose: Wire configuration, model, store, and pipeline behind HTTP.
// Dependencies: axum, tokio, tower-http, tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! [`RiskServer`] loads the forest model and optional prediction store from a
//! [`lifestyle_risk_config::RiskConfig`] and serves the webhook. Logging setup
//! and metric hooks live alongside so that the CLI stays a thin dispatcher.

pub mod clock;
pub mod logging;
pub mod server;
pub mod telemetry;

pub use clock::SystemClock;
pub use logging::LOG_ENV_VAR;
pub use logging::LoggingError;
pub use logging::init_tracing;
pub use server::RiskServer;
pub use server::RiskServerError;
pub use server::ServerState;
pub use server::build_router;
pub use telemetry::NoopMetrics;
pub use telemetry::WebhookMetricEvent;
pub use telemetry::WebhookMetrics;
pub use telemetry::WebhookOutcome;
