// crates/lifestyle-risk-server/src/telemetry.rs
// ============================================================================
// Module: Webhook Telemetry
// Description: Observability hooks for webhook request handling.
// Purpose: Provide metric events without hard metrics deps.
// Dependencies: lifestyle-risk-core, serde
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for webhook request counters
//! and latency histograms. Deployments plug in their own sink; the server
//! defaults to [`NoopMetrics`].
//! Security posture: events carry outcome labels and sizes only, never raw
//! parameter values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use lifestyle_risk_core::PipelineOutcome;
use serde::Serialize;

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Webhook request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WebhookOutcome {
    /// A disease was predicted.
    Predicted,
    /// A request field was missing or invalid.
    FieldError,
    /// The classifier failed.
    ModelError,
    /// The request task failed before producing a report.
    Internal,
}

impl WebhookOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Predicted => "predicted",
            Self::FieldError => "field_error",
            Self::ModelError => "model_error",
            Self::Internal => "internal",
        }
    }
}

impl From<&PipelineOutcome> for WebhookOutcome {
    fn from(outcome: &PipelineOutcome) -> Self {
        match outcome {
            PipelineOutcome::Predicted {
                ..
            } => Self::Predicted,
            PipelineOutcome::FieldError {
                ..
            } => Self::FieldError,
            PipelineOutcome::ModelError {
                ..
            } => Self::ModelError,
        }
    }
}

/// Webhook request metric event payload.
///
/// # Invariants
/// - Optional fields are `None` when the metadata is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookMetricEvent {
    /// Request outcome.
    pub outcome: WebhookOutcome,
    /// Normalized field error kind when the outcome is a field error.
    pub error_kind: Option<&'static str>,
    /// Store hand-off label (`skipped`, `recorded`, `failed`) when available.
    pub store: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for webhook requests and latencies.
pub trait WebhookMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: WebhookMetricEvent);
    /// Records a latency observation for the request.
    fn record_latency(&self, event: WebhookMetricEvent, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl WebhookMetrics for NoopMetrics {
    fn record_request(&self, _event: WebhookMetricEvent) {}

    fn record_latency(&self, _event: WebhookMetricEvent, _latency: Duration) {}
}
