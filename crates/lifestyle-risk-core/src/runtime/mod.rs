// crates/lifestyle-risk-core/src/runtime/mod.rs
// ============================================================================
// Module: Lifestyle Risk Runtime
// Description: Encoder, responder, pipeline, and in-memory store.
// Purpose: Group the request-time logic of the prediction webhook.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Request-time logic: the encoder turns parameters into a feature vector,
//! the responder turns class ids into messages, and the pipeline wires both
//! to the classifier and store contracts.

pub mod encoder;
pub mod pipeline;
pub mod responder;
pub mod store;

pub use encoder::EncodeError;
pub use encoder::FeatureVector;
pub use encoder::PARAMETERS_KEY;
pub use encoder::QUERY_RESULT_KEY;
pub use encoder::encode;
pub use encoder::extract_parameters;
pub use pipeline::PipelineOutcome;
pub use pipeline::PipelineReport;
pub use pipeline::PredictionPipeline;
pub use pipeline::RequestState;
pub use pipeline::StoreOutcome;
pub use responder::MessageVariant;
pub use responder::OutwardMessage;
pub use responder::decode;
pub use responder::format_error;
pub use responder::format_model_unavailable;
pub use responder::format_success;
pub use store::InMemoryPredictionStore;
