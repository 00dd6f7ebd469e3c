//! concierge-rag
//!
//! Retrieval-augmented answering over the hotel reference document:
//! - `generator`: system prompt construction and the single model call
//! - `gemini`: hosted `generateContent` client
//! - `provider`: seam that builds the embedder and text model from the credential
//! - `pipeline`: one-shot ingestion, readiness, and per-request answering

pub mod gemini;
pub mod generator;
pub mod pipeline;
pub mod provider;

pub use generator::{format_context, Generator, SYSTEM_TEMPLATE};
pub use pipeline::{IngestSummary, PipelineConfig, PipelineState, RagPipeline, EMPTY_QUERY_MESSAGE, UNAVAILABLE_MESSAGE};
pub use provider::{GeminiProvider, ModelProvider};
