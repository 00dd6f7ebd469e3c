//! concierge-embed
//!
//! Text embedders behind `concierge_core::Embedder`: the hosted Gemini client
//! and a deterministic hashing embedder for tests and offline runs.

use std::sync::Arc;

use concierge_core::config::EmbeddingSettings;
use concierge_core::{Embedder, Result};

pub mod fake;
pub mod gemini;

pub use fake::FakeEmbedder;
pub use gemini::GeminiEmbedder;

/// Hosted embedder for `api_key`, or the [`FakeEmbedder`] when `use_fake` is set.
pub fn default_embedder(settings: &EmbeddingSettings, api_key: &str) -> Result<Arc<dyn Embedder>> {
    if settings.use_fake {
        tracing::info!(dim = settings.dimension, "using FakeEmbedder");
        return Ok(Arc::new(FakeEmbedder::new(settings.dimension)));
    }
    Ok(Arc::new(GeminiEmbedder::new(api_key, settings)?))
}
