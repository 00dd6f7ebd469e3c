use std::sync::Arc;

use concierge_core::config::{EmbeddingSettings, GenerationSettings, Settings};
use concierge_core::{Embedder, Result, TextGenerator};
use concierge_embed::default_embedder;

use crate::gemini::GeminiGenerator;

/// Builds the model clients once the credential has been checked.
pub trait ModelProvider: Send + Sync {
    fn embedder(&self, api_key: &str) -> Result<Arc<dyn Embedder>>;
    fn generator(&self, api_key: &str) -> Result<Arc<dyn TextGenerator>>;
}

#[derive(Debug, Clone, Default)]
pub struct GeminiProvider {
    embedding: EmbeddingSettings,
    generation: GenerationSettings,
}

impl GeminiProvider {
    pub fn new(embedding: EmbeddingSettings, generation: GenerationSettings) -> Self {
        Self { embedding, generation }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.embedding.clone(), settings.generation.clone())
    }
}

impl ModelProvider for GeminiProvider {
    fn embedder(&self, api_key: &str) -> Result<Arc<dyn Embedder>> {
        default_embedder(&self.embedding, api_key)
    }

    fn generator(&self, api_key: &str) -> Result<Arc<dyn TextGenerator>> {
        Ok(Arc::new(GeminiGenerator::new(api_key, &self.generation)?))
    }
}
