use async_trait::async_trait;

use crate::error::Result;
use crate::types::Vector;

/// Maps text to fixed-dimension vectors.
///
/// `embed` is used for passages at ingestion, `embed_query` for questions. Both
/// must return vectors of length `dim()`.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>>;
    async fn embed_query(&self, text: &str) -> Result<Vector>;
}

/// A hosted text model answering one system/user exchange per call.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model_name(&self) -> &str;
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
