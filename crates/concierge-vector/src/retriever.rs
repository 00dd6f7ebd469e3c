use std::sync::Arc;

use concierge_core::{Embedder, Error, Result, RetrievalResult};

use crate::index::VectorIndex;

/// Fixed top-k retrieval: embed the question, ask the index.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<VectorIndex>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<VectorIndex>, top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(Error::Configuration("top_k must be greater than 0".to_string()));
        }
        Ok(Self { embedder, index, top_k })
    }

    pub async fn retrieve(&self, query: &str) -> Result<RetrievalResult> {
        let q_vec = self.embedder.embed_query(query).await?;
        self.index.query(&q_vec, self.top_k)
    }
}
