//! Domain types shared by ingestion, retrieval and answering.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fixed-length embedding produced from a chunk or a query.
pub type Vector = Vec<f32>;

/// A contiguous slice of one page of the source document.
///
/// - `text`: the passage itself
/// - `source_offset`: char position of the passage start within its page
/// - `index`: ordinal across the whole document, assigned at creation
/// - `page`: zero-based page the passage was cut from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source_offset: usize,
    pub index: usize,
    pub page: usize,
}

/// One row of the vector index. The chunk is shared with the ingested chunk sequence.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub vector: Vector,
    pub chunk: Arc<Chunk>,
}

/// A retrieved chunk and its similarity to the query. Higher is better.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Arc<Chunk>,
    pub score: f32,
}

/// Chunks ranked by descending similarity, at most `top_k` long, no duplicates.
#[derive(Debug, Clone, Default)]
pub struct RetrievalResult {
    hits: Vec<ScoredChunk>,
}

impl RetrievalResult {
    /// Callers are responsible for ranking and de-duplication.
    pub fn from_ranked(hits: Vec<ScoredChunk>) -> Self {
        Self { hits }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn hits(&self) -> &[ScoredChunk] {
        &self.hits
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.hits.iter().map(|h| h.chunk.as_ref())
    }

    pub fn indices(&self) -> Vec<usize> {
        self.hits.iter().map(|h| h.chunk.index).collect()
    }

    pub fn top(&self) -> Option<&ScoredChunk> {
        self.hits.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Success,
    Error,
}

/// Outcome of a single question. Errors are carried in-band, never raised.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub status: AnswerStatus,
    pub grounding: RetrievalResult,
}

impl Answer {
    pub fn success(text: impl Into<String>, grounding: RetrievalResult) -> Self {
        Self { text: text.into(), status: AnswerStatus::Success, grounding }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), status: AnswerStatus::Error, grounding: RetrievalResult::empty() }
    }

    pub fn is_success(&self) -> bool {
        self.status == AnswerStatus::Success
    }
}

/// Wire shape of the query interface: `{ "response": ..., "status": "success"|"error" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub status: AnswerStatus,
}

impl From<&Answer> for ChatResponse {
    fn from(answer: &Answer) -> Self {
        Self { response: answer.text.clone(), status: answer.status }
    }
}

impl From<Answer> for ChatResponse {
    fn from(answer: Answer) -> Self {
        Self { response: answer.text, status: answer.status }
    }
}

/// Wire shape of the status interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub pdf_loaded: bool,
    pub rag_ready: bool,
    pub api_key_configured: bool,
}
