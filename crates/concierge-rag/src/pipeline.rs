//! Ingestion at startup and grounded answering per request.
//!
//! The lifecycle is `uninitialized -> ready | failed` and is decided exactly once
//! by [`RagPipeline::initialize`]. After that the index is read-only, so
//! concurrent `answer` calls share it without locking. A request arriving while
//! ingestion is still running sees the pipeline as unavailable.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;

use concierge_core::config::Settings;
use concierge_core::{Answer, Chunker, ChunkingConfig, Document, Error, IndexEntry, Result, StatusReport};
use concierge_vector::{Retriever, VectorIndex};

use crate::generator::Generator;
use crate::provider::ModelProvider;

pub const UNAVAILABLE_MESSAGE: &str = "AI Concierge is not available at the moment. Please try again later.";
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question about the hotel.";

#[derive(Clone)]
pub struct PipelineConfig {
    pub document_path: PathBuf,
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub api_key: Option<String>,
    /// Only used in messages about a missing credential.
    pub api_key_env: String,
}

impl PipelineConfig {
    pub fn from_settings(settings: &Settings, base_dir: &Path, api_key: Option<String>) -> Self {
        Self {
            document_path: settings.document_path(base_dir),
            chunking: settings.chunking,
            top_k: settings.retrieval.top_k,
            api_key,
            api_key_env: settings.credentials.api_key_env.clone(),
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("document_path", &self.document_path)
            .field("chunking", &self.chunking)
            .field("top_k", &self.top_k)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    Ready,
    Failed,
}

/// Counts recorded by a successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub pages: usize,
    pub chunks: usize,
    pub indexed: usize,
}

struct ReadyPipeline {
    retriever: Retriever,
    generator: Generator,
    summary: IngestSummary,
}

enum Lifecycle {
    Ready(ReadyPipeline),
    Failed(Error),
}

pub struct RagPipeline {
    config: PipelineConfig,
    provider: Arc<dyn ModelProvider>,
    lifecycle: OnceCell<Lifecycle>,
}

impl RagPipeline {
    pub fn new(config: PipelineConfig, provider: Arc<dyn ModelProvider>) -> Self {
        Self { config, provider, lifecycle: OnceCell::new() }
    }

    pub fn api_key_configured(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Run ingestion once. Later or concurrent calls wait for and return the
    /// same outcome. Failures are logged and leave the pipeline `Failed`.
    pub async fn initialize(&self) -> PipelineState {
        self.lifecycle
            .get_or_init(|| async {
                match self.ingest().await {
                    Ok(ready) => {
                        tracing::info!(pages = ready.summary.pages, chunks = ready.summary.chunks, "RAG pipeline ready");
                        Lifecycle::Ready(ready)
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "RAG pipeline failed to initialize");
                        Lifecycle::Failed(e)
                    }
                }
            })
            .await;
        self.state()
    }

    pub fn state(&self) -> PipelineState {
        match self.lifecycle.get() {
            None => PipelineState::Uninitialized,
            Some(Lifecycle::Ready(_)) => PipelineState::Ready,
            Some(Lifecycle::Failed(_)) => PipelineState::Failed,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == PipelineState::Ready
    }

    /// Why initialization failed, if it did.
    pub fn failure(&self) -> Option<&Error> {
        match self.lifecycle.get() {
            Some(Lifecycle::Failed(e)) => Some(e),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<IngestSummary> {
        match self.lifecycle.get() {
            Some(Lifecycle::Ready(ready)) => Some(ready.summary),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusReport {
        let ready = self.is_ready();
        StatusReport { pdf_loaded: ready, rag_ready: ready, api_key_configured: self.api_key_configured() }
    }

    /// Never fails: unavailability and per-request errors come back as
    /// `AnswerStatus::Error` and leave the pipeline state untouched.
    pub async fn answer(&self, query: &str) -> Answer {
        let Some(Lifecycle::Ready(ready)) = self.lifecycle.get() else {
            tracing::debug!(state = ?self.state(), "question received while pipeline unavailable");
            return Answer::error(UNAVAILABLE_MESSAGE);
        };
        if query.trim().is_empty() {
            return Answer::error(EMPTY_QUERY_MESSAGE);
        }
        match ready.respond(query).await {
            Ok(answer) => {
                tracing::info!(query_chars = query.chars().count(), grounding = answer.grounding.len(), "answered question");
                answer
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to answer question");
                Answer::error(format!("Error processing message: {e}"))
            }
        }
    }

    async fn ingest(&self) -> Result<ReadyPipeline> {
        let api_key = self.config.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            Error::Configuration(format!("API key not configured; set the {} environment variable", self.config.api_key_env))
        })?;
        let path = &self.config.document_path;
        let is_file = tokio::fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            return Err(Error::Configuration(format!("document not found: {}", path.display())));
        }
        let chunker = Chunker::new(self.config.chunking)?;

        tracing::info!(path = %path.display(), "loading document");
        let document = Document::load(path).await?;
        let chunks = chunker.split(document.pages());
        tracing::info!(path = %document.path().display(), pages = document.page_count(), chunks = chunks.len(), "created text chunks");

        let embedder = self.provider.embedder(api_key)?;
        let model = self.provider.generator(api_key)?;

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(Error::EmbeddingService(format!("got {} vectors for {} chunks", vectors.len(), chunks.len())));
        }
        let entries: Vec<IndexEntry> =
            vectors.into_iter().zip(chunks).map(|(vector, chunk)| IndexEntry { vector, chunk: Arc::new(chunk) }).collect();
        let chunk_count = entries.len();
        let index = VectorIndex::build(entries)?;
        if let Some(dim) = index.dim().filter(|&d| d != embedder.dim()) {
            return Err(Error::Index(format!("embedder reports dimension {} but produced {dim}", embedder.dim())));
        }

        let summary = IngestSummary { pages: document.page_count(), chunks: chunk_count, indexed: index.len() };
        let retriever = Retriever::new(embedder, Arc::new(index), self.config.top_k)?;
        Ok(ReadyPipeline { retriever, generator: Generator::new(model), summary })
    }
}

impl ReadyPipeline {
    async fn respond(&self, query: &str) -> Result<Answer> {
        let grounding = self.retriever.retrieve(query).await?;
        let text = self.generator.generate(query, &grounding).await?;
        Ok(Answer::success(text, grounding))
    }
}
