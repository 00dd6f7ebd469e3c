pub mod chunker;
pub mod config;
pub mod document;
pub mod error;
pub mod traits;
pub mod types;

pub use chunker::{Chunker, ChunkingConfig};
pub use config::{Config, Settings};
pub use document::Document;
pub use error::{Error, Result};
pub use traits::{Embedder, TextGenerator};
pub use types::{Answer, AnswerStatus, ChatResponse, Chunk, IndexEntry, RetrievalResult, ScoredChunk, StatusReport, Vector};
