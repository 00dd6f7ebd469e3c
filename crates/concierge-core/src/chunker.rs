use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Window size and overlap, both measured in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 350, overlap: 100 }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self { chunk_size, overlap }
    }

    /// Requires `chunk_size > 0` and `overlap < chunk_size`.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be greater than 0".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::Configuration(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Sliding-window splitter over page texts.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Cut every page into windows of `chunk_size` chars advancing by
    /// `chunk_size - overlap`. The last window of a page may be shorter. Chunk
    /// indices run across the whole document.
    pub fn split<S: AsRef<str>>(&self, pages: &[S]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for (page, text) in pages.iter().enumerate() {
            self.split_page(text.as_ref(), page, &mut chunks);
        }
        chunks
    }

    fn split_page(&self, text: &str, page: usize, out: &mut Vec<Chunk>) {
        // byte offset of every char boundary, plus the end of the text
        let bounds: Vec<usize> = text.char_indices().map(|(b, _)| b).chain(std::iter::once(text.len())).collect();
        let char_len = bounds.len() - 1;
        let mut start = 0usize;
        while start < char_len {
            let end = (start + self.config.chunk_size).min(char_len);
            out.push(Chunk {
                text: text[bounds[start]..bounds[end]].to_string(),
                source_offset: start,
                index: out.len(),
                page,
            });
            if end == char_len { break; }
            start += self.config.step();
        }
    }
}

/// Convenience form of [`Chunker::split`] that validates the window first.
pub fn split<S: AsRef<str>>(pages: &[S], chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    Ok(Chunker::new(ChunkingConfig::new(chunk_size, overlap))?.split(pages))
}
