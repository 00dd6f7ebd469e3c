use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use concierge_core::{Chunk, Error, IndexEntry, Result, RetrievalResult, ScoredChunk};

/// Immutable brute-force cosine index over one ingestion batch.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    norms: Vec<f32>,
    dim: Option<usize>,
}

impl VectorIndex {
    /// All vectors must share one dimension and every chunk index must be unique.
    pub fn build(entries: Vec<IndexEntry>) -> Result<Self> {
        let dim = entries.first().map(|e| e.vector.len());
        let mut seen = HashSet::with_capacity(entries.len());
        let mut norms = Vec::with_capacity(entries.len());
        for e in &entries {
            if Some(e.vector.len()) != dim {
                return Err(Error::Index(format!(
                    "chunk {} has dimension {}, expected {}",
                    e.chunk.index,
                    e.vector.len(),
                    dim.unwrap_or_default()
                )));
            }
            if !seen.insert(e.chunk.index) {
                return Err(Error::Index(format!("duplicate chunk index {}", e.chunk.index)));
            }
            norms.push(l2_norm(&e.vector));
        }
        tracing::debug!(entries = entries.len(), dim = dim.unwrap_or_default(), "built vector index");
        Ok(Self { entries, norms, dim })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `None` for an empty index.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Arc<Chunk>> {
        self.entries.iter().map(|e| &e.chunk)
    }

    /// Up to `top_k` chunks by descending cosine similarity, ties to the lower
    /// chunk index. An empty index answers with an empty result.
    pub fn query(&self, vector: &[f32], top_k: usize) -> Result<RetrievalResult> {
        let Some(dim) = self.dim else { return Ok(RetrievalResult::empty()) };
        if vector.len() != dim {
            return Err(Error::Index(format!("query has dimension {}, index has {}", vector.len(), dim)));
        }
        let q_norm = l2_norm(vector);
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .zip(&self.norms)
            .map(|(e, &n)| (cosine_with_norms(vector, q_norm, &e.vector, n), e))
            .collect();
        scored.sort_by(|a, b| rank(a.0, a.1.chunk.index, b.0, b.1.chunk.index));
        scored.truncate(top_k);
        Ok(RetrievalResult::from_ranked(
            scored.into_iter().map(|(score, e)| ScoredChunk { chunk: Arc::clone(&e.chunk), score }).collect(),
        ))
    }
}

fn rank(sa: f32, ia: usize, sb: f32, ib: usize) -> Ordering {
    sb.total_cmp(&sa).then(ia.cmp(&ib))
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine_with_norms(a: &[f32], na: f32, b: &[f32], nb: f32) -> f32 {
    if na == 0.0 || nb == 0.0 { return 0.0; }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (na * nb)
}
