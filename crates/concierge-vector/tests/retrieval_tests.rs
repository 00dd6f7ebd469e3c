use std::sync::Arc;

use async_trait::async_trait;
use concierge_core::chunker::split;
use concierge_core::{Embedder, Error, IndexEntry, Result, Vector};
use concierge_embed::FakeEmbedder;
use concierge_vector::{Retriever, VectorIndex};

async fn index_pages(embedder: &FakeEmbedder, pages: &[&str], size: usize, overlap: usize) -> VectorIndex {
    let chunks = split(pages, size, overlap).expect("split");
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed(&texts).await.expect("embed");
    let entries = vectors.into_iter().zip(chunks).map(|(vector, chunk)| IndexEntry { vector, chunk: Arc::new(chunk) }).collect();
    VectorIndex::build(entries).expect("build")
}

#[tokio::test]
async fn check_in_question_finds_check_in_chunk() {
    let embedder = FakeEmbedder::new(768);
    let index = index_pages(&embedder, &["Check-in is at 3pm. Check-out is at 11am."], 20, 5).await;
    assert_eq!(index.len(), 3);

    let retriever = Retriever::new(Arc::new(embedder), Arc::new(index), 4).expect("retriever");
    let result = retriever.retrieve("when is check-in").await.expect("retrieve");
    assert_eq!(result.len(), 3, "fewer chunks than top_k returns all of them");
    let top = result.top().expect("top hit");
    assert!(top.chunk.text.contains("Check-in is at 3pm"), "top was {:?}", top.chunk.text);
}

#[tokio::test]
async fn results_are_unique_subset_of_index() {
    let embedder = FakeEmbedder::new(256);
    let pages = [
        "The rooftop pool is open from 6am to 10pm. Towels are provided poolside.",
        "Breakfast is served in the Garden Room from 6:30 to 10:30 every day.",
        "Valet parking costs 40 dollars per night. Electric vehicle chargers are on level 2.",
    ];
    let index = index_pages(&embedder, &pages, 30, 10).await;
    let indexed: Vec<usize> = index.chunks().map(|c| c.index).collect();
    let retriever = Retriever::new(Arc::new(embedder), Arc::new(index), 4).expect("retriever");

    let result = retriever.retrieve("what time is breakfast served").await.expect("retrieve");
    assert_eq!(result.len(), 4);
    let mut ids = result.indices();
    assert!(ids.iter().all(|i| indexed.contains(i)));
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4, "no duplicate chunks");
    assert!(result.top().is_some_and(|h| h.chunk.text.to_lowercase().contains("breakfast")));
}

#[tokio::test]
async fn empty_index_retrieves_nothing() {
    let retriever = Retriever::new(Arc::new(FakeEmbedder::new(32)), Arc::new(VectorIndex::default()), 4).expect("retriever");
    assert!(retriever.retrieve("anything").await.expect("retrieve").is_empty());
}

struct DownEmbedder;

#[async_trait]
impl Embedder for DownEmbedder {
    fn dim(&self) -> usize { 4 }
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vector>> { Err(Error::EmbeddingService("offline".to_string())) }
    async fn embed_query(&self, _text: &str) -> Result<Vector> { Err(Error::EmbeddingService("offline".to_string())) }
}

#[tokio::test]
async fn embedding_failure_propagates() {
    let retriever = Retriever::new(Arc::new(DownEmbedder), Arc::new(VectorIndex::default()), 4).expect("retriever");
    assert!(matches!(retriever.retrieve("pool").await, Err(Error::EmbeddingService(_))));
}

#[test]
fn zero_top_k_is_rejected() {
    let err = Retriever::new(Arc::new(FakeEmbedder::new(8)), Arc::new(VectorIndex::default()), 0).err().expect("rejected");
    assert!(err.is_configuration());
}
