//! concierge-vector
//!
//! In-memory cosine index built once from the ingested chunks, and the
//! retriever that fronts it with a fixed fan-out.

pub mod index;
pub mod retriever;

pub use index::VectorIndex;
pub use retriever::Retriever;
