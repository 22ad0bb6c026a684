//! Storage abstraction for Dossier.
//!
//! The [`VectorStore`] trait defines the operations the ingestion pipeline
//! and retrieval engine need from the backing vector database, enabling
//! pluggable backends. The store is the system of record for embeddings
//! and the sole owner of the embedding lifecycle; the rest of the system
//! references chunks by id only.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Chunk, DocumentType};

/// Metadata predicate applied to nearest-neighbour candidates.
#[derive(Debug, Clone, Default)]
pub struct ChunkFilter {
    /// Restrict to these document types (empty = any).
    pub doc_types: Vec<DocumentType>,
    /// Restrict to chunks of a single source document.
    pub document_id: Option<String>,
    /// Only chunks ingested after this Unix timestamp.
    pub newer_than: Option<i64>,
    /// Only verbatim source chunks, excluding derived content.
    pub original_only: bool,
}

impl ChunkFilter {
    pub fn matches(&self, chunk: &Chunk) -> bool {
        if !self.doc_types.is_empty() && !self.doc_types.contains(&chunk.doc_type) {
            return false;
        }
        if let Some(ref id) = self.document_id {
            if &chunk.document_id != id {
                return false;
            }
        }
        if let Some(ts) = self.newer_than {
            if chunk.ingested_at <= ts {
                return false;
            }
        }
        if self.original_only && !chunk.original {
            return false;
        }
        true
    }
}

/// A candidate chunk returned from nearest-neighbour search.
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub chunk: Chunk,
    /// Cosine distance to the query vector; smaller is closer.
    pub distance: f64,
}

/// Abstract vector store backend.
///
/// All operations are async (via `async-trait`); per-id `upsert` is assumed
/// atomic, so concurrent writes for different chunks never corrupt state.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`upsert`](VectorStore::upsert) | Insert or replace a chunk and its embedding |
/// | [`nearest_neighbors`](VectorStore::nearest_neighbors) | Ranked similarity search under a filter |
/// | [`get`](VectorStore::get) | Fetch a chunk by id |
/// | [`delete`](VectorStore::delete) | Remove a chunk and its embedding |
/// | [`all_chunks`](VectorStore::all_chunks) | Metadata scan for dedup, verify, and stats |
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace a chunk together with its embedding vector.
    async fn upsert(&self, chunk: &Chunk, embedding: &[f32]) -> Result<()>;

    /// Return up to `k` chunks nearest to `embedding`, ordered by ascending
    /// distance, restricted to chunks matching `filter`.
    async fn nearest_neighbors(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&ChunkFilter>,
    ) -> Result<Vec<Neighbor>>;

    /// Fetch a single chunk by id.
    async fn get(&self, chunk_id: &str) -> Result<Option<Chunk>>;

    /// Remove a chunk and its embedding.
    async fn delete(&self, chunk_id: &str) -> Result<()>;

    /// Return every stored chunk's metadata (no embeddings).
    async fn all_chunks(&self) -> Result<Vec<Chunk>>;
}
