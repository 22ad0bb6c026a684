//! In-memory [`VectorStore`] implementation for testing and small corpora.
//!
//! Uses a `HashMap` behind `std::sync::RwLock` for thread safety. Search is
//! brute-force cosine distance over all stored vectors, with deterministic
//! tie-breaking on chunk id.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::embedding::cosine_distance;
use crate::models::Chunk;

use super::{ChunkFilter, Neighbor, VectorStore};

struct StoredChunk {
    chunk: Chunk,
    vector: Vec<f32>,
}

/// Brute-force in-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    chunks: RwLock<HashMap<String, StoredChunk>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn upsert(&self, chunk: &Chunk, embedding: &[f32]) -> Result<()> {
        let mut chunks = self.chunks.write().unwrap();
        chunks.insert(
            chunk.id.clone(),
            StoredChunk {
                chunk: chunk.clone(),
                vector: embedding.to_vec(),
            },
        );
        Ok(())
    }

    async fn nearest_neighbors(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&ChunkFilter>,
    ) -> Result<Vec<Neighbor>> {
        let chunks = self.chunks.read().unwrap();
        let mut candidates: Vec<Neighbor> = chunks
            .values()
            .filter(|sc| filter.map_or(true, |f| f.matches(&sc.chunk)))
            .map(|sc| Neighbor {
                chunk: sc.chunk.clone(),
                distance: cosine_distance(embedding, &sc.vector),
            })
            .collect();
        candidates.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        candidates.truncate(k);
        Ok(candidates)
    }

    async fn get(&self, chunk_id: &str) -> Result<Option<Chunk>> {
        let chunks = self.chunks.read().unwrap();
        Ok(chunks.get(chunk_id).map(|sc| sc.chunk.clone()))
    }

    async fn delete(&self, chunk_id: &str) -> Result<()> {
        let mut chunks = self.chunks.write().unwrap();
        chunks.remove(chunk_id);
        Ok(())
    }

    async fn all_chunks(&self) -> Result<Vec<Chunk>> {
        let chunks = self.chunks.read().unwrap();
        let mut out: Vec<Chunk> = chunks.values().map(|sc| sc.chunk.clone()).collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentType;

    fn make_chunk(id: &str, doc_id: &str, doc_type: DocumentType) -> Chunk {
        Chunk {
            id: id.to_string(),
            document_id: doc_id.to_string(),
            chunk_index: 0,
            text: format!("text of {id}"),
            start: 0,
            end: 10,
            original: true,
            doc_type,
            source_hash: "hash".to_string(),
            source_path: format!("{doc_id}.txt"),
            word_count: 3,
            ingested_at: 1_700_000_000,
            metadata: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = InMemoryStore::new();
        let chunk = make_chunk("c1", "d1", DocumentType::Generic);
        store.upsert(&chunk, &[1.0, 0.0]).await.unwrap();
        store.upsert(&chunk, &[0.0, 1.0]).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_nearest_orders_by_distance() {
        let store = InMemoryStore::new();
        store
            .upsert(&make_chunk("far", "d1", DocumentType::Generic), &[0.0, 1.0])
            .await
            .unwrap();
        store
            .upsert(&make_chunk("near", "d2", DocumentType::Generic), &[1.0, 0.1])
            .await
            .unwrap();

        let got = store.nearest_neighbors(&[1.0, 0.0], 2, None).await.unwrap();
        assert_eq!(got[0].chunk.id, "near");
        assert_eq!(got[1].chunk.id, "far");
        assert!(got[0].distance <= got[1].distance);
    }

    #[tokio::test]
    async fn test_filter_restricts_results() {
        let store = InMemoryStore::new();
        store
            .upsert(&make_chunk("c1", "d1", DocumentType::Resume), &[1.0, 0.0])
            .await
            .unwrap();
        store
            .upsert(&make_chunk("c2", "d2", DocumentType::Code), &[1.0, 0.0])
            .await
            .unwrap();

        let filter = ChunkFilter {
            doc_types: vec![DocumentType::Resume],
            ..Default::default()
        };
        let got = store
            .nearest_neighbors(&[1.0, 0.0], 10, Some(&filter))
            .await
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].chunk.id, "c1");
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let store = InMemoryStore::new();
        let chunk = make_chunk("c1", "d1", DocumentType::Generic);
        store.upsert(&chunk, &[1.0]).await.unwrap();
        assert!(store.get("c1").await.unwrap().is_some());
        store.delete("c1").await.unwrap();
        assert!(store.get("c1").await.unwrap().is_none());
        assert!(store.is_empty());
    }
}
