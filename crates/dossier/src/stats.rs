//! Corpus statistics and health overview.
//!
//! Provides a quick summary of what's indexed: document and chunk counts,
//! per-type breakdowns, verbatim-content coverage, and how many sources
//! have drifted from their stored hashes. Read-only with respect to the
//! store; hash drift is recomputed only for sources still present on disk.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Serialize;

use dossier_core::error::DossierError;
use dossier_core::models::content_hash;
use dossier_core::store::VectorStore;

/// Snapshot of the indexed corpus.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub documents: usize,
    pub chunks: usize,
    /// Chunks holding verbatim source text (as opposed to derived content).
    pub original_chunks: usize,
    /// Chunk counts keyed by document type name.
    pub by_type: BTreeMap<String, usize>,
    /// Sources still on disk whose content no longer matches the stored hash.
    pub mismatched_sources: usize,
    /// Duplicate ingestion short-circuits observed by the pipeline.
    pub duplicate_hits: u64,
}

/// Collect statistics from the store's current contents.
pub async fn collect_stats<S: VectorStore>(
    store: &S,
    duplicate_hits: u64,
) -> Result<StoreStats, DossierError> {
    let chunks = store
        .all_chunks()
        .await
        .map_err(|e| DossierError::unavailable("scan for stats", e))?;

    let mut documents = std::collections::HashSet::new();
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut original_chunks = 0usize;
    let mut sources: HashMap<String, String> = HashMap::new();

    for chunk in &chunks {
        documents.insert(chunk.document_id.clone());
        *by_type.entry(chunk.doc_type.as_str().to_string()).or_default() += 1;
        if chunk.original {
            original_chunks += 1;
        }
        sources
            .entry(chunk.source_path.clone())
            .or_insert_with(|| chunk.source_hash.clone());
    }

    let mut mismatched_sources = 0usize;
    for (path, stored_hash) in &sources {
        let path = Path::new(path);
        if !path.is_file() {
            continue;
        }
        if let Ok(bytes) = std::fs::read(path) {
            if content_hash(&bytes) != *stored_hash {
                mismatched_sources += 1;
            }
        }
    }

    Ok(StoreStats {
        documents: documents.len(),
        chunks: chunks.len(),
        original_chunks,
        by_type,
        mismatched_sources,
        duplicate_hits,
    })
}

impl StoreStats {
    /// Human-readable summary, one stat per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Dossier — Corpus Stats\n");
        out.push_str("======================\n\n");
        out.push_str(&format!("  Documents:   {}\n", self.documents));
        out.push_str(&format!("  Chunks:      {}\n", self.chunks));
        out.push_str(&format!(
            "  Original:    {} / {}\n",
            self.original_chunks, self.chunks
        ));
        out.push_str(&format!("  Mismatched:  {}\n", self.mismatched_sources));
        out.push_str(&format!("  Duplicates:  {}\n", self.duplicate_hits));
        if !self.by_type.is_empty() {
            out.push_str("\n  By type:\n");
            for (name, count) in &self.by_type {
                out.push_str(&format!("  {:<16} {:>6}\n", name, count));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_core::models::{Chunk, DocumentType};
    use dossier_core::store::memory::InMemoryStore;

    fn chunk(id: &str, doc_id: &str, doc_type: DocumentType, original: bool) -> Chunk {
        Chunk {
            id: id.to_string(),
            document_id: doc_id.to_string(),
            chunk_index: 0,
            text: "some text".to_string(),
            start: 0,
            end: 9,
            original,
            doc_type,
            source_hash: format!("{doc_id}-hash"),
            source_path: format!("/nonexistent/{doc_id}.txt"),
            word_count: 2,
            ingested_at: 1_700_000_000,
            metadata: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_counts_documents_types_and_originals() {
        let store = InMemoryStore::new();
        store
            .upsert(&chunk("d1:0000", "d1", DocumentType::Resume, true), &[1.0])
            .await
            .unwrap();
        store
            .upsert(&chunk("d1:0001", "d1", DocumentType::Resume, true), &[1.0])
            .await
            .unwrap();
        store
            .upsert(&chunk("d2:0000", "d2", DocumentType::Code, false), &[1.0])
            .await
            .unwrap();

        let stats = collect_stats(&store, 3).await.unwrap();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.chunks, 3);
        assert_eq!(stats.original_chunks, 2);
        assert_eq!(stats.by_type.get("resume"), Some(&2));
        assert_eq!(stats.by_type.get("code"), Some(&1));
        // Sources do not exist on disk, so none can be counted as drifted.
        assert_eq!(stats.mismatched_sources, 0);
        assert_eq!(stats.duplicate_hits, 3);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryStore::new();
        let stats = collect_stats(&store, 0).await.unwrap();
        assert_eq!(stats.documents, 0);
        assert_eq!(stats.chunks, 0);
        assert!(stats.by_type.is_empty());
    }

    #[test]
    fn test_render_contains_counts() {
        let stats = StoreStats {
            documents: 2,
            chunks: 5,
            original_chunks: 4,
            by_type: BTreeMap::from([("resume".to_string(), 5)]),
            mismatched_sources: 1,
            duplicate_hits: 0,
        };
        let text = stats.render();
        assert!(text.contains("Documents:   2"));
        assert!(text.contains("resume"));
    }
}
