//! Ingestion pipeline orchestration.
//!
//! Coordinates the full ingest flow: read → decode → hash → dedup →
//! chunk → embed → store. Duplicate content short-circuits before any
//! chunking work; re-ingesting a path whose content changed retires the
//! prior chunks for that path, but only once the new version has chunked
//! cleanly. Concurrent ingests of identical
//! content are serialized on a per-content-hash lock, so the duplicate
//! check and the writes it guards never interleave.
//!
//! Folder ingestion fans out over a bounded number of tasks with per-file
//! isolation: one unreadable or binary file never aborts the batch.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::Value;
use tokio::sync::{Mutex as TokioMutex, Semaphore};
use tokio::task::JoinSet;
use walkdir::WalkDir;

use dossier_core::chunk::ChunkStrategy;
use dossier_core::embedding::Embedder;
use dossier_core::error::DossierError;
use dossier_core::models::{content_hash, Chunk, Document, DocumentType};
use dossier_core::store::VectorStore;

use crate::read;

/// Result of a single ingestion attempt.
#[derive(Debug)]
pub enum IngestOutcome {
    Ingested(IngestReport),
    /// Content with this hash is already stored; nothing was written.
    Duplicate {
        content_hash: String,
    },
}

/// What a successful (possibly partial) ingestion wrote.
#[derive(Debug)]
pub struct IngestReport {
    pub document: Document,
    pub chunks_written: usize,
    /// Chunks that failed to embed or store; the rest of the batch
    /// proceeded.
    pub failures: Vec<ChunkFailure>,
}

#[derive(Debug)]
pub struct ChunkFailure {
    pub chunk_id: String,
    pub error: String,
}

/// A file that failed during folder ingestion, kept for retry.
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

/// Aggregate outcome of a folder ingestion.
#[derive(Debug, Default)]
pub struct FolderReport {
    pub ingested: Vec<String>,
    pub duplicates: Vec<String>,
    pub failed: Vec<FileFailure>,
}

/// One ingested source as seen by [`IngestPipeline::list_documents`].
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    pub path: String,
    pub content_hash: String,
    pub doc_type: DocumentType,
    pub chunks: usize,
    pub ingested_at: i64,
}

/// Integrity state of one ingested source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityStatus {
    /// On-disk content still matches the stored hash.
    Match,
    /// Source changed since ingestion.
    Mismatch { stored: String, actual: String },
    /// No ingested record exists for this path.
    NotFound,
}

/// Folder ingestion options.
#[derive(Debug, Clone)]
pub struct FolderOptions {
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub recursive: bool,
    /// Maximum number of files ingested concurrently.
    pub concurrency: usize,
}

impl Default for FolderOptions {
    fn default() -> Self {
        Self {
            include_globs: vec!["**/*.md".to_string(), "**/*.txt".to_string()],
            exclude_globs: Vec::new(),
            recursive: true,
            concurrency: 4,
        }
    }
}

/// Ingestion pipeline over a vector store, an embedder, and a chunking
/// strategy.
pub struct IngestPipeline<S, E> {
    store: Arc<S>,
    embedder: Arc<E>,
    chunker: Arc<dyn ChunkStrategy>,
    /// Per-content-hash locks serializing concurrent same-content ingests.
    hash_locks: StdMutex<HashMap<String, Arc<TokioMutex<()>>>>,
    duplicate_hits: AtomicU64,
}

impl<S, E> IngestPipeline<S, E>
where
    S: VectorStore + 'static,
    E: Embedder + 'static,
{
    pub fn new(store: Arc<S>, embedder: Arc<E>, chunker: Arc<dyn ChunkStrategy>) -> Self {
        Self {
            store,
            embedder,
            chunker,
            hash_locks: StdMutex::new(HashMap::new()),
            duplicate_hits: AtomicU64::new(0),
        }
    }

    /// Number of duplicate short-circuits since construction.
    pub fn duplicate_hits(&self) -> u64 {
        self.duplicate_hits.load(Ordering::Relaxed)
    }

    /// Ingest one file from disk as verbatim source content.
    pub async fn ingest_file(
        &self,
        path: &Path,
        metadata: Value,
    ) -> Result<IngestOutcome, DossierError> {
        let (bytes, text) = read::read_file(path)?;
        let hash = content_hash(&bytes);
        let name = path.display().to_string();
        let doc_type = DocumentType::infer(&name, &text);
        let modified_at = file_mtime(path);
        self.ingest_content(&name, &text, hash, doc_type, true, modified_at, metadata)
            .await
    }

    /// Ingest in-memory text under a logical name, e.g. derived content
    /// such as a generated summary (`original = false`).
    pub async fn ingest_text(
        &self,
        name: &str,
        text: &str,
        doc_type: Option<DocumentType>,
        original: bool,
        metadata: Value,
    ) -> Result<IngestOutcome, DossierError> {
        let hash = content_hash(text.as_bytes());
        let doc_type = doc_type.unwrap_or_else(|| DocumentType::infer(name, text));
        let now = Utc::now().timestamp();
        self.ingest_content(name, text, hash, doc_type, original, now, metadata)
            .await
    }

    async fn ingest_content(
        &self,
        name: &str,
        text: &str,
        hash: String,
        doc_type: DocumentType,
        original: bool,
        modified_at: i64,
        metadata: Value,
    ) -> Result<IngestOutcome, DossierError> {
        let guard = self.lock_hash(&hash).await;
        let result = self
            .ingest_locked(name, text, hash, doc_type, original, modified_at, metadata)
            .await;
        drop(guard);
        self.prune_hash_locks();
        result
    }

    async fn ingest_locked(
        &self,
        name: &str,
        text: &str,
        hash: String,
        doc_type: DocumentType,
        original: bool,
        modified_at: i64,
        metadata: Value,
    ) -> Result<IngestOutcome, DossierError> {
        let existing = self
            .store
            .all_chunks()
            .await
            .map_err(|e| DossierError::unavailable("scan for duplicates", e))?;

        if existing.iter().any(|c| c.source_hash == hash) {
            self.duplicate_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(IngestOutcome::Duplicate { content_hash: hash });
        }

        // Chunk the new version before touching stored state: a rejected
        // document (e.g. whitespace-only) must leave the prior version
        // intact.
        let spans = self.chunker.split(text, doc_type)?;

        // Same path with different content: a new version replaces the old
        // chunks instead of accumulating next to them.
        let stale: Vec<String> = existing
            .iter()
            .filter(|c| c.source_path == name && c.source_hash != hash)
            .map(|c| c.id.clone())
            .collect();
        for id in &stale {
            self.store
                .delete(id)
                .await
                .map_err(|e| DossierError::unavailable("retire stale chunk", e))?;
        }

        let ingested_at = Utc::now().timestamp();
        let document = Document::new(
            name,
            hash.clone(),
            doc_type,
            modified_at,
            ingested_at,
            text.split_whitespace().count(),
            metadata.clone(),
        );

        let mut chunks_written = 0usize;
        let mut failures = Vec::new();
        for (index, span) in spans.iter().enumerate() {
            let chunk_text = span.slice(text);
            let chunk = Chunk {
                id: Chunk::chunk_id(&document.id, index as i64),
                document_id: document.id.clone(),
                chunk_index: index as i64,
                text: chunk_text.to_string(),
                start: span.start,
                end: span.end,
                original,
                doc_type,
                source_hash: hash.clone(),
                source_path: name.to_string(),
                word_count: chunk_text.split_whitespace().count(),
                ingested_at,
                metadata: metadata.clone(),
            };

            match self.embed_and_store(&chunk).await {
                Ok(()) => chunks_written += 1,
                Err(e) => failures.push(ChunkFailure {
                    chunk_id: chunk.id.clone(),
                    error: e.to_string(),
                }),
            }
        }

        Ok(IngestOutcome::Ingested(IngestReport {
            document,
            chunks_written,
            failures,
        }))
    }

    async fn embed_and_store(&self, chunk: &Chunk) -> Result<(), DossierError> {
        let vector = self
            .embedder
            .embed(&chunk.text)
            .await
            .map_err(|e| DossierError::unavailable("embed chunk", e))?;
        self.store
            .upsert(chunk, &vector)
            .await
            .map_err(|e| DossierError::unavailable("upsert chunk", e))
    }

    /// Ingest every matching file under `root`, with bounded concurrency
    /// and per-file isolation.
    pub async fn ingest_folder(
        self: &Arc<Self>,
        root: &Path,
        options: &FolderOptions,
    ) -> Result<FolderReport, DossierError> {
        if !root.is_dir() {
            return Err(DossierError::Config(format!(
                "ingest root is not a directory: {}",
                root.display()
            )));
        }

        let include_set = build_globset(&options.include_globs)?;
        let mut excludes = vec![
            "**/.git/**".to_string(),
            "**/target/**".to_string(),
            "**/node_modules/**".to_string(),
        ];
        excludes.extend(options.exclude_globs.clone());
        let exclude_set = build_globset(&excludes)?;

        let mut paths = Vec::new();
        let walker = if options.recursive {
            WalkDir::new(root)
        } else {
            WalkDir::new(root).max_depth(1)
        };
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            let rel_str = relative.to_string_lossy().to_string();
            if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
                continue;
            }
            paths.push(path.to_path_buf());
        }
        paths.sort();

        let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
        let mut tasks = JoinSet::new();
        for path in paths {
            let pipeline = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                // Semaphore is never closed while tasks run.
                let _permit = semaphore.acquire_owned().await;
                let outcome = pipeline.ingest_file(&path, Value::Null).await;
                (path.display().to_string(), outcome)
            });
        }

        let mut report = FolderReport::default();
        while let Some(joined) = tasks.join_next().await {
            let (path, outcome) = joined
                .map_err(|e| DossierError::Unavailable(format!("ingest task panicked: {e}")))?;
            match outcome {
                Ok(IngestOutcome::Ingested(_)) => report.ingested.push(path),
                Ok(IngestOutcome::Duplicate { .. }) => report.duplicates.push(path),
                Err(e) => report.failed.push(FileFailure {
                    path,
                    error: e.to_string(),
                }),
            }
        }
        report.ingested.sort();
        report.duplicates.sort();
        report.failed.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(report)
    }

    /// Check whether the on-disk source still matches its stored hash.
    pub async fn verify(&self, path: &Path) -> Result<IntegrityStatus, DossierError> {
        let name = path.display().to_string();
        let chunks = self
            .store
            .all_chunks()
            .await
            .map_err(|e| DossierError::unavailable("scan for verify", e))?;

        let stored = match chunks.iter().find(|c| c.source_path == name) {
            Some(chunk) => chunk.source_hash.clone(),
            None => return Ok(IntegrityStatus::NotFound),
        };

        let bytes = std::fs::read(path).map_err(|source| DossierError::Io {
            path: name.clone(),
            source,
        })?;
        let actual = content_hash(&bytes);
        if actual == stored {
            Ok(IntegrityStatus::Match)
        } else {
            Ok(IntegrityStatus::Mismatch { stored, actual })
        }
    }

    /// Like [`verify`](Self::verify), but a mismatch is an error.
    pub async fn verify_strict(&self, path: &Path) -> Result<IntegrityStatus, DossierError> {
        match self.verify(path).await? {
            IntegrityStatus::Mismatch { stored, actual } => Err(DossierError::IntegrityMismatch {
                path: path.display().to_string(),
                stored,
                actual,
            }),
            status => Ok(status),
        }
    }

    /// Enumerate ingested source documents, one summary per source path.
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>, DossierError> {
        let chunks = self
            .store
            .all_chunks()
            .await
            .map_err(|e| DossierError::unavailable("scan for document list", e))?;

        let mut by_path: HashMap<String, DocumentSummary> = HashMap::new();
        for chunk in &chunks {
            by_path
                .entry(chunk.source_path.clone())
                .and_modify(|summary| {
                    summary.chunks += 1;
                    summary.ingested_at = summary.ingested_at.min(chunk.ingested_at);
                })
                .or_insert_with(|| DocumentSummary {
                    path: chunk.source_path.clone(),
                    content_hash: chunk.source_hash.clone(),
                    doc_type: chunk.doc_type,
                    chunks: 1,
                    ingested_at: chunk.ingested_at,
                });
        }

        let mut out: Vec<DocumentSummary> = by_path.into_values().collect();
        out.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(out)
    }

    /// Remove every chunk ingested for `path`. Returns the number of chunks
    /// deleted; zero means no document was stored under that path.
    pub async fn remove_document(&self, path: &str) -> Result<usize, DossierError> {
        let chunks = self
            .store
            .all_chunks()
            .await
            .map_err(|e| DossierError::unavailable("scan for removal", e))?;

        let doomed: Vec<String> = chunks
            .iter()
            .filter(|c| c.source_path == path)
            .map(|c| c.id.clone())
            .collect();
        for id in &doomed {
            self.store
                .delete(id)
                .await
                .map_err(|e| DossierError::unavailable("remove chunk", e))?;
        }
        Ok(doomed.len())
    }

    async fn lock_hash(&self, hash: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.hash_locks.lock().unwrap();
            Arc::clone(
                locks
                    .entry(hash.to_string())
                    .or_insert_with(|| Arc::new(TokioMutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Drop registry entries no task holds anymore, so the map does not
    /// grow by one entry per distinct content hash ever seen.
    fn prune_hash_locks(&self) {
        let mut locks = self.hash_locks.lock().unwrap();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    fn hash_lock_count(&self) -> usize {
        self.hash_locks.lock().unwrap().len()
    }
}

fn file_mtime(path: &Path) -> i64 {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(std::time::SystemTime::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or_else(|| Utc::now().timestamp())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, DossierError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| DossierError::Config(format!("bad glob pattern {pattern}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| DossierError::Config(format!("could not build glob set: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashedEmbedder;
    use dossier_core::chunk::DefaultChunker;
    use dossier_core::store::memory::InMemoryStore;

    fn pipeline() -> IngestPipeline<InMemoryStore, HashedEmbedder> {
        IngestPipeline::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(HashedEmbedder::default()),
            Arc::new(DefaultChunker::new(50, 5)),
        )
    }

    #[tokio::test]
    async fn test_hash_lock_registry_does_not_grow() {
        let pipeline = pipeline();
        for i in 0..10 {
            pipeline
                .ingest_text(
                    &format!("note-{i}"),
                    &format!("distinct note number {i}"),
                    None,
                    true,
                    Value::Null,
                )
                .await
                .unwrap();
        }
        assert_eq!(pipeline.hash_lock_count(), 0);
    }

    #[tokio::test]
    async fn test_hash_lock_pruned_after_duplicate() {
        let pipeline = pipeline();
        pipeline
            .ingest_text("a", "same content", None, true, Value::Null)
            .await
            .unwrap();
        let outcome = pipeline
            .ingest_text("b", "same content", None, true, Value::Null)
            .await
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Duplicate { .. }));
        assert_eq!(pipeline.hash_lock_count(), 0);
    }
}
