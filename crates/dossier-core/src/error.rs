//! Typed error taxonomy for the retrieval core.
//!
//! Duplicate ingestion is deliberately not represented here: it is an
//! informational outcome (`IngestOutcome::Duplicate` in the app crate),
//! not a failure. Every variant carries enough context (path, chunk id,
//! query text) to be actionable without re-running with added logging.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DossierError {
    /// Source bytes could not be decoded by any supported encoding
    /// (UTF-8, UTF-16 with BOM, Latin-1; binary content is rejected).
    #[error("could not decode {path} with any supported encoding")]
    Encoding { path: String },

    /// A chunking strategy produced invalid output (empty spans,
    /// out-of-bounds offsets, overlap beyond the declared budget).
    #[error("chunking failed: {0}")]
    Chunking(String),

    /// Malformed query input (empty text, zero limit).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The backing vector store or embedder is unreachable or failed.
    /// Never retried internally; retry policy belongs to the caller.
    #[error("retrieval backend unavailable: {0}")]
    Unavailable(String),

    /// Verification found the source changed since ingestion.
    #[error("source integrity mismatch for {path}: stored hash {stored}, actual {actual}")]
    IntegrityMismatch {
        path: String,
        stored: String,
        actual: String,
    },

    /// Invalid configuration (bad glob pattern, unknown strategy name).
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DossierError {
    /// Wrap a store or embedder failure, preserving the failing operation.
    pub fn unavailable(op: &str, err: anyhow::Error) -> Self {
        DossierError::Unavailable(format!("{op}: {err}"))
    }
}
