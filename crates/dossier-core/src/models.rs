//! Core data models used throughout Dossier.
//!
//! These types represent the documents and chunks that flow through the
//! ingestion and retrieval pipeline. Documents are immutable once ingested;
//! re-ingestion with an identical content hash is a no-op, re-ingestion with
//! a changed hash creates a new version and retires the prior chunks.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Inferred category of a source document.
///
/// Drives adaptive chunking and the document-type boost during re-ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Resume,
    CoverLetter,
    Project,
    Code,
    Documentation,
    Profile,
    Generic,
}

/// File extensions treated as source code.
const CODE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "java", "cpp", "c", "h", "cs", "php", "rb", "go", "rs",
];

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::CoverLetter => "cover_letter",
            DocumentType::Project => "project",
            DocumentType::Code => "code",
            DocumentType::Documentation => "documentation",
            DocumentType::Profile => "profile",
            DocumentType::Generic => "generic",
        }
    }

    /// Infer the document type from its path and content.
    ///
    /// Filename keywords win over extensions, extensions win over content
    /// heuristics. Falls back to [`DocumentType::Generic`].
    pub fn infer(path: &str, content: &str) -> Self {
        let name = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path)
            .to_lowercase();

        if name.contains("resume") || name.contains("cv") {
            return DocumentType::Resume;
        }
        if name.contains("cover") || name.contains("letter") {
            return DocumentType::CoverLetter;
        }
        if name.contains("project") || name.contains("portfolio") {
            return DocumentType::Project;
        }
        if name.contains("profile") || name.contains("work_history") || name.contains("summary") {
            return DocumentType::Profile;
        }
        if name.contains("readme") {
            return DocumentType::Documentation;
        }

        if let Some(ext) = name.rsplit('.').next() {
            if CODE_EXTENSIONS.contains(&ext) {
                return DocumentType::Code;
            }
            if ext == "md" || ext == "rst" {
                return DocumentType::Documentation;
            }
        }

        if looks_like_code(content) {
            return DocumentType::Code;
        }
        let lower = content.to_lowercase();
        if ["experience", "education", "skills", "employment"]
            .iter()
            .any(|kw| lower.contains(kw))
        {
            return DocumentType::Resume;
        }

        DocumentType::Generic
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cheap structural check for source-code content.
pub fn looks_like_code(content: &str) -> bool {
    const INDICATORS: &[&str] = &[
        "def ", "function ", "class ", "import ", "#include", "public class", "fn ", "impl ",
        "#!/", "<?php",
    ];
    let lower = content.to_lowercase();
    INDICATORS.iter().any(|ind| lower.contains(ind))
}

/// SHA-256 digest of raw source bytes, hex-encoded.
///
/// Used for deduplication on ingest and integrity verification afterwards.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// A user-supplied source artifact, immutable once ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// UUID assigned at ingestion time.
    pub id: String,
    /// Path or logical name of the source.
    pub path: String,
    /// SHA-256 over the raw source bytes.
    pub content_hash: String,
    pub doc_type: DocumentType,
    /// Source modification time (Unix seconds), where known.
    pub modified_at: i64,
    /// Ingestion time (Unix seconds).
    pub ingested_at: i64,
    pub word_count: usize,
    /// User-supplied key-value metadata.
    pub metadata: Value,
}

impl Document {
    pub fn new(
        path: &str,
        content_hash: String,
        doc_type: DocumentType,
        modified_at: i64,
        ingested_at: i64,
        word_count: usize,
        metadata: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            path: path.to_string(),
            content_hash,
            doc_type,
            modified_at,
            ingested_at,
            word_count,
            metadata,
        }
    }
}

/// A contiguous span of a document's text plus provenance metadata.
///
/// Invariants: chunk ids are stable across re-chunking with the same
/// strategy (`{document_id}:{index:04}`); `text` equals the source slice
/// `[start, end)`; overlapping neighbours share boundary text byte-for-byte
/// because both are slices of the same source string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub document_id: String,
    pub chunk_index: i64,
    pub text: String,
    /// Byte offset of the span start in the source document.
    pub start: usize,
    /// Byte offset one past the span end.
    pub end: usize,
    /// True for verbatim source text, false for derived (e.g. summarized)
    /// representations.
    pub original: bool,
    pub doc_type: DocumentType,
    /// Content hash of the parent document.
    pub source_hash: String,
    /// Path or logical name of the parent document.
    pub source_path: String,
    pub word_count: usize,
    pub ingested_at: i64,
    pub metadata: Value,
}

impl Chunk {
    /// Deterministic chunk id derived from the parent document and index.
    pub fn chunk_id(document_id: &str, index: i64) -> String {
        format!("{}:{:04}", document_id, index)
    }
}
