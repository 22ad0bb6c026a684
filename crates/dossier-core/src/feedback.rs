//! Append-only relevance feedback log.
//!
//! Feedback influences future scoring as an additive signal folded in by a
//! pure function, never by mutating stored chunks: records are appended and
//! never rewritten, which keeps composite scores reproducible for a given
//! log state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLabel {
    Positive,
    Negative,
}

/// One user judgement about a retrieved chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub query: String,
    pub chunk_id: String,
    pub label: FeedbackLabel,
    pub timestamp: i64,
}

/// Append-only sequence of feedback records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackLog {
    records: Vec<FeedbackRecord>,
}

impl FeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: FeedbackRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Canonical form used to decide whether two queries count as the same:
/// lowercased with whitespace collapsed.
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Fold the log into a bounded additive boost for `(query, chunk_id)`.
///
/// Aggregates net positive feedback for the normalized query and maps it
/// into `[0, cap)` via `cap · net / (net + 1)`, so feedback can never
/// outweigh raw similarity beyond the configured cap. Net non-positive
/// feedback contributes nothing (the base score is never reduced below the
/// similarity signal by feedback alone).
pub fn feedback_boost(log: &FeedbackLog, query: &str, chunk_id: &str, cap: f64) -> f64 {
    if cap <= 0.0 || log.is_empty() {
        return 0.0;
    }
    let norm = normalize_query(query);
    let mut net: i64 = 0;
    for record in log.records() {
        if record.chunk_id == chunk_id && normalize_query(&record.query) == norm {
            match record.label {
                FeedbackLabel::Positive => net += 1,
                FeedbackLabel::Negative => net -= 1,
            }
        }
    }
    if net <= 0 {
        return 0.0;
    }
    cap * net as f64 / (net as f64 + 1.0)
}
