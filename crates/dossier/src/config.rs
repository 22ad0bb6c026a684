use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use dossier_core::chunk::{
    AdaptiveChunker, ChunkStrategy, CodeChunker, DefaultChunker, SemanticChunker,
};
use dossier_core::retrieve::ScoringWeights;

use crate::ingest::FolderOptions;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    #[serde(default = "default_overlap_words")]
    pub overlap_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            max_words: default_max_words(),
            overlap_words: default_overlap_words(),
        }
    }
}

fn default_strategy() -> String {
    "adaptive".to_string()
}
fn default_max_words() -> usize {
    200
}
fn default_overlap_words() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_similarity_weight")]
    pub similarity_weight: f64,
    #[serde(default = "default_original_weight")]
    pub original_weight: f64,
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,
    #[serde(default = "default_type_match_weight")]
    pub type_match_weight: f64,
    #[serde(default = "default_feedback_cap")]
    pub feedback_cap: f64,
    #[serde(default = "default_candidate_factor")]
    pub candidate_factor: usize,
    #[serde(default = "default_recency_half_life_days")]
    pub recency_half_life_days: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            similarity_weight: default_similarity_weight(),
            original_weight: default_original_weight(),
            recency_weight: default_recency_weight(),
            type_match_weight: default_type_match_weight(),
            feedback_cap: default_feedback_cap(),
            candidate_factor: default_candidate_factor(),
            recency_half_life_days: default_recency_half_life_days(),
        }
    }
}

fn default_similarity_weight() -> f64 {
    1.0
}
fn default_original_weight() -> f64 {
    0.15
}
fn default_recency_weight() -> f64 {
    0.10
}
fn default_type_match_weight() -> f64 {
    0.10
}
fn default_feedback_cap() -> f64 {
    0.25
}
fn default_candidate_factor() -> usize {
    4
}
fn default_recency_half_life_days() -> f64 {
    30.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            recursive: default_recursive(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string(), "**/*.txt".to_string()]
}
fn default_recursive() -> bool {
    true
}
fn default_concurrency() -> usize {
    4
}

impl Config {
    /// Build the configured chunking strategy.
    pub fn chunker(&self) -> Result<Arc<dyn ChunkStrategy>> {
        let max = self.chunking.max_words;
        let overlap = self.chunking.overlap_words;
        let chunker: Arc<dyn ChunkStrategy> = match self.chunking.strategy.as_str() {
            "default" => Arc::new(DefaultChunker::new(max, overlap)),
            "semantic" => Arc::new(SemanticChunker::new(max, overlap)),
            "code" => Arc::new(CodeChunker::new(max)),
            "adaptive" => Arc::new(AdaptiveChunker::new(max, overlap)),
            other => anyhow::bail!(
                "Unknown chunking strategy: '{}'. Must be default, semantic, code, or adaptive.",
                other
            ),
        };
        Ok(chunker)
    }

    /// Scoring weights for the retrieval engine.
    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights {
            similarity: self.retrieval.similarity_weight,
            original: self.retrieval.original_weight,
            recency: self.retrieval.recency_weight,
            type_match: self.retrieval.type_match_weight,
            feedback_cap: self.retrieval.feedback_cap,
            candidate_factor: self.retrieval.candidate_factor,
            recency_half_life_days: self.retrieval.recency_half_life_days,
        }
    }

    /// Folder ingestion options.
    pub fn folder_options(&self) -> FolderOptions {
        FolderOptions {
            include_globs: self.ingest.include_globs.clone(),
            exclude_globs: self.ingest.exclude_globs.clone(),
            recursive: self.ingest.recursive,
            concurrency: self.ingest.concurrency,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate chunking
    if config.chunking.max_words == 0 {
        anyhow::bail!("chunking.max_words must be > 0");
    }
    if config.chunking.overlap_words >= config.chunking.max_words {
        anyhow::bail!("chunking.overlap_words must be < chunking.max_words");
    }
    config.chunker()?;

    // Validate retrieval
    if config.retrieval.candidate_factor < 1 {
        anyhow::bail!("retrieval.candidate_factor must be >= 1");
    }
    if !(0.0..=1.0).contains(&config.retrieval.feedback_cap) {
        anyhow::bail!("retrieval.feedback_cap must be in [0.0, 1.0]");
    }
    if config.retrieval.recency_half_life_days <= 0.0 {
        anyhow::bail!("retrieval.recency_half_life_days must be > 0");
    }

    // Validate ingest
    if config.ingest.concurrency == 0 {
        anyhow::bail!("ingest.concurrency must be >= 1");
    }
    if config.ingest.include_globs.is_empty() {
        anyhow::bail!("ingest.include_globs must not be empty");
    }

    Ok(config)
}
