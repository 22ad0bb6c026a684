//! Retrieval engine with nearest, multi-stage, clustered, and personalized
//! strategies.
//!
//! The engine operates entirely through the [`VectorStore`] and [`Embedder`]
//! traits, with no storage or configuration dependencies. Callers construct
//! [`QueryOptions`] and receive either a [`RetrievalResult`] or a typed
//! error, never a partial success.
//!
//! # Multi-stage scoring
//!
//! 1. Fetch `candidate_factor × limit` nearest neighbours.
//! 2. Re-score each candidate with a composite score:
//!    `w1·similarity + w2·[original] + w3·recency + w4·type_match + feedback`.
//! 3. Sort by score (desc), raw distance (asc), ingestion time (asc), id (asc).
//! 4. Truncate to `limit`.
//!
//! All boosts are bounded in `[0, 1]`; the feedback term is capped so
//! aggregated feedback can never override semantic relevance entirely.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::Serialize;

use crate::embedding::Embedder;
use crate::error::DossierError;
use crate::feedback::{feedback_boost, FeedbackLabel, FeedbackLog, FeedbackRecord};
use crate::models::{Chunk, DocumentType};
use crate::store::{ChunkFilter, Neighbor, VectorStore};

/// Scoring weights for composite re-ranking.
///
/// These are tuning configuration, not contracts: tests assert the
/// monotonicity properties of the ranking, never exact scores.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Weight of the similarity term (monotonic transform of distance).
    pub similarity: f64,
    /// Bonus weight for verbatim source content.
    pub original: f64,
    /// Weight of the recency boost.
    pub recency: f64,
    /// Weight of the query/document-type match boost.
    pub type_match: f64,
    /// Upper bound on the additive feedback term.
    pub feedback_cap: f64,
    /// Broad-candidate multiplier for multi-stage retrieval.
    pub candidate_factor: usize,
    /// Half-life of the recency boost, in days.
    pub recency_half_life_days: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            similarity: 1.0,
            original: 0.15,
            recency: 0.10,
            type_match: 0.10,
            feedback_cap: 0.25,
            candidate_factor: 4,
            recency_half_life_days: 30.0,
        }
    }
}

/// Retrieval strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStrategy {
    /// Raw nearest-neighbour order, no re-ranking.
    Nearest,
    /// Broad retrieval plus composite re-scoring.
    MultiStage,
    /// Round-robin selection across (type, document) clusters for diversity.
    Clustered,
    /// Multi-stage with preference-derived boosts.
    Personalized,
}

/// Stored user preferences applied by the personalized strategy.
#[derive(Debug, Clone, Default)]
pub struct UserPreferences {
    pub preferred_types: Vec<DocumentType>,
    /// Double the recency weighting for this user.
    pub prefer_recent: bool,
}

impl UserPreferences {
    fn is_empty(&self) -> bool {
        self.preferred_types.is_empty() && !self.prefer_recent
    }
}

/// Free-text query configuration.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub limit: usize,
    pub strategy: RetrievalStrategy,
    pub filter: Option<ChunkFilter>,
    pub preferences: Option<UserPreferences>,
}

impl QueryOptions {
    pub fn new(limit: usize, strategy: RetrievalStrategy) -> Self {
        Self {
            limit,
            strategy,
            filter: None,
            preferences: None,
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::new(5, RetrievalStrategy::MultiStage)
    }
}

/// One ranked retrieval hit.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Composite relevance score; higher is more relevant.
    pub score: f64,
    /// Raw cosine distance from the store.
    pub distance: f64,
}

/// Ranked sequence of chunks for one query.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResult {
    pub query: String,
    pub items: Vec<ScoredChunk>,
}

/// Monotonic transform of cosine distance into a `[0, 1]` similarity.
pub fn similarity(distance: f64) -> f64 {
    1.0 - distance.clamp(0.0, 2.0) / 2.0
}

/// Exponential-decay recency boost in `(0, 1]`.
fn recency_boost(age_secs: i64, half_life_days: f64) -> f64 {
    if age_secs <= 0 || half_life_days <= 0.0 {
        return 1.0;
    }
    let age_days = age_secs as f64 / 86_400.0;
    0.5f64.powf(age_days / half_life_days)
}

/// 1.0 when the query mentions the document's category, else 0.0.
fn type_match_boost(query_lower: &str, doc_type: DocumentType) -> f64 {
    let keywords: &[&str] = match doc_type {
        DocumentType::Resume => &["resume", "cv", "experience", "skills", "employment"],
        DocumentType::CoverLetter => &["cover", "letter", "motivation"],
        DocumentType::Project => &["project", "portfolio"],
        DocumentType::Code => &["code", "function", "implementation"],
        DocumentType::Documentation => &["documentation", "readme", "docs"],
        DocumentType::Profile => &["profile", "background", "summary"],
        DocumentType::Generic => &[],
    };
    if keywords.iter().any(|kw| query_lower.contains(kw)) {
        1.0
    } else {
        0.0
    }
}

/// Retrieval engine over a vector store and an embedding provider.
///
/// Read-only with respect to documents and chunks; the only state it writes
/// is the append-only feedback log.
pub struct RetrievalEngine<S, E> {
    store: Arc<S>,
    embedder: Arc<E>,
    weights: ScoringWeights,
    feedback: RwLock<FeedbackLog>,
}

impl<S: VectorStore, E: Embedder> RetrievalEngine<S, E> {
    pub fn new(store: Arc<S>, embedder: Arc<E>, weights: ScoringWeights) -> Self {
        Self {
            store,
            embedder,
            weights,
            feedback: RwLock::new(FeedbackLog::new()),
        }
    }

    /// Run a query with the strategy selected in `options`.
    ///
    /// Fails fast with [`DossierError::InvalidQuery`] on empty input, before
    /// any embedding or store call is issued. Store and embedder failures
    /// surface as [`DossierError::Unavailable`].
    pub async fn query(
        &self,
        text: &str,
        options: &QueryOptions,
    ) -> Result<RetrievalResult, DossierError> {
        if text.trim().is_empty() {
            return Err(DossierError::InvalidQuery(
                "query text is empty".to_string(),
            ));
        }
        if options.limit == 0 {
            return Err(DossierError::InvalidQuery(
                "result limit must be at least 1".to_string(),
            ));
        }

        let query_vec = self
            .embedder
            .embed(text)
            .await
            .map_err(|e| DossierError::unavailable("embed query", e))?;

        let items = match options.strategy {
            RetrievalStrategy::Nearest => self.nearest(text, &query_vec, options).await?,
            RetrievalStrategy::MultiStage => {
                self.multi_stage(text, &query_vec, options, None).await?
            }
            RetrievalStrategy::Clustered => self.clustered(text, &query_vec, options).await?,
            RetrievalStrategy::Personalized => {
                // Fall back to plain multi-stage when no preferences are set.
                let prefs = options.preferences.as_ref().filter(|p| !p.is_empty());
                self.multi_stage(text, &query_vec, options, prefs).await?
            }
        };

        Ok(RetrievalResult {
            query: text.to_string(),
            items,
        })
    }

    /// Append a relevance judgement to the feedback log.
    pub async fn record_feedback(
        &self,
        query: &str,
        chunk_id: &str,
        label: FeedbackLabel,
    ) -> Result<(), DossierError> {
        let known = self
            .store
            .get(chunk_id)
            .await
            .map_err(|e| DossierError::unavailable("get chunk for feedback", e))?;
        if known.is_none() {
            return Err(DossierError::InvalidQuery(format!(
                "feedback for unknown chunk id {chunk_id}"
            )));
        }
        let record = FeedbackRecord {
            query: query.to_string(),
            chunk_id: chunk_id.to_string(),
            label,
            timestamp: Utc::now().timestamp(),
        };
        self.feedback.write().unwrap().append(record);
        Ok(())
    }

    /// Snapshot of the feedback log (for persistence by the caller).
    pub fn feedback_log(&self) -> FeedbackLog {
        self.feedback.read().unwrap().clone()
    }

    async fn fetch(
        &self,
        query_vec: &[f32],
        k: usize,
        filter: Option<&ChunkFilter>,
    ) -> Result<Vec<Neighbor>, DossierError> {
        self.store
            .nearest_neighbors(query_vec, k, filter)
            .await
            .map_err(|e| DossierError::unavailable("nearest_neighbors", e))
    }

    async fn nearest(
        &self,
        _text: &str,
        query_vec: &[f32],
        options: &QueryOptions,
    ) -> Result<Vec<ScoredChunk>, DossierError> {
        let neighbors = self
            .fetch(query_vec, options.limit, options.filter.as_ref())
            .await?;
        Ok(neighbors
            .into_iter()
            .map(|n| ScoredChunk {
                score: similarity(n.distance),
                distance: n.distance,
                chunk: n.chunk,
            })
            .collect())
    }

    fn composite(
        &self,
        query_lower: &str,
        now: i64,
        neighbor: &Neighbor,
        prefs: Option<&UserPreferences>,
        log: &FeedbackLog,
    ) -> f64 {
        let w = &self.weights;
        let chunk = &neighbor.chunk;
        let recency = recency_boost(now - chunk.ingested_at, w.recency_half_life_days);

        let mut score = w.similarity * similarity(neighbor.distance)
            + w.original * if chunk.original { 1.0 } else { 0.0 }
            + w.recency * recency
            + w.type_match * type_match_boost(query_lower, chunk.doc_type);

        if let Some(p) = prefs {
            if p.preferred_types.contains(&chunk.doc_type) {
                score += w.type_match;
            }
            if p.prefer_recent {
                score += w.recency * recency;
            }
        }

        score + feedback_boost(log, query_lower, &chunk.id, w.feedback_cap)
    }

    async fn multi_stage(
        &self,
        text: &str,
        query_vec: &[f32],
        options: &QueryOptions,
        prefs: Option<&UserPreferences>,
    ) -> Result<Vec<ScoredChunk>, DossierError> {
        let k = options.limit * self.weights.candidate_factor.max(1);
        let neighbors = self.fetch(query_vec, k, options.filter.as_ref()).await?;

        let query_lower = text.to_lowercase();
        let now = Utc::now().timestamp();
        let log = self.feedback.read().unwrap().clone();

        let mut scored: Vec<ScoredChunk> = neighbors
            .into_iter()
            .map(|n| ScoredChunk {
                score: self.composite(&query_lower, now, &n, prefs, &log),
                distance: n.distance,
                chunk: n.chunk,
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.distance
                        .partial_cmp(&b.distance)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.chunk.ingested_at.cmp(&b.chunk.ingested_at))
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        scored.truncate(options.limit);
        Ok(scored)
    }

    /// Round-robin selection across (document type, source document)
    /// clusters, largest cluster first, until `limit` results are filled.
    async fn clustered(
        &self,
        _text: &str,
        query_vec: &[f32],
        options: &QueryOptions,
    ) -> Result<Vec<ScoredChunk>, DossierError> {
        let k = options.limit * self.weights.candidate_factor.max(1);
        let neighbors = self.fetch(query_vec, k, options.filter.as_ref()).await?;

        let mut groups: HashMap<(&'static str, String), Vec<Neighbor>> = HashMap::new();
        for n in neighbors {
            groups
                .entry((n.chunk.doc_type.as_str(), n.chunk.document_id.clone()))
                .or_default()
                .push(n);
        }

        let mut clusters: Vec<((&'static str, String), Vec<Neighbor>)> =
            groups.into_iter().collect();
        for (_, members) in clusters.iter_mut() {
            members.sort_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.chunk.id.cmp(&b.chunk.id))
            });
        }
        clusters.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));

        let mut out = Vec::with_capacity(options.limit);
        let mut round = 0usize;
        while out.len() < options.limit {
            let mut picked_any = false;
            for (_, members) in &clusters {
                if let Some(n) = members.get(round) {
                    out.push(ScoredChunk {
                        score: similarity(n.distance),
                        distance: n.distance,
                        chunk: n.chunk.clone(),
                    });
                    picked_any = true;
                    if out.len() == options.limit {
                        break;
                    }
                }
            }
            if !picked_any {
                break;
            }
            round += 1;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    /// Maps text onto fixed topic axes so tests control similarity exactly.
    struct TopicEmbedder;

    #[async_trait]
    impl Embedder for TopicEmbedder {
        fn dims(&self) -> usize {
            4
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            let mut v = vec![0.0f32; 4];
            if lower.contains("rust") {
                v[0] = 1.0;
            }
            if lower.contains("python") {
                v[1] = 1.0;
            }
            if lower.contains("deploy") {
                v[2] = 1.0;
            }
            v[3] = 0.1;
            Ok(v)
        }
    }

    /// Every operation fails; used to prove code paths issue no store call.
    struct UnreachableStore;

    #[async_trait]
    impl VectorStore for UnreachableStore {
        async fn upsert(&self, _chunk: &Chunk, _embedding: &[f32]) -> Result<()> {
            Err(anyhow!("store must not be called"))
        }
        async fn nearest_neighbors(
            &self,
            _embedding: &[f32],
            _k: usize,
            _filter: Option<&ChunkFilter>,
        ) -> Result<Vec<Neighbor>> {
            Err(anyhow!("store must not be called"))
        }
        async fn get(&self, _chunk_id: &str) -> Result<Option<Chunk>> {
            Err(anyhow!("store must not be called"))
        }
        async fn delete(&self, _chunk_id: &str) -> Result<()> {
            Err(anyhow!("store must not be called"))
        }
        async fn all_chunks(&self) -> Result<Vec<Chunk>> {
            Err(anyhow!("store must not be called"))
        }
    }

    fn chunk(
        id: &str,
        doc_id: &str,
        doc_type: DocumentType,
        original: bool,
        text: &str,
        ingested_at: i64,
    ) -> Chunk {
        Chunk {
            id: id.to_string(),
            document_id: doc_id.to_string(),
            chunk_index: 0,
            text: text.to_string(),
            start: 0,
            end: text.len(),
            original,
            doc_type,
            source_hash: format!("{doc_id}-hash"),
            source_path: format!("{doc_id}.txt"),
            word_count: text.split_whitespace().count(),
            ingested_at,
            metadata: serde_json::json!({}),
        }
    }

    async fn seeded_engine() -> RetrievalEngine<InMemoryStore, TopicEmbedder> {
        let store = Arc::new(InMemoryStore::new());
        let embedder = Arc::new(TopicEmbedder);
        let now = Utc::now().timestamp();

        // Three documents, two chunks each, all on the "rust" axis with
        // slightly different off-axis components so distances differ.
        let seeds: &[(&str, &str, DocumentType, f32)] = &[
            ("d1:0000", "d1", DocumentType::Resume, 0.00),
            ("d1:0001", "d1", DocumentType::Resume, 0.05),
            ("d2:0000", "d2", DocumentType::Project, 0.10),
            ("d2:0001", "d2", DocumentType::Project, 0.15),
            ("d3:0000", "d3", DocumentType::Code, 0.20),
            ("d3:0001", "d3", DocumentType::Code, 0.25),
        ];
        for (id, doc, ty, off) in seeds {
            let c = chunk(id, doc, *ty, true, "rust work sample", now);
            store.upsert(&c, &[1.0, *off, 0.0, 0.1]).await.unwrap();
        }
        RetrievalEngine::new(store, embedder, ScoringWeights::default())
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_store_call() {
        let engine = RetrievalEngine::new(
            Arc::new(UnreachableStore),
            Arc::new(TopicEmbedder),
            ScoringWeights::default(),
        );
        let err = engine.query("   ", &QueryOptions::default()).await;
        assert!(matches!(err, Err(DossierError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_zero_limit_rejected() {
        let engine = RetrievalEngine::new(
            Arc::new(UnreachableStore),
            Arc::new(TopicEmbedder),
            ScoringWeights::default(),
        );
        let opts = QueryOptions::new(0, RetrievalStrategy::Nearest);
        let err = engine.query("rust", &opts).await;
        assert!(matches!(err, Err(DossierError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_unavailable() {
        let engine = RetrievalEngine::new(
            Arc::new(UnreachableStore),
            Arc::new(TopicEmbedder),
            ScoringWeights::default(),
        );
        let err = engine.query("rust", &QueryOptions::default()).await;
        assert!(matches!(err, Err(DossierError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_nearest_orders_by_distance() {
        let engine = seeded_engine().await;
        let opts = QueryOptions::new(4, RetrievalStrategy::Nearest);
        let result = engine.query("rust", &opts).await.unwrap();
        assert_eq!(result.items.len(), 4);
        for pair in result.items.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[tokio::test]
    async fn test_multi_stage_returns_min_of_limit_and_available() {
        let engine = seeded_engine().await;
        let opts = QueryOptions::new(5, RetrievalStrategy::MultiStage);
        let result = engine.query("rust", &opts).await.unwrap();
        assert_eq!(result.items.len(), 5);

        let opts = QueryOptions::new(50, RetrievalStrategy::MultiStage);
        let result = engine.query("rust", &opts).await.unwrap();
        assert_eq!(result.items.len(), 6);
    }

    #[tokio::test]
    async fn test_multi_stage_scores_non_increasing() {
        let engine = seeded_engine().await;
        let opts = QueryOptions::new(6, RetrievalStrategy::MultiStage);
        let result = engine.query("rust experience", &opts).await.unwrap();
        for pair in result.items.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_multi_stage_boosts_original_content() {
        let store = Arc::new(InMemoryStore::new());
        let now = Utc::now().timestamp();
        let original = chunk("d1:0000", "d1", DocumentType::Generic, true, "rust", now);
        let derived = chunk("d2:0000", "d2", DocumentType::Generic, false, "rust", now);
        // Identical vectors: only the original flag separates them.
        store.upsert(&original, &[1.0, 0.0, 0.0, 0.1]).await.unwrap();
        store.upsert(&derived, &[1.0, 0.0, 0.0, 0.1]).await.unwrap();

        let engine = RetrievalEngine::new(store, Arc::new(TopicEmbedder), ScoringWeights::default());
        let opts = QueryOptions::new(2, RetrievalStrategy::MultiStage);
        let result = engine.query("rust", &opts).await.unwrap();
        assert_eq!(result.items[0].chunk.id, "d1:0000");
        assert!(result.items[0].score > result.items[1].score);
    }

    #[tokio::test]
    async fn test_clustered_diversity_across_three_documents() {
        let engine = seeded_engine().await;
        let opts = QueryOptions::new(6, RetrievalStrategy::Clustered);
        let result = engine.query("rust", &opts).await.unwrap();
        assert_eq!(result.items.len(), 6);

        // 3 clusters, limit 6: at most ceil(6/3) = 2 consecutive results
        // from the same source document.
        let mut max_run = 1;
        let mut run = 1;
        for pair in result.items.windows(2) {
            if pair[0].chunk.document_id == pair[1].chunk.document_id {
                run += 1;
                max_run = max_run.max(run);
            } else {
                run = 1;
            }
        }
        assert!(max_run <= 2, "run of {max_run} from one document");

        // All three documents are represented.
        let docs: std::collections::HashSet<_> = result
            .items
            .iter()
            .map(|s| s.chunk.document_id.clone())
            .collect();
        assert_eq!(docs.len(), 3);
    }

    #[tokio::test]
    async fn test_personalized_prefers_configured_type() {
        let store = Arc::new(InMemoryStore::new());
        let now = Utc::now().timestamp();
        let resume = chunk("d1:0000", "d1", DocumentType::Resume, true, "rust", now);
        let code = chunk("d2:0000", "d2", DocumentType::Code, true, "rust", now);
        // The code chunk sits slightly closer to the query vector, so the
        // preference boost is what flips the order.
        store.upsert(&resume, &[1.0, 0.0, 0.0, 0.2]).await.unwrap();
        store.upsert(&code, &[1.0, 0.0, 0.0, 0.1]).await.unwrap();

        let engine = RetrievalEngine::new(store, Arc::new(TopicEmbedder), ScoringWeights::default());
        let mut opts = QueryOptions::new(2, RetrievalStrategy::Personalized);
        opts.preferences = Some(UserPreferences {
            preferred_types: vec![DocumentType::Resume],
            prefer_recent: false,
        });
        let result = engine.query("rust", &opts).await.unwrap();
        assert_eq!(result.items[0].chunk.doc_type, DocumentType::Resume);
    }

    #[tokio::test]
    async fn test_personalized_without_preferences_matches_multi_stage() {
        let engine = seeded_engine().await;
        let plain = engine
            .query("rust", &QueryOptions::new(4, RetrievalStrategy::MultiStage))
            .await
            .unwrap();
        let personalized = engine
            .query(
                "rust",
                &QueryOptions::new(4, RetrievalStrategy::Personalized),
            )
            .await
            .unwrap();
        let plain_ids: Vec<_> = plain.items.iter().map(|s| s.chunk.id.clone()).collect();
        let pers_ids: Vec<_> = personalized
            .items
            .iter()
            .map(|s| s.chunk.id.clone())
            .collect();
        assert_eq!(plain_ids, pers_ids);
    }

    #[tokio::test]
    async fn test_feedback_raises_rank_within_cap() {
        let engine = seeded_engine().await;
        let opts = QueryOptions::new(6, RetrievalStrategy::MultiStage);

        let before = engine.query("rust", &opts).await.unwrap();
        let target = "d3:0001"; // worst-ranked chunk
        let rank_before = before
            .items
            .iter()
            .position(|s| s.chunk.id == target)
            .unwrap();
        let score_before = before.items[rank_before].score;

        for _ in 0..3 {
            engine
                .record_feedback("rust", target, FeedbackLabel::Positive)
                .await
                .unwrap();
        }

        let after = engine.query("rust", &opts).await.unwrap();
        let rank_after = after
            .items
            .iter()
            .position(|s| s.chunk.id == target)
            .unwrap();
        let score_after = after.items[rank_after].score;

        assert!(rank_after <= rank_before, "rank must not decrease");
        assert!(score_after > score_before);
        assert!(score_after - score_before <= ScoringWeights::default().feedback_cap + 1e-9);
    }

    #[tokio::test]
    async fn test_feedback_for_unknown_chunk_rejected() {
        let engine = seeded_engine().await;
        let err = engine
            .record_feedback("rust", "nope:0000", FeedbackLabel::Positive)
            .await;
        assert!(matches!(err, Err(DossierError::InvalidQuery(_))));
    }

    #[test]
    fn test_similarity_monotonic_and_bounded() {
        assert!((similarity(0.0) - 1.0).abs() < 1e-9);
        assert!((similarity(2.0)).abs() < 1e-9);
        assert!(similarity(0.2) > similarity(0.8));
    }

    #[test]
    fn test_recency_boost_bounded_and_decaying() {
        let fresh = recency_boost(0, 30.0);
        let month = recency_boost(30 * 86_400, 30.0);
        let year = recency_boost(365 * 86_400, 30.0);
        assert!(fresh <= 1.0 && fresh > 0.0);
        assert!((month - 0.5).abs() < 1e-9);
        assert!(year < month && year > 0.0);
    }
}
