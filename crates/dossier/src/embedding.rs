//! Deterministic offline embedding provider.
//!
//! `HashedEmbedder` is a normalized hashed bag-of-words: each token is
//! hashed into a fixed number of buckets and the resulting count vector is
//! L2-normalized. It needs no model files or network access, is fully
//! deterministic, and gives texts sharing vocabulary a smaller cosine
//! distance, which is exactly what the pipeline and tests need. Real
//! embedding providers plug in behind the same [`Embedder`] trait.

use anyhow::Result;
use async_trait::async_trait;

use dossier_core::embedding::Embedder;

const DEFAULT_DIMS: usize = 256;

/// Hashed bag-of-words embedder.
pub struct HashedEmbedder {
    dims: usize,
}

impl HashedEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims: dims.max(1),
        }
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMS)
    }
}

/// FNV-1a, fixed here so stored vectors stay comparable across builds.
fn fnv1a(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[async_trait]
impl Embedder for HashedEmbedder {
    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dims];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = (fnv1a(&token.to_lowercase()) % self.dims as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_core::embedding::cosine_similarity;

    #[tokio::test]
    async fn test_deterministic() {
        let embedder = HashedEmbedder::default();
        let a = embedder.embed("rust systems programming").await.unwrap();
        let b = embedder.embed("rust systems programming").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), embedder.dims());
    }

    #[tokio::test]
    async fn test_shared_vocabulary_is_closer() {
        let embedder = HashedEmbedder::default();
        let query = embedder.embed("rust experience").await.unwrap();
        let related = embedder
            .embed("ten years of rust experience")
            .await
            .unwrap();
        let unrelated = embedder.embed("grocery list eggs milk").await.unwrap();
        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_case_and_punctuation_insensitive() {
        let embedder = HashedEmbedder::default();
        let a = embedder.embed("Rust, Experience!").await.unwrap();
        let b = embedder.embed("rust experience").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let embedder = HashedEmbedder::new(8);
        let v = embedder.embed("   ").await.unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
        assert_eq!(v.len(), 8);
    }
}
