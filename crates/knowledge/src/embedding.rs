//! Text embedders.
//!
//! [`ProviderEmbedder`] asks a hosted embedding model for learned vectors,
//! so "l'addition" and "paying the bill" land close together even though
//! they share no words. It is the primary ranking signal whenever a model
//! credential is configured.
//!
//! [`HashEmbedder`] is the offline index: every word and every adjacent
//! word pair is hashed into one of `dimensions` buckets and the counts are
//! L2-normalised, so cosine similarity behaves like a weighted term-overlap
//! score. It needs no network and is fully deterministic.

use crate::vector::l2_normalize;
use async_trait::async_trait;
use parlance_core::{EmbeddingRequest, Provider, ProviderError};
use std::sync::Arc;

/// Turns a batch of texts into vectors, one per text, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// A short label for logs.
    fn name(&self) -> &str;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

/// Learned embeddings from a hosted model.
pub struct ProviderEmbedder {
    provider: Arc<dyn Provider>,
    model: String,
}

impl ProviderEmbedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for ProviderEmbedder {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: texts.to_vec(),
            })
            .await?;

        if response.embeddings.len() != texts.len() {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: format!(
                    "Expected {} embeddings, got {}",
                    texts.len(),
                    response.embeddings.len()
                ),
            });
        }
        Ok(response.embeddings)
    }
}

/// Deterministic feature-hashing embedder.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

/// Bigrams count for less than single words.
const BIGRAM_WEIGHT: f32 = 0.5;

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        (fnv1a(token.as_bytes()) % self.dimensions as u64) as usize
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        let words = tokenize(text);

        for word in &words {
            v[self.bucket(word)] += 1.0;
        }
        for pair in words.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            v[self.bucket(&bigram)] += BIGRAM_WEIGHT;
        }

        l2_normalize(&mut v);
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Lower-cased, accent-folded words of at least two characters.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|w| w.chars().flat_map(char::to_lowercase).map(fold_accent).collect::<String>())
        .filter(|w| w.chars().count() >= 2)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'á' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' | 'í' => 'i',
        'ô' | 'ó' | 'ö' => 'o',
        'ù' | 'û' | 'ú' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'œ' => 'o',
        other => other,
    }
}

/// 64-bit FNV-1a. Stable across platforms and releases, unlike `DefaultHasher`.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET, |hash, b| (hash ^ *b as u64).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::cosine_similarity;

    #[test]
    fn tokenize_folds_case_and_accents() {
        assert_eq!(
            tokenize("Café au Lait, s'il vous plaît!"),
            vec!["cafe", "au", "lait", "il", "vous", "plait"]
        );
    }

    #[test]
    fn embedding_has_requested_dimension_and_unit_norm() {
        let e = HashEmbedder::new(64);
        let v = e.embed_text("bonjour je voudrais un café");
        assert_eq!(v.len(), 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn embedding_is_deterministic() {
        let e = HashEmbedder::default();
        assert_eq!(e.embed_text("la cuenta, por favor"), e.embed_text("la cuenta, por favor"));
    }

    #[test]
    fn empty_text_embeds_to_zero() {
        let e = HashEmbedder::new(32);
        assert!(e.embed_text("  !? ").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn overlapping_text_is_more_similar() {
        let e = HashEmbedder::default();
        let query = e.embed_text("ordering coffee in a cafe");
        let close = e.embed_text("vocabulary for ordering coffee at the cafe counter");
        let far = e.embed_text("hotel reception passport room key");
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn zero_dimensions_clamped() {
        assert_eq!(HashEmbedder::new(0).dimensions(), 1);
    }

    #[tokio::test]
    async fn hash_embedder_batches_in_order() {
        let e = HashEmbedder::new(32);
        let texts = vec!["bonjour".to_string(), "hola".to_string()];
        let vectors = e.embed(&texts).await.unwrap();
        assert_eq!(vectors, vec![e.embed_text("bonjour"), e.embed_text("hola")]);
    }

    /// Returns one fixed vector per input, or a short batch when `short`.
    struct FixedEmbeddings {
        short: bool,
    }

    #[async_trait]
    impl Provider for FixedEmbeddings {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            _request: parlance_core::ProviderRequest,
        ) -> Result<parlance_core::ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("no completions".into()))
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> Result<parlance_core::EmbeddingResponse, ProviderError> {
            let n = if self.short { 1 } else { request.inputs.len() };
            Ok(parlance_core::EmbeddingResponse {
                embeddings: vec![vec![0.0, 1.0]; n],
                model: request.model,
            })
        }
    }

    #[tokio::test]
    async fn provider_embedder_forwards_model_and_texts() {
        let e = ProviderEmbedder::new(Arc::new(FixedEmbeddings { short: false }), "text-embedding-004");
        assert_eq!(e.name(), "fixed");
        assert_eq!(e.model(), "text-embedding-004");

        let vectors = e.embed(&["a".to_string(), "b".to_string()]).await.unwrap();
        assert_eq!(vectors.len(), 2);
    }

    #[tokio::test]
    async fn provider_embedder_rejects_short_batches() {
        let e = ProviderEmbedder::new(Arc::new(FixedEmbeddings { short: true }), "m");
        let err = e.embed(&["a".to_string(), "b".to_string()]).await.unwrap_err();
        assert!(err.to_string().contains("Expected 2 embeddings, got 1"));
    }
}
