//! Semantic retriever over the knowledge store.
//!
//! Two indexes rank the same documents:
//!
//! - the **semantic** index holds learned embeddings from an [`Embedder`].
//!   It is built on first use, so startup never waits on the network, and a
//!   failed build is retried on the next lookup.
//! - the **lexical** index holds [`HashEmbedder`] vectors computed at
//!   construction. It answers whenever no semantic embedder is configured
//!   or the embedder fails or times out.

use crate::embedding::{Embedder, HashEmbedder};
use crate::store::KnowledgeStore;
use crate::vector::{cosine_similarity, rank_indices};
use parlance_config::RetrievalConfig;
use parlance_core::{KnowledgeDocument, Language, Level, ProviderError, Scenario};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// A retrieved document with the score it was ranked by.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: KnowledgeDocument,
    pub score: f32,
}

/// Which index ranked a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    Semantic,
    Lexical,
}

/// Ranks the documents of one (language, scenario) pair against a query.
pub struct Retriever {
    store: KnowledgeStore,
    lexical: HashEmbedder,
    lexical_index: Vec<Vec<f32>>,
    semantic: Option<SemanticIndex>,
    top_k: usize,
    level_boost: f32,
}

struct SemanticIndex {
    embedder: Arc<dyn Embedder>,
    documents: OnceCell<Vec<Vec<f32>>>,
    timeout: Duration,
}

impl SemanticIndex {
    /// Cosine similarity of each candidate to the query.
    async fn similarities(
        &self,
        documents: &[KnowledgeDocument],
        candidates: &[usize],
        query: &str,
    ) -> Result<Vec<f32>, ProviderError> {
        let index = self
            .documents
            .get_or_try_init(|| self.build(documents))
            .await?;

        let query_vector = self
            .embed(&[query.to_string()])
            .await?
            .pop()
            .unwrap_or_default();

        Ok(candidates
            .iter()
            .map(|&i| cosine_similarity(&index[i], &query_vector))
            .collect())
    }

    async fn build(&self, documents: &[KnowledgeDocument]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let vectors = self.embed(&texts).await?;
        debug!(
            embedder = %self.embedder.name(),
            documents = vectors.len(),
            "Semantic index built"
        );
        Ok(vectors)
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let vectors = tokio::time::timeout(self.timeout, self.embedder.embed(texts))
            .await
            .map_err(|_| {
                ProviderError::Timeout(format!(
                    "embedding took longer than {}s",
                    self.timeout.as_secs()
                ))
            })??;

        if vectors.len() != texts.len() {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: format!("Expected {} embeddings, got {}", texts.len(), vectors.len()),
            });
        }
        Ok(vectors)
    }
}

impl Retriever {
    /// A lexical-only retriever. Document vectors are computed here.
    pub fn new(store: KnowledgeStore, lexical: HashEmbedder, top_k: usize) -> Self {
        let lexical_index = store
            .documents()
            .iter()
            .map(|d| lexical.embed_text(&d.text))
            .collect();

        debug!(
            documents = store.len(),
            dimensions = lexical.dimensions(),
            "Lexical index built"
        );

        Self {
            store,
            lexical,
            lexical_index,
            semantic: None,
            top_k,
            level_boost: 0.0,
        }
    }

    /// Lexical-only retriever sized and tuned from config.
    pub fn from_config(store: KnowledgeStore, config: &RetrievalConfig) -> Self {
        Self::new(store, HashEmbedder::new(config.dimensions), config.top_k)
            .with_level_boost(config.level_boost)
    }

    /// Rank by learned embeddings first; each embedding call is bounded by
    /// `timeout`.
    pub fn with_semantic(mut self, embedder: Arc<dyn Embedder>, timeout: Duration) -> Self {
        self.semantic = Some(SemanticIndex {
            embedder,
            documents: OnceCell::new(),
            timeout,
        });
        self
    }

    /// Bonus added to the score of documents at the requested level.
    pub fn with_level_boost(mut self, boost: f32) -> Self {
        self.level_boost = boost;
        self
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn semantic_enabled(&self) -> bool {
        self.semantic.is_some()
    }

    /// The query used for a curriculum request.
    pub fn query_for(language: Language, scenario: Scenario, level: Level) -> String {
        format!(
            "Provide vocabulary, grammar, and interaction guidelines for the {scenario} scenario in {language} at {level} ({}) level",
            level.description()
        )
    }

    /// Up to `top_k` documents for the pair, best first.
    ///
    /// Equal scores keep insertion order. An empty result is not an error.
    pub async fn retrieve(
        &self,
        language: Language,
        scenario: Scenario,
        level: Level,
        query: &str,
    ) -> Vec<KnowledgeDocument> {
        self.retrieve_scored(language, scenario, level, query)
            .await
            .0
            .into_iter()
            .map(|s| s.document)
            .collect()
    }

    pub async fn retrieve_scored(
        &self,
        language: Language,
        scenario: Scenario,
        level: Level,
        query: &str,
    ) -> (Vec<ScoredDocument>, Ranking) {
        let candidates: Vec<usize> = self
            .store
            .documents()
            .iter()
            .enumerate()
            .filter(|(_, d)| d.matches(language, scenario))
            .map(|(i, _)| i)
            .collect();

        let (similarities, ranking) = self.similarities(&candidates, query).await;

        let scores: Vec<f32> = candidates
            .iter()
            .zip(similarities)
            .map(|(&i, similarity)| {
                if self.store.documents()[i].level == level {
                    similarity + self.level_boost
                } else {
                    similarity
                }
            })
            .collect();

        let ranked: Vec<ScoredDocument> = rank_indices(&scores, self.top_k)
            .into_iter()
            .map(|pos| ScoredDocument {
                document: self.store.documents()[candidates[pos]].clone(),
                score: scores[pos],
            })
            .collect();

        debug!(
            language = %language,
            scenario = %scenario,
            level = %level,
            ranking = ?ranking,
            candidates = candidates.len(),
            returned = ranked.len(),
            "Retrieved knowledge"
        );

        (ranked, ranking)
    }

    async fn similarities(&self, candidates: &[usize], query: &str) -> (Vec<f32>, Ranking) {
        if let Some(semantic) = self.semantic.as_ref().filter(|_| !candidates.is_empty()) {
            match semantic
                .similarities(self.store.documents(), candidates, query)
                .await
            {
                Ok(scores) => return (scores, Ranking::Semantic),
                Err(e) => warn!(
                    embedder = %semantic.embedder.name(),
                    error = %e,
                    "Semantic ranking unavailable, using lexical index"
                ),
            }
        }

        let query_vector = self.lexical.embed_text(query);
        let scores = candidates
            .iter()
            .map(|&i| cosine_similarity(&self.lexical_index[i], &query_vector))
            .collect();
        (scores, Ranking::Lexical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parlance_core::Category;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Places texts about settling up on one axis and everything else on
    /// the other, the way a learned model groups paraphrases.
    struct BillEmbedder {
        calls: AtomicUsize,
    }

    impl BillEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for BillEmbedder {
        fn name(&self) -> &str {
            "bill"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| {
                    let t = t.to_lowercase();
                    if t.contains("addition") || t.contains("bill") {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }
    }

    /// Fails the first `failures` calls, then embeds everything identically.
    struct FlakyEmbedder {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for FlakyEmbedder {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(ProviderError::Network("connection reset".into()));
            }
            Ok(vec![vec![1.0, 0.0]; texts.len()])
        }
    }

    struct StalledEmbedder;

    #[async_trait]
    impl Embedder for StalledEmbedder {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    fn doc(language: Language, scenario: Scenario, level: Level, text: &str) -> KnowledgeDocument {
        KnowledgeDocument::new(language, scenario, level, Category::Vocabulary, text)
    }

    fn cafe_store() -> KnowledgeStore {
        KnowledgeStore::new(vec![
            doc(Language::French, Scenario::CafeOrder, Level::A1, "un croissant et un café crème"),
            doc(Language::French, Scenario::CafeOrder, Level::A1, "l'addition, s'il vous plaît"),
        ])
    }

    #[tokio::test]
    async fn filters_to_the_requested_pair() {
        let retriever = Retriever::from_config(KnowledgeStore::builtin(), &RetrievalConfig::default());
        let query = Retriever::query_for(Language::Spanish, Scenario::HotelCheckIn, Level::A1);
        let docs = retriever
            .retrieve(Language::Spanish, Scenario::HotelCheckIn, Level::A1, &query)
            .await;

        assert!(!docs.is_empty());
        assert!(docs.len() <= retriever.top_k());
        assert!(docs.iter().all(|d| d.matches(Language::Spanish, Scenario::HotelCheckIn)));
    }

    #[tokio::test]
    async fn returns_fewer_than_k_for_small_subsets() {
        let store = KnowledgeStore::new(vec![
            doc(Language::French, Scenario::CafeOrder, Level::A1, "café"),
            doc(Language::French, Scenario::Shopping, Level::A1, "boutique"),
        ]);
        let retriever = Retriever::new(store, HashEmbedder::new(32), 5);
        let docs = retriever
            .retrieve(Language::French, Scenario::CafeOrder, Level::A1, "café")
            .await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "café");
    }

    #[tokio::test]
    async fn empty_subset_is_not_an_error() {
        let embedder = Arc::new(BillEmbedder::new());
        let retriever = Retriever::new(KnowledgeStore::default(), HashEmbedder::new(32), 3)
            .with_semantic(embedder.clone(), Duration::from_secs(5));
        assert!(retriever
            .retrieve(Language::French, Scenario::CafeOrder, Level::A1, "anything")
            .await
            .is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let store = KnowledgeStore::new(vec![
            doc(Language::French, Scenario::CafeOrder, Level::A1, "first"),
            doc(Language::French, Scenario::CafeOrder, Level::A1, "second"),
            doc(Language::French, Scenario::CafeOrder, Level::A1, "third"),
        ]);
        let retriever = Retriever::new(store, HashEmbedder::new(32), 2)
            .with_semantic(Arc::new(BillEmbedder::new()), Duration::from_secs(5));
        let docs = retriever
            .retrieve(Language::French, Scenario::CafeOrder, Level::A1, "q")
            .await;
        let texts: Vec<_> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn level_boost_breaks_ties() {
        let store = KnowledgeStore::new(vec![
            doc(Language::French, Scenario::CafeOrder, Level::A1, "beginner"),
            doc(Language::French, Scenario::CafeOrder, Level::B1, "intermediate"),
        ]);
        let retriever = Retriever::new(store, HashEmbedder::new(32), 1)
            .with_semantic(Arc::new(BillEmbedder::new()), Duration::from_secs(5))
            .with_level_boost(0.1);
        let docs = retriever
            .retrieve(Language::French, Scenario::CafeOrder, Level::B1, "q")
            .await;
        assert_eq!(docs[0].text, "intermediate");
    }

    #[tokio::test]
    async fn lexical_ranking_prefers_shared_words() {
        let store = KnowledgeStore::new(vec![
            doc(Language::French, Scenario::CafeOrder, Level::A1, "tipping customs and outdoor seating"),
            doc(Language::French, Scenario::CafeOrder, Level::A1, "ordering a croissant and a café au lait"),
        ]);
        let retriever = Retriever::new(store, HashEmbedder::default(), 2);
        let (scored, ranking) = retriever
            .retrieve_scored(
                Language::French,
                Scenario::CafeOrder,
                Level::A1,
                "how do I order a croissant",
            )
            .await;
        assert_eq!(ranking, Ranking::Lexical);
        assert!(scored[0].document.text.contains("croissant"));
        assert!(scored[0].score >= scored[1].score);
    }

    #[tokio::test]
    async fn semantic_ranking_matches_paraphrases() {
        // The match is listed second and shares no words with the query.
        let semantic = Retriever::new(cafe_store(), HashEmbedder::default(), 1)
            .with_semantic(Arc::new(BillEmbedder::new()), Duration::from_secs(5));
        let (scored, ranking) = semantic
            .retrieve_scored(Language::French, Scenario::CafeOrder, Level::A1, "paying the bill")
            .await;
        assert_eq!(ranking, Ranking::Semantic);
        assert!(scored[0].document.text.contains("addition"));
    }

    #[tokio::test]
    async fn document_index_is_built_once() {
        let embedder = Arc::new(BillEmbedder::new());
        let retriever = Retriever::new(cafe_store(), HashEmbedder::default(), 2)
            .with_semantic(embedder.clone(), Duration::from_secs(5));

        for _ in 0..3 {
            retriever
                .retrieve(Language::French, Scenario::CafeOrder, Level::A1, "the bill")
                .await;
        }
        // One document batch, then one query per lookup.
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn failed_embedder_falls_back_then_recovers() {
        let embedder = Arc::new(FlakyEmbedder {
            failures: 1,
            calls: AtomicUsize::new(0),
        });
        let retriever = Retriever::new(cafe_store(), HashEmbedder::default(), 2)
            .with_semantic(embedder, Duration::from_secs(5));

        let (docs, ranking) = retriever
            .retrieve_scored(Language::French, Scenario::CafeOrder, Level::A1, "café")
            .await;
        assert_eq!(ranking, Ranking::Lexical);
        assert_eq!(docs.len(), 2);

        let (_, ranking) = retriever
            .retrieve_scored(Language::French, Scenario::CafeOrder, Level::A1, "café")
            .await;
        assert_eq!(ranking, Ranking::Semantic);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_embedder_times_out_into_lexical() {
        let retriever = Retriever::new(cafe_store(), HashEmbedder::default(), 2)
            .with_semantic(Arc::new(StalledEmbedder), Duration::from_secs(2));

        let (docs, ranking) = retriever
            .retrieve_scored(Language::French, Scenario::CafeOrder, Level::A1, "croissant")
            .await;
        assert_eq!(ranking, Ranking::Lexical);
        assert!(docs[0].document.text.contains("croissant"));
    }

    #[test]
    fn query_mentions_pair_and_level() {
        let q = Retriever::query_for(Language::French, Scenario::CafeOrder, Level::A2);
        assert!(q.contains("Cafe Order"));
        assert!(q.contains("French"));
        assert!(q.contains("A2"));
    }
}
