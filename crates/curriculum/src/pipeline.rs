//! Pipeline orchestration.
//!
//! ```text
//! CacheCheck ─hit──────────────────────────────────────────▶ Done
//!     │miss
//!     ▼
//! Retrieve ─▶ Assemble ─▶ Generate ─ok──▶ CacheStore ─▶ Done
//!                │            │err              ▲
//!                │no client   ▼                 │
//!                └──────▶ Fallback ─────────────┘
//! ```
//!
//! Invalid requests are rejected before the cache is consulted.

use crate::assembler::assemble;
use crate::cache::{CacheStats, CurriculumSource, ResponseCache};
use crate::fallback::FallbackGenerator;
use crate::generation::{GenerationClient, ModelGenerationClient};
use parlance_config::AppConfig;
use parlance_core::{
    CurriculumRequest, CurriculumResponse, Language, Level, Provider, Result, Scenario,
};
use parlance_knowledge::{KnowledgeStore, ProviderEmbedder, Retriever};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A served curriculum and where it came from.
#[derive(Debug, Clone)]
pub struct CurriculumOutcome {
    pub response: CurriculumResponse,
    pub source: CurriculumSource,
}

/// Languages and scenarios present in the knowledge store, by display name.
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub languages: Vec<String>,
    pub scenarios: Vec<String>,
}

pub struct CurriculumPipeline {
    retriever: Retriever,
    generator: Option<Arc<dyn GenerationClient>>,
    fallback: FallbackGenerator,
    cache: ResponseCache,
    level: Level,
}

impl CurriculumPipeline {
    pub fn new(
        retriever: Retriever,
        generator: Option<Arc<dyn GenerationClient>>,
        fallback: FallbackGenerator,
        level: Level,
    ) -> Self {
        Self {
            retriever,
            generator,
            fallback,
            cache: ResponseCache::new(),
            level,
        }
    }

    /// Wire up the built-in knowledge and templates. `provider` is `None`
    /// when no credential is configured; the provider then also supplies the
    /// learned embeddings for retrieval.
    pub fn from_config(config: &AppConfig, provider: Option<Arc<dyn Provider>>) -> Self {
        let mut retriever = Retriever::from_config(KnowledgeStore::builtin(), &config.retrieval);
        if let Some(p) = &provider {
            let embedder = ProviderEmbedder::new(p.clone(), &config.retrieval.embedding_model);
            retriever = retriever.with_semantic(
                Arc::new(embedder),
                Duration::from_secs(config.retrieval.embedding_timeout_secs),
            );
        }
        let generator = provider.map(|p| {
            Arc::new(ModelGenerationClient::from_config(p, &config.generation))
                as Arc<dyn GenerationClient>
        });

        info!(
            documents = retriever.store().len(),
            generation = generator.is_some(),
            semantic = retriever.semantic_enabled(),
            level = %config.retrieval.level(),
            "Curriculum pipeline ready"
        );

        Self::new(
            retriever,
            generator,
            FallbackGenerator::builtin(),
            config.retrieval.level(),
        )
    }

    /// Validate a raw request and serve it.
    pub async fn generate(&self, request: &CurriculumRequest) -> Result<CurriculumOutcome> {
        let (language, scenario) = request.validate()?;
        self.generate_for(language, scenario).await
    }

    pub async fn generate_for(
        &self,
        language: Language,
        scenario: Scenario,
    ) -> Result<CurriculumOutcome> {
        if let Some(response) = self.cache.get(language, scenario) {
            debug!(language = %language, scenario = %scenario, "Cache hit");
            return Ok(CurriculumOutcome {
                response,
                source: CurriculumSource::Cache,
            });
        }

        let query = Retriever::query_for(language, scenario, self.level);
        let documents = self
            .retriever
            .retrieve(language, scenario, self.level, &query)
            .await;
        let prompt = assemble(language, scenario, self.level, &documents);

        let (response, source) = match &self.generator {
            Some(generator) => match generator.generate(&prompt).await {
                Ok(response) => (response, CurriculumSource::Model),
                Err(e) => {
                    warn!(
                        language = %language,
                        scenario = %scenario,
                        client = %generator.name(),
                        error = %e,
                        "Generation failed, using fallback template"
                    );
                    (self.fallback.generate(language, scenario)?, CurriculumSource::Fallback)
                }
            },
            None => {
                debug!(language = %language, scenario = %scenario, "No generation client, using fallback template");
                (self.fallback.generate(language, scenario)?, CurriculumSource::Fallback)
            }
        };

        self.cache.put(language, scenario, response.clone(), source);

        info!(
            language = %language,
            scenario = %scenario,
            source = %source,
            documents = documents.len(),
            "Curriculum served"
        );

        Ok(CurriculumOutcome { response, source })
    }

    pub fn available(&self) -> Availability {
        let store = self.retriever.store();
        Availability {
            languages: store.languages().iter().map(|l| l.to_string()).collect(),
            scenarios: store.scenarios().iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn generation_available(&self) -> bool {
        self.generator.is_some()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
