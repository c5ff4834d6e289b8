//! Process-lifetime response cache.

use chrono::{DateTime, Utc};
use parlance_core::{CurriculumResponse, Language, Scenario};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Where a served curriculum came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurriculumSource {
    Cache,
    Model,
    Fallback,
}

impl CurriculumSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurriculumSource::Cache => "cache",
            CurriculumSource::Model => "model",
            CurriculumSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for CurriculumSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored curriculum.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub response: CurriculumResponse,
    /// `Model` or `Fallback`.
    pub origin: CurriculumSource,
    pub created_at: DateTime<Utc>,
}

/// Snapshot for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<(Language, Scenario)>,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// (language, scenario) → curriculum. Last write wins, nothing is evicted.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<(Language, Scenario), CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a curriculum, counting the hit or miss.
    pub fn get(&self, language: Language, scenario: Scenario) -> Option<CurriculumResponse> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(language, scenario))
            .map(|entry| entry.response.clone());

        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Look up the full entry without touching the counters.
    pub fn entry(&self, language: Language, scenario: Scenario) -> Option<CacheEntry> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(language, scenario))
            .cloned()
    }

    pub fn put(
        &self,
        language: Language,
        scenario: Scenario,
        response: CurriculumResponse,
        origin: CurriculumSource,
    ) {
        let entry = CacheEntry {
            response,
            origin,
            created_at: Utc::now(),
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((language, scenario), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached keys, sorted by language then scenario.
    pub fn keys(&self) -> Vec<(Language, Scenario)> {
        let mut keys: Vec<_> = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect();
        keys.sort();
        keys
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        let keys = self.keys();

        CacheStats {
            size: keys.len(),
            keys,
            hits,
            misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }
}
