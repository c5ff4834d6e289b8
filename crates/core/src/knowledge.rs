//! Knowledge documents, the units the retriever ranks.

use crate::curriculum::{Language, Level, Scenario};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of teaching material a document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vocabulary,
    Grammar,
    Interaction,
    Culture,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vocabulary => "vocabulary",
            Category::Grammar => "grammar",
            Category::Interaction => "interaction",
            Category::Culture => "culture",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single piece of teaching material, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub text: String,
    pub language: Language,
    pub scenario: Scenario,
    pub level: Level,
    pub category: Category,
}

impl KnowledgeDocument {
    pub fn new(
        language: Language,
        scenario: Scenario,
        level: Level,
        category: Category,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            language,
            scenario,
            level,
            category,
        }
    }

    /// Whether this document belongs to the given (language, scenario) pair.
    pub fn matches(&self, language: Language, scenario: Scenario) -> bool {
        self.language == language && self.scenario == scenario
    }
}
