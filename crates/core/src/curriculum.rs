//! Curriculum domain types.
//!
//! The supported languages, scenarios and proficiency levels are closed
//! enumerations. Anything a caller sends is parsed into them before the
//! pipeline runs, so the rest of the system never sees a free-form string.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A target language learners can practise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    French,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::French, Language::Spanish];

    /// Display name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::French => "French",
            Language::Spanish => "Spanish",
        }
    }

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::Spanish => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "french" | "fr" | "francais" => Ok(Language::French),
            "spanish" | "es" | "espanol" => Ok(Language::Spanish),
            _ => Err(ValidationError::UnsupportedLanguage(s.trim().to_string())),
        }
    }
}

/// A real-world interaction setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "Cafe Order")]
    CafeOrder,
    #[serde(rename = "Hotel Check-in")]
    HotelCheckIn,
    #[serde(rename = "Shopping")]
    Shopping,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::CafeOrder, Scenario::HotelCheckIn, Scenario::Shopping];

    /// Display name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::CafeOrder => "Cafe Order",
            Scenario::HotelCheckIn => "Hotel Check-in",
            Scenario::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ValidationError;

    /// Case, accents, spaces, `_` and `-` are ignored: "Café order",
    /// "cafe_order" and "CafeOrder" all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "cafeorder" => Ok(Scenario::CafeOrder),
            "hotelcheckin" => Ok(Scenario::HotelCheckIn),
            "shopping" => Ok(Scenario::Shopping),
            _ => Err(ValidationError::UnsupportedScenario(s.trim().to_string())),
        }
    }
}

/// CEFR proficiency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::A1, Level::A2, Level::B1];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
        }
    }

    /// Short description used in prompts.
    pub fn description(&self) -> &'static str {
        match self {
            Level::A1 => "beginner",
            Level::A2 => "elementary",
            Level::B1 => "intermediate",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "a1" => Ok(Level::A1),
            "a2" => Ok(Level::A2),
            "b1" => Ok(Level::B1),
            _ => Err(ValidationError::UnsupportedLevel(s.trim().to_string())),
        }
    }
}

/// Lower-case, fold the accents that occur in our vocabulary, and drop
/// everything that is not alphanumeric.
fn normalize(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'á' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' => 'i',
            'ô' | 'ó' => 'o',
            'ù' | 'û' | 'ú' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// A request for a curriculum, as received from a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurriculumRequest {
    #[serde(default)]
    pub target_language: String,
    #[serde(default)]
    pub scenario: String,
}

impl CurriculumRequest {
    pub fn new(target_language: impl Into<String>, scenario: impl Into<String>) -> Self {
        Self {
            target_language: target_language.into(),
            scenario: scenario.into(),
        }
    }

    /// Parse the raw strings into a supported (language, scenario) pair.
    pub fn validate(&self) -> Result<(Language, Scenario), ValidationError> {
        if self.target_language.trim().is_empty() {
            return Err(ValidationError::MissingField("target_language"));
        }
        if self.scenario.trim().is_empty() {
            return Err(ValidationError::MissingField("scenario"));
        }
        let language = self.target_language.parse()?;
        let scenario = self.scenario.parse()?;
        Ok((language, scenario))
    }
}

/// A practice prompt and the answer the tutor expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumQuestion {
    pub question: String,
    pub expected_response: String,
}

/// A common learner mistake and its correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionExample {
    pub incorrect_phrase: String,
    pub correct_phrase: String,
    pub explanation: String,
}

/// A generated curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumResponse {
    pub scenario_scene: String,
    pub curriculum_questions: Vec<CurriculumQuestion>,
    pub correction_examples: Vec<CorrectionExample>,
}

impl CurriculumResponse {
    /// Names of the parts that keep this response from being usable.
    ///
    /// Empty when the scene is non-blank and there is at least one question
    /// and one correction example.
    pub fn missing_parts(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.scenario_scene.trim().is_empty() {
            missing.push("scenario_scene");
        }
        if self.curriculum_questions.is_empty() {
            missing.push("curriculum_questions");
        }
        if self.correction_examples.is_empty() {
            missing.push("correction_examples");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_parts().is_empty()
    }
}
