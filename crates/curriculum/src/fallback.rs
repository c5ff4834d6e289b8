//! Deterministic offline curricula.
//!
//! Used whenever the hosted model is unavailable or returns something
//! unusable. Every template is a complete, schema-valid curriculum.

use parlance_core::{
    CorrectionExample, CurriculumQuestion, CurriculumResponse, Error, Language, Result, Scenario,
};
use std::collections::HashMap;

/// Template table keyed by (language, scenario).
#[derive(Debug, Clone, Default)]
pub struct FallbackGenerator {
    templates: HashMap<(Language, Scenario), CurriculumResponse>,
}

impl FallbackGenerator {
    /// Build from an explicit set of templates.
    pub fn from_templates(
        templates: impl IntoIterator<Item = ((Language, Scenario), CurriculumResponse)>,
    ) -> Self {
        Self {
            templates: templates.into_iter().collect(),
        }
    }

    /// Templates for every supported pair.
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        for language in Language::ALL {
            for scenario in Scenario::ALL {
                templates.insert((language, scenario), builtin_template(language, scenario));
            }
        }
        Self { templates }
    }

    pub fn supports(&self, language: Language, scenario: Scenario) -> bool {
        self.templates.contains_key(&(language, scenario))
    }

    pub fn generate(&self, language: Language, scenario: Scenario) -> Result<CurriculumResponse> {
        self.templates
            .get(&(language, scenario))
            .cloned()
            .ok_or_else(|| Error::UnsupportedScenario {
                language: language.to_string(),
                scenario: scenario.to_string(),
            })
    }
}

fn question(question: &str, expected_response: &str) -> CurriculumQuestion {
    CurriculumQuestion {
        question: question.into(),
        expected_response: expected_response.into(),
    }
}

fn correction(incorrect: &str, correct: &str, explanation: &str) -> CorrectionExample {
    CorrectionExample {
        incorrect_phrase: incorrect.into(),
        correct_phrase: correct.into(),
        explanation: explanation.into(),
    }
}

fn builtin_template(language: Language, scenario: Scenario) -> CurriculumResponse {
    let scenario_scene = match scenario {
        Scenario::CafeOrder => format!(
            "You are in a charming {language} café. The waiter approaches your table with a warm smile. Practice your {language} skills."
        ),
        Scenario::HotelCheckIn => format!(
            "You are at the reception desk of a {language} hotel. The receptionist greets you. Practice your {language} skills."
        ),
        Scenario::Shopping => format!(
            "You are browsing a small {language} boutique. The shop assistant asks if you need help. Practice your {language} skills."
        ),
    };

    let greet = "How would you greet someone in this scenario?";
    let request = "What would you like to order or request?";

    let (curriculum_questions, correction_examples) = match (language, scenario) {
        (Language::French, Scenario::CafeOrder) => (
            vec![
                question(greet, "Bonjour, monsieur/madame"),
                question(request, "Je voudrais un café, s'il vous plaît"),
                question("How do you ask for the bill?", "L'addition, s'il vous plaît"),
            ],
            vec![
                correction(
                    "I want coffee",
                    "Je voudrais un café",
                    "Use polite forms and proper articles in French",
                ),
                correction(
                    "Je veux le café",
                    "Je voudrais un café",
                    "'Je voudrais' is more polite than 'je veux', and you order 'un' café",
                ),
            ],
        ),
        (Language::Spanish, Scenario::CafeOrder) => (
            vec![
                question(greet, "Hola, señor/señora"),
                question(request, "Quisiera un café, por favor"),
                question("How do you ask for the bill?", "La cuenta, por favor"),
            ],
            vec![
                correction(
                    "I want coffee",
                    "Quisiera un café",
                    "Use polite forms and proper articles in Spanish",
                ),
                correction(
                    "Quiero café",
                    "Quisiera un café, por favor",
                    "'Quisiera' softens the request and 'por favor' keeps it courteous",
                ),
            ],
        ),
        (Language::French, Scenario::HotelCheckIn) => (
            vec![
                question(greet, "Bonjour, monsieur/madame"),
                question(request, "J'ai une réservation"),
                question("How do you ask which floor your room is on?", "À quel étage est ma chambre ?"),
            ],
            vec![
                correction(
                    "I have reservation",
                    "J'ai une réservation",
                    "Use polite forms and proper articles in French",
                ),
                correction(
                    "Je suis une réservation",
                    "J'ai une réservation",
                    "Use 'avoir' (j'ai) to say you have something, not 'être'",
                ),
            ],
        ),
        (Language::Spanish, Scenario::HotelCheckIn) => (
            vec![
                question(greet, "Hola, señor/señora"),
                question(request, "Tengo una reserva"),
                question("How do you ask which floor your room is on?", "¿En qué piso está mi habitación?"),
            ],
            vec![
                correction(
                    "I have reservation",
                    "Tengo una reserva",
                    "Use polite forms and proper articles in Spanish",
                ),
                correction(
                    "Soy una reserva",
                    "Tengo una reserva",
                    "Use 'tener' to say you have something, not 'ser'",
                ),
            ],
        ),
        (Language::French, Scenario::Shopping) => (
            vec![
                question(greet, "Bonjour, monsieur/madame"),
                question(request, "Je cherche une chemise, s'il vous plaît"),
                question("How do you ask the price?", "C'est combien ?"),
            ],
            vec![
                correction(
                    "How much?",
                    "C'est combien ?",
                    "Use polite forms and proper articles in French",
                ),
                correction(
                    "Je peux essayer le ?",
                    "Je peux l'essayer ?",
                    "Object pronouns go before the verb in French",
                ),
            ],
        ),
        (Language::Spanish, Scenario::Shopping) => (
            vec![
                question(greet, "Hola, señor/señora"),
                question(request, "Busco una camisa, por favor"),
                question("How do you ask the price?", "¿Cuánto cuesta?"),
            ],
            vec![
                correction(
                    "How much?",
                    "¿Cuánto cuesta?",
                    "Use polite forms and proper articles in Spanish",
                ),
                correction(
                    "¿Puedo probar lo?",
                    "¿Puedo probármelo?",
                    "Object pronouns attach to the end of an infinitive in Spanish",
                ),
            ],
        ),
    };

    CurriculumResponse {
        scenario_scene,
        curriculum_questions,
        correction_examples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pair_is_schema_valid() {
        let fallback = FallbackGenerator::builtin();
        for language in Language::ALL {
            for scenario in Scenario::ALL {
                let r = fallback.generate(language, scenario).unwrap();
                assert!(r.is_complete(), "{language}/{scenario}");
            }
        }
    }

    #[test]
    fn french_cafe_template() {
        let r = FallbackGenerator::builtin()
            .generate(Language::French, Scenario::CafeOrder)
            .unwrap();
        assert!(r.scenario_scene.contains("café"));
        assert!(r.correction_examples.iter().any(|c| {
            c.incorrect_phrase == "I want coffee" && c.correct_phrase == "Je voudrais un café"
        }));
    }

    #[test]
    fn spanish_hotel_template() {
        let r = FallbackGenerator::builtin()
            .generate(Language::Spanish, Scenario::HotelCheckIn)
            .unwrap();
        assert!(r.scenario_scene.contains("reception desk of a Spanish hotel"));
        assert_eq!(r.curriculum_questions[1].expected_response, "Tengo una reserva");
    }

    #[test]
    fn generation_is_deterministic() {
        let fallback = FallbackGenerator::builtin();
        assert_eq!(
            fallback.generate(Language::French, Scenario::Shopping).unwrap(),
            fallback.generate(Language::French, Scenario::Shopping).unwrap()
        );
    }

    #[test]
    fn missing_template_is_unsupported() {
        let fallback = FallbackGenerator::from_templates([(
            (Language::French, Scenario::CafeOrder),
            builtin_template(Language::French, Scenario::CafeOrder),
        )]);
        assert!(fallback.supports(Language::French, Scenario::CafeOrder));
        assert!(!fallback.supports(Language::Spanish, Scenario::CafeOrder));

        let err = fallback
            .generate(Language::Spanish, Scenario::CafeOrder)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedScenario { .. }));
    }
}
