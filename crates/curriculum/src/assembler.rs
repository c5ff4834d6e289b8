//! Prompt assembly.
//!
//! Builds one prompt from five sections, always in this order:
//!
//! 1. **Task**: target language and CEFR level
//! 2. **Scenario**: name and setting description
//! 3. **Contextual knowledge**: retrieved documents, or the scenario's
//!    focus vocabulary and key phrases when nothing was retrieved
//! 4. **Real-world context**: venue terms, phrases and customs
//! 5. **Instructions**: the JSON schema the reply must follow
//!
//! # Determinism
//!
//! `assemble` is a pure function of its arguments. No clock, randomness or
//! shared state is consulted.

use parlance_core::{KnowledgeDocument, Language, Level, Scenario};
use parlance_knowledge::RealWorldContext;

/// Fixed per-scenario metadata.
struct ScenarioProfile {
    setting: &'static str,
    focus_vocabulary: &'static str,
    key_phrases: &'static str,
}

fn profile(language: Language, scenario: Scenario) -> ScenarioProfile {
    match (scenario, language) {
        (Scenario::CafeOrder, Language::French) => ScenarioProfile {
            setting: "The learner sits down in a café, greets the waiter, orders food and drink, asks about prices and pays the bill.",
            focus_vocabulary: "bonjour, café, thé, croissant, l'addition, combien, merci",
            key_phrases: "Je voudrais un café, s'il vous plaît. / C'est combien ? / L'addition, s'il vous plaît.",
        },
        (Scenario::CafeOrder, Language::Spanish) => ScenarioProfile {
            setting: "The learner sits down in a café, greets the waiter, orders food and drink, asks about prices and pays the bill.",
            focus_vocabulary: "hola, café, té, churros, la cuenta, cuánto, gracias",
            key_phrases: "Quisiera un café, por favor. / ¿Cuánto cuesta? / La cuenta, por favor.",
        },
        (Scenario::HotelCheckIn, Language::French) => ScenarioProfile {
            setting: "The learner arrives at a hotel reception desk, gives their reservation details, shows identification and receives a room key.",
            focus_vocabulary: "réservation, chambre, passeport, clé, étage, ascenseur, petit-déjeuner",
            key_phrases: "J'ai une réservation au nom de... / À quel étage est ma chambre ? / Le petit-déjeuner est inclus ?",
        },
        (Scenario::HotelCheckIn, Language::Spanish) => ScenarioProfile {
            setting: "The learner arrives at a hotel reception desk, gives their reservation details, shows identification and receives a room key.",
            focus_vocabulary: "reserva, habitación, pasaporte, llave, piso, ascensor, desayuno",
            key_phrases: "Tengo una reserva a nombre de... / ¿En qué piso está mi habitación? / ¿El desayuno está incluido?",
        },
        (Scenario::Shopping, Language::French) => ScenarioProfile {
            setting: "The learner browses a small boutique, asks for an item in their size, tries it on, asks the price and pays.",
            focus_vocabulary: "boutique, prix, taille, couleur, essayer, payer, carte",
            key_phrases: "Je cherche... / Je peux l'essayer ? / Je peux payer par carte ?",
        },
        (Scenario::Shopping, Language::Spanish) => ScenarioProfile {
            setting: "The learner browses a small shop, asks for an item in their size, tries it on, asks the price and pays.",
            focus_vocabulary: "tienda, precio, talla, color, probar, pagar, tarjeta",
            key_phrases: "Busco... / ¿Puedo probármelo? / ¿Puedo pagar con tarjeta?",
        },
    }
}

const RESPONSE_SCHEMA: &str = r#"{
  "scenario_scene": "A detailed description of the scenario setting and context",
  "curriculum_questions": [
    {
      "question": "A question to guide the AI in the conversation",
      "expected_response": "What the AI should respond with"
    }
  ],
  "correction_examples": [
    {
      "incorrect_phrase": "Common mistake a learner might make",
      "correct_phrase": "The correct way to say it",
      "explanation": "Gentle explanation of the correction"
    }
  ]
}"#;

/// Build the generation prompt for one request.
pub fn assemble(
    language: Language,
    scenario: Scenario,
    level: Level,
    documents: &[KnowledgeDocument],
) -> String {
    let profile = profile(language, scenario);
    let mut sections: Vec<String> = Vec::with_capacity(5);

    sections.push(format!(
        "Generate a language learning curriculum for {language}.\n\
         Learner level: {level} ({}).",
        level.description()
    ));

    sections.push(format!("Scenario: {scenario}\n{}", profile.setting));

    let knowledge = if documents.is_empty() {
        format!(
            "Focus vocabulary: {}\nKey phrases: {}",
            profile.focus_vocabulary, profile.key_phrases
        )
    } else {
        documents
            .iter()
            .map(|d| format!("- [{} | {}] {}", d.category, d.level, d.text))
            .collect::<Vec<_>>()
            .join("\n")
    };
    sections.push(format!("Contextual Knowledge:\n{knowledge}"));

    sections.push(RealWorldContext::lookup(language, scenario).render(language, scenario));

    sections.push(format!(
        "Please generate a JSON response with the following structure:\n{RESPONSE_SCHEMA}\n\n\
         Include at least one curriculum question and one correction example.\n\
         Make the content authentic to {language} culture and appropriate for {level} learners.\n\
         Use the contextual knowledge above to ensure accuracy and cultural appropriateness.\n\
         Respond with the JSON object only, without markdown or commentary."
    ));

    sections.join("\n\n")
}
