//! Real-world notes that ground a curriculum in an actual venue.

use parlance_core::{Language, Scenario};
use serde::Serialize;

/// Venue terms, everyday phrases and local customs for one
/// (language, scenario) pair. Any part may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RealWorldContext {
    pub venue_terms: Option<&'static str>,
    pub common_phrases: Option<&'static str>,
    pub cultural_notes: Option<&'static str>,
}

const NOT_AVAILABLE: &str = "N/A";

impl RealWorldContext {
    pub fn lookup(language: Language, scenario: Scenario) -> Self {
        match (language, scenario) {
            (Language::French, Scenario::CafeOrder) => Self {
                venue_terms: Some(
                    "Café au lait (€3.50), Croissant (€1.20), Pain au chocolat (€1.30), Tarte Tatin (€4.50), Macaron (€2.00)",
                ),
                common_phrases: Some(
                    "Un café, s'il vous plaît. / L'addition, s'il vous plaît. / C'est combien? / Avez-vous du lait?",
                ),
                cultural_notes: Some(
                    "French cafés often have outdoor seating. Tipping is appreciated but not mandatory. Coffee is typically served in small cups.",
                ),
            },
            (Language::Spanish, Scenario::CafeOrder) => Self {
                venue_terms: Some(
                    "Café con leche (€2.80), Churros (€3.50), Tortilla española (€8.00), Paella (€15.00), Tapas (€3-8)",
                ),
                common_phrases: Some(
                    "Un café, por favor. / La cuenta, por favor. / ¿Cuánto cuesta? / ¿Tienen leche?",
                ),
                cultural_notes: Some(
                    "Spanish cafés serve tapas. Lunch is typically served from 2-4 PM. Coffee is often served with a small glass of water.",
                ),
            },
            (Language::French, Scenario::HotelCheckIn) => Self {
                venue_terms: Some(
                    "Chambre simple (€80), Chambre double (€120), Suite (€200), Petit-déjeuner inclus, Vue sur la ville",
                ),
                common_phrases: Some(
                    "J'ai une réservation. / Pouvez-vous confirmer ma chambre? / À quel étage? / L'ascenseur, s'il vous plaît.",
                ),
                cultural_notes: Some(
                    "Check-in is usually after 3 PM. Many hotels require a passport for registration. French hotels emphasize service quality.",
                ),
            },
            (Language::Spanish, Scenario::HotelCheckIn) => Self {
                venue_terms: Some(
                    "Habitación individual (€70), Habitación doble (€110), Suite (€180), Desayuno incluido, Vista a la ciudad",
                ),
                common_phrases: Some(
                    "Tengo una reserva. / ¿Puede confirmar mi habitación? / ¿En qué piso? / El ascensor, por favor.",
                ),
                cultural_notes: Some(
                    "Check-in typically starts at 2 PM. Spanish hotels often have siesta hours. Service is warm and personal.",
                ),
            },
            (_, Scenario::Shopping) => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.venue_terms.is_none() && self.common_phrases.is_none() && self.cultural_notes.is_none()
    }

    /// Render as prompt lines; missing parts print as `N/A`.
    pub fn render(&self, language: Language, scenario: Scenario) -> String {
        format!(
            "Real-world context for {scenario} in {language}:\n\
             Menu/Terms: {}\n\
             Common Phrases: {}\n\
             Cultural Notes: {}",
            self.venue_terms.unwrap_or(NOT_AVAILABLE),
            self.common_phrases.unwrap_or(NOT_AVAILABLE),
            self.cultural_notes.unwrap_or(NOT_AVAILABLE),
        )
    }
}
