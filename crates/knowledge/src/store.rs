//! The static knowledge store.

use parlance_core::{Category, KnowledgeDocument, Language, Level, Scenario};

use Category::*;
use Language::*;
use Level::*;
use Scenario::*;

/// Immutable collection of teaching documents, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    documents: Vec<KnowledgeDocument>,
}

impl KnowledgeStore {
    pub fn new(documents: Vec<KnowledgeDocument>) -> Self {
        Self { documents }
    }

    /// The compiled-in corpus covering every supported (language, scenario) pair.
    pub fn builtin() -> Self {
        let documents = BUILTIN
            .iter()
            .map(|(language, scenario, level, category, text)| {
                KnowledgeDocument::new(*language, *scenario, *level, *category, *text)
            })
            .collect();
        Self { documents }
    }

    pub fn documents(&self) -> &[KnowledgeDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents for one (language, scenario) pair, in insertion order.
    pub fn for_pair(
        &self,
        language: Language,
        scenario: Scenario,
    ) -> impl Iterator<Item = &KnowledgeDocument> {
        self.documents
            .iter()
            .filter(move |d| d.matches(language, scenario))
    }

    /// Languages that have at least one document, sorted by display name.
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.documents.iter().map(|d| d.language).collect();
        languages.sort_by_key(|l| l.as_str());
        languages.dedup();
        languages
    }

    /// Scenarios that have at least one document, sorted by display name.
    pub fn scenarios(&self) -> Vec<Scenario> {
        let mut scenarios: Vec<Scenario> = self.documents.iter().map(|d| d.scenario).collect();
        scenarios.sort_by_key(|s| s.as_str());
        scenarios.dedup();
        scenarios
    }
}

type Entry = (Language, Scenario, Level, Category, &'static str);

const BUILTIN: &[Entry] = &[
    // French / Cafe Order
    (French, CafeOrder, A1, Vocabulary,
     "Café vocabulary: bonjour, s'il vous plaît, merci, café, thé, eau, pain, croissant, combien, euros, l'addition."),
    (French, CafeOrder, A1, Interaction,
     "Greeting the waiter with 'bonjour', ordering with 'je voudrais un café', asking the price with 'c'est combien ?', thanking with 'merci'."),
    (French, CafeOrder, A1, Grammar,
     "Polite requests with 'je voudrais', articles le, la, les and un, une, numbers for prices, questions with 'est-ce que'."),
    (French, CafeOrder, A2, Vocabulary,
     "Menu words: entrée, plat principal, dessert, boire, manger, commander, pourboire, spécialité, recommandation."),
    (French, CafeOrder, A2, Interaction,
     "Detailed ordering, asking about ingredients, requesting modifications such as 'sans sucre', asking for the bill with 'l'addition, s'il vous plaît'."),
    (French, CafeOrder, B1, Grammar,
     "Conditional tense for polite requests ('pourriez-vous'), negation with 'ne...pas', relative pronouns, complex questions about the menu."),
    (French, CafeOrder, B1, Interaction,
     "Asking for recommendations, discussing dietary restrictions (allergie, végétarien, sans gluten), expressing preferences about local and seasonal dishes."),
    (French, CafeOrder, A1, Culture,
     "French cafés are social spaces. Say 'bonjour' when entering. Tipping is appreciated but not mandatory. Dining is leisurely and lunch is usually 12-2 PM."),

    // Spanish / Cafe Order
    (Spanish, CafeOrder, A1, Vocabulary,
     "Café vocabulary: hola, por favor, gracias, café, té, agua, pan, churros, cuánto, euros, uno, dos, tres, la cuenta."),
    (Spanish, CafeOrder, A1, Interaction,
     "Greeting with 'hola', ordering with 'quisiera un café', asking the price with '¿cuánto cuesta?', thanking with 'gracias'."),
    (Spanish, CafeOrder, A1, Grammar,
     "Present tense of regular verbs, articles el, la, los, las, numbers 1-20, simple questions and negation."),
    (Spanish, CafeOrder, A2, Vocabulary,
     "Menu words: pedir, beber, comer, postre, plato principal, entrada, propina, especialidad, tapas, ración."),
    (Spanish, CafeOrder, A2, Interaction,
     "Detailed ordering, asking about ingredients, requesting modifications, asking for the bill with 'la cuenta, por favor'."),
    (Spanish, CafeOrder, B1, Grammar,
     "Polite requests with 'podría' and the conditional, indirect object pronouns ('me trae'), comparing dishes."),
    (Spanish, CafeOrder, A1, Culture,
     "Spanish cafés serve tapas meant to be shared. Lunch is typically 2-4 PM. Coffee often comes with a small glass of water."),

    // French / Hotel Check-in
    (French, HotelCheckIn, A1, Vocabulary,
     "Hotel vocabulary: hôtel, chambre, réservation, nom, passeport, clé, étage, ascenseur, wifi, réception."),
    (French, HotelCheckIn, A1, Interaction,
     "Basic check-in: 'j'ai une réservation au nom de...', giving personal information, asking for the room key and the wifi password."),
    (French, HotelCheckIn, A1, Grammar,
     "Present tense of 'avoir' and 'être', possessive adjectives (mon, ma, mes), basic questions, numbers for floors and rooms."),
    (French, HotelCheckIn, A2, Vocabulary,
     "Services: petit-déjeuner, chambre simple, chambre double, climatisation, vue, tarif, confirmer, annuler, concierge."),
    (French, HotelCheckIn, A2, Interaction,
     "Confirming a reservation, asking about breakfast times and hotel services, requesting a quieter room or a room with a view."),
    (French, HotelCheckIn, B1, Grammar,
     "Passé composé and future tense for plans, subjunctive after 'il faut que', formal register, conditional sentences."),
    (French, HotelCheckIn, B1, Interaction,
     "Complaining professionally about noise or a technical problem, negotiating a room change, resolving a billing issue."),
    (French, HotelCheckIn, A1, Culture,
     "Check-in is usually after 3 PM. Many hotels ask for a passport at registration. Breakfast is often included and service quality is valued."),

    // Spanish / Hotel Check-in
    (Spanish, HotelCheckIn, A1, Vocabulary,
     "Hotel vocabulary: hotel, habitación, reserva, nombre, pasaporte, llave, piso, ascensor, wifi, recepción."),
    (Spanish, HotelCheckIn, A1, Interaction,
     "Basic check-in: 'tengo una reserva a nombre de...', providing information, asking for the room key."),
    (Spanish, HotelCheckIn, A1, Grammar,
     "Present tense of 'tener' and 'ser', basic questions with '¿dónde?' and '¿a qué hora?', numbers for floors."),
    (Spanish, HotelCheckIn, A2, Interaction,
     "Confirming the reservation, asking whether breakfast is included ('¿el desayuno está incluido?'), requesting a room with a view."),
    (Spanish, HotelCheckIn, B1, Grammar,
     "Polite requests with 'quisiera que' and the subjunctive, past tense to describe a problem with the room."),
    (Spanish, HotelCheckIn, A1, Culture,
     "Check-in typically starts at 2 PM. Some hotels keep siesta hours. Service is warm and personal."),

    // French / Shopping
    (French, Shopping, A1, Vocabulary,
     "Shopping vocabulary: magasin, boutique, prix, cher, bon marché, taille, couleur, essayer, payer, carte."),
    (French, Shopping, A1, Interaction,
     "Asking for an item ('je cherche...'), checking the price, asking to try something on, paying by card."),
    (French, Shopping, A1, Grammar,
     "Present tense, basic adjectives and their agreement, numbers for prices and sizes, simple questions."),
    (French, Shopping, A2, Grammar,
     "Comparatives and superlatives ('plus grand', 'le moins cher'), demonstratives (ce, cette, ces), past tense."),
    (French, Shopping, A2, Interaction,
     "Asking for discounts during the soldes, comparing items, discussing quality and materials."),
    (French, Shopping, B1, Interaction,
     "Discussing craftsmanship and ethical shopping, placing a custom order, negotiating at a market stall."),
    (French, Shopping, A1, Culture,
     "Shopping happens in small boutiques. Sales run in January and July. Many shops close for lunch between 12 and 2 PM."),

    // Spanish / Shopping
    (Spanish, Shopping, A1, Vocabulary,
     "Shopping vocabulary: tienda, precio, caro, barato, talla, color, probar, pagar, tarjeta, efectivo."),
    (Spanish, Shopping, A1, Interaction,
     "Asking for an item ('busco...'), asking the price with '¿cuánto cuesta?', asking to try it on ('¿puedo probármelo?'), paying."),
    (Spanish, Shopping, A1, Grammar,
     "Present tense, adjective agreement, demonstratives (este, esta, estos), numbers for prices."),
    (Spanish, Shopping, A2, Grammar,
     "Comparatives ('más barato que'), direct object pronouns (lo, la), preterite for past purchases."),
    (Spanish, Shopping, A2, Interaction,
     "Asking for a different size or colour, asking about las rebajas, returning an item with the receipt."),
    (Spanish, Shopping, A1, Culture,
     "Many shops close in the afternoon for a long lunch and reopen until 8 or 9 PM. Sales (rebajas) start in January and July."),
];
