//! Shared test doubles for pipeline tests.

use crate::generation::{GenerationClient, parse_curriculum};
use async_trait::async_trait;
use parlance_core::{
    CurriculumResponse, EmbeddingRequest, EmbeddingResponse, GenerationError, Message, Provider,
    ProviderError, ProviderRequest, ProviderResponse,
};
use parlance_knowledge::HashEmbedder;
use std::sync::Mutex;
use std::time::Duration;

pub const CURRICULUM_JSON: &str = r#"{
    "scenario_scene": "A busy café on a Paris boulevard at breakfast time.",
    "curriculum_questions": [
        {"question": "Bonjour ! Qu'est-ce que vous désirez ?", "expected_response": "Je voudrais un café, s'il vous plaît."}
    ],
    "correction_examples": [
        {"incorrect_phrase": "Je veux café", "correct_phrase": "Je voudrais un café", "explanation": "Use the conditional and an article."}
    ]
}"#;

/// A provider that returns one fixed reply (or error) on every call.
///
/// Embeddings come from a small hashing index so ranking stays deterministic.
pub struct ScriptedProvider {
    reply: Result<String, ProviderError>,
    delay: Option<Duration>,
    requests: Mutex<Vec<ProviderRequest>>,
    embedding_requests: Mutex<Vec<EmbeddingRequest>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            delay: None,
            requests: Mutex::new(Vec::new()),
            embedding_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            delay: None,
            requests: Mutex::new(Vec::new()),
            embedding_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn embedding_requests(&self) -> Vec<EmbeddingRequest> {
        self.embedding_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.reply.clone().map(|text| ProviderResponse {
            message: Message::assistant(text),
            usage: None,
            model,
        })
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        let embedder = HashEmbedder::new(64);
        let embeddings = request.inputs.iter().map(|t| embedder.embed_text(t)).collect();
        let model = request.model.clone();
        self.embedding_requests.lock().unwrap().push(request);
        Ok(EmbeddingResponse { embeddings, model })
    }
}

/// A generation client that parses a fixed reply and counts calls.
pub struct CountingClient {
    reply: Result<String, GenerationError>,
    calls: Mutex<usize>,
}

impl CountingClient {
    pub fn succeeding() -> Self {
        Self {
            reply: Ok(CURRICULUM_JSON.to_string()),
            calls: Mutex::new(0),
        }
    }

    pub fn failing(error: GenerationError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl GenerationClient for CountingClient {
    fn name(&self) -> &str {
        "counting"
    }

    async fn generate(&self, _prompt: &str) -> Result<CurriculumResponse, GenerationError> {
        *self.calls.lock().unwrap() += 1;
        match &self.reply {
            Ok(text) => parse_curriculum(text),
            Err(e) => Err(e.clone()),
        }
    }
}
