//! Model-backed curriculum generation.

use async_trait::async_trait;
use parlance_config::GenerationConfig;
use parlance_core::{CurriculumResponse, GenerationError, Message, Provider, ProviderRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Produces a curriculum from an assembled prompt.
///
/// Implementations make exactly one attempt; recovery is the pipeline's job.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<CurriculumResponse, GenerationError>;
}

const SYSTEM_INSTRUCTION: &str = "You are an experienced language tutor who designs short, \
realistic role-play lessons. You always answer with a single JSON object.";

/// [`GenerationClient`] backed by a hosted model through a [`Provider`].
pub struct ModelGenerationClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
    timeout: Duration,
}

impl ModelGenerationClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_output_tokens: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &GenerationConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: Some(config.max_output_tokens),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationClient for ModelGenerationClient {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn generate(&self, prompt: &str) -> Result<CurriculumResponse, GenerationError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::system(SYSTEM_INSTRUCTION), Message::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
            json_output: true,
        };

        debug!(provider = %self.provider.name(), model = %self.model, "Requesting curriculum");

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| GenerationError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })??;

        if let Some(usage) = &response.usage {
            info!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Curriculum generated"
            );
        }

        parse_curriculum(&response.message.content)
    }
}

/// Parse a model reply into a schema-valid curriculum.
///
/// Markdown code fences and any prose around the JSON object are ignored. Malformed JSON, a JSON
/// value of the wrong shape, and a well-formed but empty curriculum are
/// reported as distinct errors.
pub fn parse_curriculum(text: &str) -> Result<CurriculumResponse, GenerationError> {
    let body = extract_json(text);

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| GenerationError::InvalidJson(e.to_string()))?;

    let response: CurriculumResponse =
        serde_json::from_value(value).map_err(|e| GenerationError::MissingFields(e.to_string()))?;

    let missing = response.missing_parts();
    if !missing.is_empty() {
        return Err(GenerationError::Incomplete(missing.join(", ")));
    }

    Ok(response)
}

/// The JSON payload of a reply: the body of the first fenced block when
/// there is one, otherwise the outermost `{...}` span of any surrounding
/// prose.
fn extract_json(text: &str) -> &str {
    let text = text.trim();

    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        // Language tag on the opening fence, in any case.
        let tag_len = after
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after.len());
        let body = &after[tag_len..];
        let body = body.find("```").map_or(body, |end| &body[..end]);
        return body.trim();
    }

    if text.starts_with('{') || text.starts_with('[') {
        return text;
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
