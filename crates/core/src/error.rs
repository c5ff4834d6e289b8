//! Error types for the Parlance domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The taxonomy follows
//! how each failure is treated:
//!
//! - [`ValidationError`]: the caller sent something we cannot serve. Surfaced
//!   as a 4xx, never retried.
//! - [`GenerationError`]: the hosted model failed or answered garbage.
//!   Recovered locally by the fallback generator.
//! - [`Error::UnsupportedScenario`]: the fallback has no template for a pair.
//!   A configuration bug, surfaced as a 5xx.

use thiserror::Error;

/// Errors a pipeline caller can see.
///
/// Generation failures never appear here: the pipeline recovers them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("No fallback template for {language} / {scenario}")]
    UnsupportedScenario { language: String, scenario: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// A request that cannot enter the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Unsupported language: '{0}'")]
    UnsupportedLanguage(String),

    #[error("Unsupported scenario: '{0}'")]
    UnsupportedScenario(String),

    #[error("Unsupported level: '{0}'")]
    UnsupportedLevel(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Failure of a single model-backed generation attempt.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("model call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("model call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("model reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("model reply is missing required fields: {0}")]
    MissingFields(String),

    #[error("model reply is incomplete: {0}")]
    Incomplete(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}
