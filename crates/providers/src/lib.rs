//! Hosted language model providers for Parlance.
//!
//! All providers implement the `parlance_core::Provider` trait.

pub mod gemini;

use parlance_config::AppConfig;
use parlance_core::Provider;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub use gemini::GeminiProvider;

/// Build the configured provider.
///
/// Returns `None` when no credential is available or the client cannot be
/// constructed; callers then serve every request from the fallback path.
pub fn build_from_config(config: &AppConfig) -> Option<Arc<dyn Provider>> {
    let Some(api_key) = config.api_key.as_deref() else {
        warn!("No model API key configured; all curricula will come from fallback templates");
        return None;
    };

    // The HTTP client gets a little headroom over the pipeline's own bound.
    let timeout = Duration::from_secs(config.generation.timeout_secs + 5);

    match GeminiProvider::new(api_key, timeout) {
        Ok(provider) => {
            let provider = match &config.generation.base_url {
                Some(url) => provider.with_base_url(url),
                None => provider,
            };
            info!(model = %config.generation.model, "Gemini provider ready");
            Some(Arc::new(provider))
        }
        Err(e) => {
            warn!(error = %e, "Could not build Gemini provider; using fallback templates");
            None
        }
    }
}
