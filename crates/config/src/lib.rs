//! Configuration loading, validation, and management for Parlance.
//!
//! Loads configuration from `~/.parlance/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use parlance_core::Level;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.parlance/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential for the hosted model. Without it every request is served
    /// from the fallback templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Hosted model settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Knowledge retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("generation", &self.generation)
            .field("retrieval", &self.retrieval)
            .field("gateway", &self.gateway)
            .finish()
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// Override the Generative Language API endpoint (proxies, tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Upper bound on a single model call; expiry switches to the fallback
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_output_tokens() -> u32 {
    2048
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum documents handed to the prompt
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Hosted embedding model used for semantic ranking when a credential
    /// is available
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Upper bound on one embedding call before retrieval drops to the
    /// lexical index
    #[serde(default = "default_embedding_timeout_secs")]
    pub embedding_timeout_secs: u64,

    /// Dimension of the offline lexical index
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Score bonus for documents at the requested level
    #[serde(default = "default_level_boost")]
    pub level_boost: f32,

    /// CEFR level used when the request does not carry one
    #[serde(default = "default_level")]
    pub default_level: String,
}

fn default_top_k() -> usize {
    4
}
fn default_embedding_model() -> String {
    "text-embedding-004".into()
}
fn default_embedding_timeout_secs() -> u64 {
    10
}
fn default_dimensions() -> usize {
    384
}
fn default_level_boost() -> f32 {
    0.05
}
fn default_level() -> String {
    "A1".into()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            embedding_model: default_embedding_model(),
            embedding_timeout_secs: default_embedding_timeout_secs(),
            dimensions: default_dimensions(),
            level_boost: default_level_boost(),
            default_level: default_level(),
        }
    }
}

impl RetrievalConfig {
    /// The configured default level. Validated at load time.
    pub fn level(&self) -> Level {
        self.default_level.parse().unwrap_or(Level::A1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// CORS origins. `["*"]` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_allowed_origins() -> Vec<String> {
    vec!["*".into()]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.parlance/config.toml).
    ///
    /// Environment overrides:
    /// - `PARLANCE_API_KEY`, then `GOOGLE_API_KEY` (only when the file sets no key)
    /// - `PARLANCE_MODEL`
    /// - `PARLANCE_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // A blank key in the file means "not set".
        config.api_key = config.api_key.filter(|k| !k.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if self.api_key.is_none() {
            let non_blank = |key: &str| lookup(key).filter(|k| !k.trim().is_empty());
            self.api_key = non_blank("PARLANCE_API_KEY").or_else(|| non_blank("GOOGLE_API_KEY"));
        }

        if let Some(model) = lookup("PARLANCE_MODEL") {
            self.generation.model = model;
        }

        if let Some(port) = lookup("PARLANCE_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("PARLANCE_PORT is not a valid port: {port}"))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".parlance")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.generation.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "generation.timeout_secs must be > 0".into(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k must be > 0".into(),
            ));
        }

        if self.retrieval.embedding_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.embedding_timeout_secs must be > 0".into(),
            ));
        }

        if self.retrieval.dimensions < 16 {
            return Err(ConfigError::ValidationError(
                "retrieval.dimensions must be at least 16".into(),
            ));
        }

        if self.retrieval.default_level.parse::<Level>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "retrieval.default_level must be one of A1, A2, B1 (got '{}')",
                self.retrieval.default_level
            )));
        }

        Ok(())
    }

    /// Check if a model credential is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            generation: GenerationConfig::default(),
            retrieval: RetrievalConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation.model, "gemini-2.0-flash");
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.retrieval.level(), Level::A1);
        assert_eq!(config.retrieval.embedding_model, "text-embedding-004");
        assert!(!config.has_api_key());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generation.model, config.generation.model);
        assert_eq!(parsed.retrieval.top_k, config.retrieval.top_k);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.generation.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_level_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.default_level = "C2".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("C2"));
    }

    #[test]
    fn zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.generation.model, "gemini-2.0-flash");
    }

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[generation]
timeout_secs = 5

[retrieval]
top_k = 2
default_level = "B1"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.generation.timeout_secs, 5);
        assert_eq!(config.generation.model, "gemini-2.0-flash");
        assert_eq!(config.retrieval.top_k, 2);
        assert_eq!(config.retrieval.level(), Level::B1);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "generation = 12").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_supplies_api_key() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("GOOGLE_API_KEY", "g-key")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("g-key"));

        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("GOOGLE_API_KEY", "g-key"), ("PARLANCE_API_KEY", "p-key")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("p-key"));
    }

    #[test]
    fn file_key_wins_over_env() {
        let mut config = AppConfig {
            api_key: Some("file-key".into()),
            ..AppConfig::default()
        };
        config
            .apply_env(env(&[("GOOGLE_API_KEY", "g-key")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn blank_env_key_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("GOOGLE_API_KEY", "  ")])).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn blank_parlance_key_falls_through_to_google_key() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("PARLANCE_API_KEY", ""), ("GOOGLE_API_KEY", "real-google-key")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("real-google-key"));
    }

    #[test]
    fn blank_file_key_is_unset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"api_key = "   ""#).unwrap();

        let mut config = AppConfig::load_from(file.path()).unwrap();
        assert!(!config.has_api_key());

        config.apply_env(env(&[("GOOGLE_API_KEY", "g")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("g"));
    }

    #[test]
    fn env_overrides_model_and_port() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("PARLANCE_MODEL", "gemini-1.5-pro"), ("PARLANCE_PORT", "9090")]))
            .unwrap();
        assert_eq!(config.generation.model, "gemini-1.5-pro");
        assert_eq!(config.gateway.port, 9090);

        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("PARLANCE_PORT", "nope")])).is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("super-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gemini-2.0-flash"));
        assert!(toml_str.contains("8000"));
    }
}
