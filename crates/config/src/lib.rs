//! Configuration loading, validation, and management for Consilium.
//!
//! Loads configuration from `~/.consilium/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use consilium_core::provider::SamplingConfig;
use consilium_core::taxonomy::{CategoryDef, Language, Taxonomy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.consilium/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the language-model service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Max tokens per LLM response (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Whole-request timeout of the HTTP client talking to the provider
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Retrieval and synthesis settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Dataset locations
    #[serde(default)]
    pub datasets: DatasetsConfig,

    /// Optional taxonomy overrides
    #[serde(default)]
    pub taxonomies: TaxonomiesConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4-turbo".into()
}
fn default_top_p() -> Option<f32> {
    Some(0.9)
}
fn default_request_timeout() -> u64 {
    120
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("providers", &self.providers)
            .field("gateway", &self.gateway)
            .field("pipeline", &self.pipeline)
            .field("datasets", &self.datasets)
            .field("taxonomies", &self.taxonomies)
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origins allowed by the CORS layer
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_port() -> u16 {
    8003
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".into(),
        "http://127.0.0.1:5173".into(),
    ]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            cors_origins: default_cors_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Decisions from this year onward are emphasized in answers
    #[serde(default = "default_recency_cutoff")]
    pub recency_cutoff_year: u32,

    /// Citations requested from the general pipeline
    #[serde(default = "default_citation_count")]
    pub citation_count: usize,

    /// Citations requested from the TimPark pipeline
    #[serde(default = "default_citation_count")]
    pub timpark_citation_count: usize,

    /// Identifiers listed in the answer header
    #[serde(default = "default_top_identifiers")]
    pub top_identifiers: usize,
}

fn default_recency_cutoff() -> u32 {
    2024
}
fn default_citation_count() -> usize {
    2
}
fn default_top_identifiers() -> usize {
    5
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recency_cutoff_year: default_recency_cutoff(),
            citation_count: default_citation_count(),
            timpark_citation_count: default_citation_count(),
            top_identifiers: default_top_identifiers(),
        }
    }
}

/// CSV dataset locations. Relative paths are resolved against `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetsConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_romanian_dataset")]
    pub romanian: PathBuf,

    #[serde(default = "default_english_dataset")]
    pub english: PathBuf,

    #[serde(default = "default_timpark_dataset")]
    pub timpark: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_romanian_dataset() -> PathBuf {
    PathBuf::from("all_summarized_hcl_gpt_desc_added_with_general_categ.csv")
}
fn default_english_dataset() -> PathBuf {
    PathBuf::from("all_summarized_hcl_gpt_desc_added_with_general_categ_en.csv")
}
fn default_timpark_dataset() -> PathBuf {
    PathBuf::from("all_hcl_timpark_with_articole_motivatie_original_as_gpt_desc.csv")
}

impl DatasetsConfig {
    /// Resolved path of the general dataset for a language.
    pub fn general(&self, language: Language) -> PathBuf {
        match language {
            Language::Romanian => self.resolve(&self.romanian),
            Language::English => self.resolve(&self.english),
        }
    }

    /// Resolved path of the TimPark dataset.
    pub fn timpark(&self) -> PathBuf {
        self.resolve(&self.timpark)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            romanian: default_romanian_dataset(),
            english: default_english_dataset(),
            timpark: default_timpark_dataset(),
        }
    }
}

/// Replacement taxonomies. An absent entry keeps the built-in one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomiesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanian: Option<Vec<CategoryDef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<Vec<CategoryDef>>,
}

impl TaxonomiesConfig {
    /// The taxonomy in effect for a language.
    pub fn taxonomy(&self, language: Language) -> Taxonomy {
        let custom = match language {
            Language::Romanian => &self.romanian,
            Language::English => &self.english,
        };
        match custom {
            Some(categories) => Taxonomy::new(categories.clone()),
            None => Taxonomy::builtin(language),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.consilium/config.toml),
    /// or from `CONSILIUM_CONFIG` when set.
    ///
    /// Also checks environment variables:
    /// - `CONSILIUM_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `CONSILIUM_MODEL`
    /// - `CONSILIUM_DATA_DIR`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("CONSILIUM_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_dir().join("config.toml"));
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("CONSILIUM_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("CONSILIUM_MODEL") {
            config.default_model = model;
        }

        if let Ok(dir) = std::env::var("CONSILIUM_DATA_DIR") {
            config.datasets.data_dir = PathBuf::from(dir);
        }

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

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".consilium")
    }

    /// Sampling parameters shared by classification and synthesis.
    /// Temperature is not configurable and is always 0.
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            temperature: 0.0,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(top_p) = self.top_p {
            if !(top_p > 0.0 && top_p <= 1.0) {
                return Err(ConfigError::ValidationError(
                    "top_p must be in (0.0, 1.0]".into(),
                ));
            }
        }

        if self.pipeline.citation_count == 0 || self.pipeline.timpark_citation_count == 0 {
            return Err(ConfigError::ValidationError(
                "citation counts must be at least 1".into(),
            ));
        }

        for (language, custom) in [
            (Language::Romanian, &self.taxonomies.romanian),
            (Language::English, &self.taxonomies.english),
        ] {
            if custom.as_ref().is_some_and(|c| c.is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "taxonomy override for {language} must not be empty"
                )));
            }
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            top_p: default_top_p(),
            max_tokens: None,
            request_timeout_secs: default_request_timeout(),
            providers: HashMap::new(),
            gateway: GatewayConfig::default(),
            pipeline: PipelineConfig::default(),
            datasets: DatasetsConfig::default(),
            taxonomies: TaxonomiesConfig::default(),
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
