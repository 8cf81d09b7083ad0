use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Masking / reinjection settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    #[default]
    OpenAI,
    Ollama,
    Anthropic,
    /// LM Studio local server (OpenAI-compatible)
    LMStudio,
}

impl TranslationProvider {
    /// Capitalized provider name for display
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
            Self::LMStudio => "LM Studio",
        }
    }

    /// Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Model name
    #[serde(default = "String::new")]
    pub model: String,

    /// API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Max documents translated concurrently
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Timeout seconds per translation request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Provider config with per-provider defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_anthropic_timeout_secs(),
            },
            TranslationProvider::LMStudio => Self {
                provider_type: "lmstudio".to_string(),
                model: default_lmstudio_model(),
                api_key: String::new(),
                endpoint: default_lmstudio_endpoint(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Settings for the masking and reinjection passes
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessingConfig {
    /// Words and phrases that must never be translated; every literal
    /// occurrence is wrapped in protection markers before translation
    #[serde(default = "default_reserved_keywords")]
    pub reserved_keywords: Vec<String>,

    /// Static-asset path prefix rewritten during finalization
    #[serde(default = "default_asset_path_prefix")]
    pub asset_path_prefix: String,

    /// Replacement for the static-asset path prefix
    #[serde(default = "default_asset_path_replacement")]
    pub asset_path_replacement: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            reserved_keywords: default_reserved_keywords(),
            asset_path_prefix: default_asset_path_prefix(),
            asset_path_replacement: default_asset_path_replacement(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_anthropic_timeout_secs() -> u64 {
    180
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_lmstudio_endpoint() -> String {
    // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
    "http://localhost:1234/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku".to_string()
}

fn default_lmstudio_model() -> String {
    // Placeholder; users should set to the loaded model name in LM Studio
    "local-model".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional technical translator. Translate the following Markdown \
     documentation from {source_language} to {target_language}. Every fragment wrapped in \
     <notranslate>...</notranslate> must be kept exactly as it appears, tags included, in its \
     original position. Preserve Markdown formatting and line breaks. Respond only with the \
     translated document, without explanations or notes."
        .to_string()
}

fn default_reserved_keywords() -> Vec<String> {
    vec![
        "id:".to_string(),
        "title:".to_string(),
        "description:".to_string(),
    ]
}

fn default_asset_path_prefix() -> String {
    "/apps/main-app/static/images/".to_string()
}

fn default_asset_path_replacement() -> String {
    "/../../apps/main-app/static/images/".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        // Validate API key for hosted providers
        match self.translation.provider {
            TranslationProvider::OpenAI => {
                if self.translation.get_api_key().is_empty() {
                    return Err(anyhow!("Translation API key is required for OpenAI provider"));
                }
            }
            TranslationProvider::Anthropic => {
                if self.translation.get_api_key().is_empty() {
                    return Err(anyhow!(
                        "Translation API key is required for Anthropic provider"
                    ));
                }
            }
            _ => {}
        }

        if self.processing.reserved_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(anyhow!("Reserved keywords must not be empty strings"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            translation: TranslationConfig::default(),
            processing: ProcessingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Concurrency budget for per-document pipelines
    pub fn optimal_concurrent_requests(&self) -> usize {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.concurrent_requests;
        }

        default_concurrent_requests()
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::OpenAI => default_openai_model(),
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
            TranslationProvider::LMStudio => default_lmstudio_model(),
        }
    }

    /// Get the API key for the active provider.
    ///
    /// Falls back to the conventional environment variable when the config
    /// file leaves the key empty, so secrets can stay out of conf.json.
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        let env_var = match self.provider {
            TranslationProvider::OpenAI => "OPENAI_API_KEY",
            TranslationProvider::Anthropic => "ANTHROPIC_API_KEY",
            _ => return String::new(),
        };
        std::env::var(env_var).unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::OpenAI => default_openai_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
            TranslationProvider::LMStudio => default_lmstudio_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        default_timeout_secs()
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
        };

        // Add default providers
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::OpenAI));
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::Ollama));
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::Anthropic));
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::LMStudio));

        config
    }
}
