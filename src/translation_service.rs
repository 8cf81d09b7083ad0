/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which sends masked
 * document text to the configured AI provider and returns the translated text
 * in its normalized form (leading front-matter token restored). Retries,
 * timeouts, caching and token accounting all live here so the per-document
 * pipeline only sees a single async call.
 */

use log::{debug, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::TranslationError;
use crate::language_utils;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;
use crate::snippet;

/// Masked text shorter than this is returned untranslated; nothing that
/// small carries translatable prose.
const MIN_TRANSLATABLE_CHARS: usize = 5;

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenUsageStats {
    /// Create a new empty token usage stats instance
    pub fn new() -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            provider: String::new(),
            model: String::new(),
        }
    }

    /// Create new token usage stats with provider info
    pub fn with_provider_info(provider: String, model: String) -> Self {
        Self {
            provider,
            model,
            ..Self::new()
        }
    }

    /// Accumulate token counts from one API response
    pub fn add_token_usage(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>) {
        if let Some(pt) = prompt_tokens {
            self.prompt_tokens += pt;
            self.total_tokens += pt;
        }

        if let Some(ct) = completion_tokens {
            self.completion_tokens += ct;
            self.total_tokens += ct;
        }
    }

    /// Accumulate time spent inside an API request
    pub fn add_api_duration(&mut self, duration: Duration) {
        self.api_duration += duration;
    }

    /// Calculate tokens per minute rate
    pub fn tokens_per_minute(&self) -> f64 {
        let duration_minutes = if self.api_duration.as_secs_f64() > 0.0 {
            self.api_duration.as_secs_f64() / 60.0
        } else {
            self.start_time.elapsed().as_secs_f64() / 60.0
        };

        if duration_minutes > 0.0 {
            self.total_tokens as f64 / duration_minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        let elapsed_minutes = self.start_time.elapsed().as_secs_f64() / 60.0;
        let api_minutes = self.api_duration.as_secs_f64() / 60.0;

        format!(
            "Token Usage Summary:\n\
             Provider: {}\n\
             Model: {}\n\
             Prompt tokens: {}\n\
             Completion tokens: {}\n\
             Total tokens: {}\n\
             Elapsed time: {:.2} minutes\n\
             API request time: {:.2} minutes\n\
             Tokens per minute: {:.2}",
            self.provider,
            self.model,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens,
            elapsed_minutes,
            api_minutes,
            self.tokens_per_minute()
        )
    }
}

/// Translation cache keyed on masked text and the language pair.
///
/// Documents repeat across runs far more often than they change; a hit skips
/// the whole provider round trip.
#[derive(Clone, Default)]
pub struct TranslationCache {
    cache: Arc<RwLock<HashMap<(String, String, String), String>>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached translation
    pub fn get(&self, text: &str, source_language: &str, target_language: &str) -> Option<String> {
        let key = (
            text.to_string(),
            source_language.to_string(),
            target_language.to_string(),
        );
        self.cache.read().get(&key).cloned()
    }

    /// Store a translation
    pub fn store(&self, text: &str, source_language: &str, target_language: &str, translation: &str) {
        let key = (
            text.to_string(),
            source_language.to_string(),
            target_language.to_string(),
        );
        self.cache.write().insert(key, translation.to_string());
    }

    /// Number of cached translations
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Drop all cached translations
    pub fn clear(&self) {
        self.cache.write().clear();
    }
}

/// Translation provider implementation variants
#[derive(Clone)]
enum TranslationProviderImpl {
    /// OpenAI API service
    OpenAI { client: OpenAI },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio { client: OpenAI },

    /// Ollama local LLM service
    Ollama { client: Ollama },

    /// Anthropic API service
    Anthropic { client: Anthropic },

    /// Deterministic in-process provider for tests
    Mock { provider: MockProvider },
}

/// Main translation service for masked document text
#[derive(Clone)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Translation cache shared across clones
    pub cache: TranslationCache,

    /// Token usage, shared across clones
    usage: Arc<Mutex<TokenUsageStats>>,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Self {
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(config.get_api_key(), config.get_endpoint(), timeout_secs),
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio usually doesn't require an API key; use a default if empty
                let api_key = {
                    let k = config.get_api_key();
                    if k.is_empty() { "lm-studio".to_string() } else { k }
                };
                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new(api_key, config.get_endpoint(), timeout_secs),
                }
            }
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(config.get_endpoint(), timeout_secs),
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(config.get_api_key(), config.get_endpoint(), timeout_secs),
            },
        };

        let usage = TokenUsageStats::with_provider_info(
            config.provider.display_name().to_string(),
            config.get_model(),
        );

        Self {
            provider,
            config,
            cache: TranslationCache::new(),
            usage: Arc::new(Mutex::new(usage)),
        }
    }

    /// Create a service backed by a mock provider (test constructor)
    pub fn with_mock(provider: MockProvider, config: TranslationConfig) -> Self {
        let usage =
            TokenUsageStats::with_provider_info("Mock".to_string(), config.get_model());

        Self {
            provider: TranslationProviderImpl::Mock { provider },
            config,
            cache: TranslationCache::new(),
            usage: Arc::new(Mutex::new(usage)),
        }
    }

    /// Snapshot of accumulated token usage
    pub fn usage_stats(&self) -> TokenUsageStats {
        self.usage.lock().clone()
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        match &self.provider {
            TranslationProviderImpl::OpenAI { client }
            | TranslationProviderImpl::LMStudio { client } => client.test_connection().await?,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await?,
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await?,
            TranslationProviderImpl::Mock { provider } => provider.test_connection().await?,
        }
        Ok(())
    }

    /// Translate masked document text.
    ///
    /// Returns the translation in normalized form: trimmed, with the fixed
    /// front-matter token restored as the first line. Reinjection relies on
    /// that leading token regardless of what the model did to the response.
    pub async fn translate_document(
        &self,
        masked: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        // Nothing translatable in a handful of characters
        if masked.trim().len() < MIN_TRANSLATABLE_CHARS {
            return Ok(Self::normalize_response(masked));
        }

        if let Some(cached) = self.cache.get(masked, source_language, target_language) {
            debug!(
                "Cache hit for translation ({} -> {})",
                source_language, target_language
            );
            return Ok(cached);
        }

        let system_prompt = self.build_system_prompt(source_language, target_language);
        let timeout_secs = self.config.get_timeout_secs();
        let retry_count = self.config.common.retry_count;
        let mut backoff_ms = self.config.common.retry_backoff_ms;

        let mut attempt = 0;
        let response_text = loop {
            let start_time = Instant::now();
            let result = tokio::time::timeout(
                Duration::from_secs(timeout_secs),
                self.request_translation(&system_prompt, masked, source_language, target_language),
            )
            .await
            .map_err(|_| TranslationError::Timeout(timeout_secs))
            .and_then(|inner| inner);

            match result {
                Ok((text, prompt_tokens, completion_tokens)) => {
                    let mut usage = self.usage.lock();
                    usage.add_token_usage(prompt_tokens, completion_tokens);
                    usage.add_api_duration(start_time.elapsed());

                    if text.trim().is_empty() {
                        break Err(TranslationError::EmptyResponse);
                    }
                    break Ok(text);
                }
                Err(e) if attempt < retry_count => {
                    attempt += 1;
                    warn!(
                        "Translation attempt {}/{} failed: {}, retrying in {}ms",
                        attempt,
                        retry_count + 1,
                        e,
                        backoff_ms
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms = backoff_ms.saturating_mul(2);
                }
                Err(e) => break Err(e),
            }
        }?;

        let normalized = Self::normalize_response(&response_text);
        self.cache
            .store(masked, source_language, target_language, &normalized);

        Ok(normalized)
    }

    /// One provider round trip. Returns the raw response text and token
    /// counts where the provider reports them.
    async fn request_translation(
        &self,
        system_prompt: &str,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<(String, Option<u64>, Option<u64>), TranslationError> {
        match &self.provider {
            TranslationProviderImpl::OpenAI { client }
            | TranslationProviderImpl::LMStudio { client } => {
                let request = OpenAIRequest::new(self.config.get_model())
                    .add_message("system", system_prompt)
                    .add_message("user", text)
                    .temperature(self.config.common.temperature);

                let response = client.complete(request).await?;
                let translated = OpenAI::extract_text(&response);
                let (prompt_tokens, completion_tokens) = response
                    .usage
                    .map(|usage| (Some(usage.prompt_tokens), Some(usage.completion_tokens)))
                    .unwrap_or((None, None));

                Ok((translated, prompt_tokens, completion_tokens))
            }

            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(self.config.get_model(), text)
                    .system(system_prompt)
                    .temperature(self.config.common.temperature);

                let response = client.complete(request).await?;
                let prompt_tokens = response.prompt_eval_count;
                let completion_tokens = response.eval_count;

                Ok((Ollama::extract_text(&response), prompt_tokens, completion_tokens))
            }

            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(self.config.get_model(), 8192)
                    .system(system_prompt)
                    .add_message("user", text)
                    .temperature(self.config.common.temperature);

                let response = client.complete(request).await?;
                let prompt_tokens = Some(response.usage.input_tokens);
                let completion_tokens = Some(response.usage.output_tokens);

                Ok((Anthropic::extract_text(&response), prompt_tokens, completion_tokens))
            }

            TranslationProviderImpl::Mock { provider } => {
                let request = MockRequest {
                    text: text.to_string(),
                    source_language: source_language.to_string(),
                    target_language: target_language.to_string(),
                };

                let response = provider.complete(request).await?;
                Ok((
                    MockProvider::extract_text(&response),
                    response.prompt_tokens,
                    response.completion_tokens,
                ))
            }
        }
    }

    /// Build the system prompt from the configured template, with language
    /// codes resolved to English names where possible.
    fn build_system_prompt(&self, source_language: &str, target_language: &str) -> String {
        let source_name = language_utils::get_language_name(source_language)
            .unwrap_or_else(|_| source_language.to_string());
        let target_name = language_utils::get_language_name(target_language)
            .unwrap_or_else(|_| target_language.to_string());

        self.config
            .common
            .system_prompt
            .replace("{source_language}", &source_name)
            .replace("{target_language}", &target_name)
    }

    /// Trim the response and restore the fixed front-matter token as the
    /// first line.
    fn normalize_response(response: &str) -> String {
        let header_token = snippet::header_token();
        let trimmed = response.trim();

        // Strip any token echo the model kept, then put exactly one back
        let body = trimmed
            .strip_prefix(&header_token)
            .map(str::trim_start)
            .unwrap_or(trimmed);

        format!("{}\n{}", header_token, body)
    }
}
