/*!
 * OpenAI API client implementation.
 *
 * Talks to the chat completions endpoint. Also serves LM Studio, which
 * exposes the same API surface on a local port.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for the OpenAI chat completions API
#[derive(Debug, Clone)]
pub struct OpenAI {
    api_key: String,
    endpoint: String,
    client: Client,
}

/// Request to the chat completions endpoint
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIRequest {
    /// Model identifier, e.g. "gpt-4o-mini"
    pub model: String,

    /// Conversation messages in order
    pub messages: Vec<OpenAIMessage>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// One chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// "system", "user" or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

/// Response from the chat completions endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIResponse {
    /// Generated choices, first one carries the answer
    pub choices: Vec<OpenAIChoice>,

    /// Token usage for the request, when reported
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

/// One generated choice
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    pub message: OpenAIMessage,
}

/// Token usage accounting
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OpenAIUsage {
    #[serde(default)]
    pub prompt_tokens: u64,

    #[serde(default)]
    pub completion_tokens: u64,
}

impl OpenAIRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Append a message to the conversation
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl OpenAI {
    /// Create a new client.
    ///
    /// An empty `endpoint` falls back to the public OpenAI API.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() {
            "https://api.openai.com".to_string()
        } else {
            endpoint
        };

        Self {
            api_key: api_key.into(),
            endpoint,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Base URL without a trailing slash or "/v1" suffix, so both
    /// "https://api.openai.com" and "http://localhost:1234/v1" work
    fn base_url(&self) -> &str {
        let base = self.endpoint.trim_end_matches('/');
        base.strip_suffix("/v1").unwrap_or(base)
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url())
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::ConnectionError(format!("Failed to connect to OpenAI: {}", e))
                } else {
                    ProviderError::RequestFailed(format!("OpenAI request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::AuthenticationError(
                "OpenAI rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse OpenAI response: {}", e)))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1/models", self.base_url()))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                ProviderError::ConnectionError(format!("Failed to connect to OpenAI: {}", e))
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::AuthenticationError(
                "OpenAI rejected the API key".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(ProviderError::ApiError {
                status_code: response.status().as_u16(),
                message: "Model listing failed".to_string(),
            });
        }

        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
