/*!
 * Anthropic API client implementation.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for the Anthropic messages API
#[derive(Debug, Clone)]
pub struct Anthropic {
    client: Client,
    api_key: String,
    endpoint: String,
}

/// Anthropic message request
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<AnthropicMessage>,

    /// System prompt to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    max_tokens: u32,
}

/// Anthropic message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role of the message sender (user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens
    #[serde(default)]
    pub input_tokens: u64,

    /// Number of output tokens
    #[serde(default)]
    pub output_tokens: u64,
}

/// Anthropic response
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponse {
    /// The content blocks of the response
    pub content: Vec<AnthropicContent>,

    /// Token usage information
    #[serde(default)]
    pub usage: TokenUsage,
}

/// Individual content block in an Anthropic response
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicContent {
    /// The type of content
    #[serde(rename = "type")]
    pub content_type: String,

    /// The actual text content
    #[serde(default)]
    pub text: String,
}

impl AnthropicRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            system: None,
            temperature: None,
            max_tokens,
        }
    }

    /// Append a message to the conversation
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(AnthropicMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Anthropic {
    /// Create a new client.
    ///
    /// An empty `endpoint` falls back to the public Anthropic API.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn messages_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.anthropic.com/v1/messages".to_string()
        } else {
            format!("{}/v1/messages", self.endpoint.trim_end_matches('/'))
        }
    }
}

#[async_trait]
impl Provider for Anthropic {
    type Request = AnthropicRequest;
    type Response = AnthropicResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let response = self
            .client
            .post(self.messages_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::ConnectionError(format!("Failed to connect to Anthropic: {}", e))
                } else {
                    ProviderError::RequestFailed(format!("Anthropic request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::AuthenticationError(
                "Anthropic rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json::<AnthropicResponse>().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Anthropic response: {}", e))
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        // Minimal request, enough to confirm the key and endpoint work
        let request = AnthropicRequest::new("claude-3-haiku-20240307", 10).add_message("user", "Hello");
        self.complete(request).await?;
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.clone())
            .collect()
    }
}
