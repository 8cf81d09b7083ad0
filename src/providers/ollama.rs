/*!
 * Ollama client implementation for local LLM servers.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for a local Ollama server
#[derive(Debug, Clone)]
pub struct Ollama {
    client: Client,
    base_url: String,
}

/// Generation request for the /api/generate endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Model name, e.g. "llama3.1"
    pub model: String,

    /// The prompt to complete
    pub prompt: String,

    /// System prompt to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Always false, the full response comes back in one message
    pub stream: bool,

    /// Generation options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerationOptions>,
}

/// Model options for generation
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationOptions {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response from the /api/generate endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    /// The generated text
    pub response: String,

    /// Prompt token count, when reported
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,

    /// Output token count, when reported
    #[serde(default)]
    pub eval_count: Option<u64>,
}

/// Response from the /api/version endpoint
#[derive(Debug, Clone, Deserialize)]
struct VersionResponse {
    #[allow(dead_code)]
    version: String,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            stream: false,
            options: None,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

impl Ollama {
    /// Create a new client pointed at an Ollama server.
    ///
    /// An empty `endpoint` falls back to the default local port.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        let base_url = if endpoint.is_empty() {
            "http://localhost:11434".to_string()
        } else {
            endpoint.trim_end_matches('/').to_string()
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::ConnectionError(format!(
                        "Failed to connect to Ollama at {}: {}",
                        self.base_url, e
                    ))
                } else {
                    ProviderError::RequestFailed(format!("Ollama request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json::<GenerationResponse>().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Ollama response: {}", e))
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(format!("{}/api/version", self.base_url))
            .send()
            .await
            .map_err(|e| {
                ProviderError::ConnectionError(format!(
                    "Failed to connect to Ollama at {}: {}",
                    self.base_url, e
                ))
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError {
                status_code: response.status().as_u16(),
                message: "Version check failed".to_string(),
            });
        }

        response.json::<VersionResponse>().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Ollama version: {}", e))
        })?;

        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.clone()
    }
}
