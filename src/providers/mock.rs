/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::identity()` - Returns the text unchanged, masked tokens intact
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::mangled_tokens()` - Corrupts placeholder tokens like a careless model
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::snippet::{HEADER_TOKEN_ID, MARKER_OPEN};

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The masked document text to translate
    pub text: String,
    /// Source language
    pub source_language: String,
    /// Target language
    pub target_language: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
    /// Simulated prompt tokens
    pub prompt_tokens: Option<u64>,
    /// Simulated completion tokens
    pub completion_tokens: Option<u64>,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns the text unchanged, placeholder tokens intact
    Identity,
    /// Rewrites placeholder token ids so reinjection cannot match them
    MangledTokens,
    /// Drops the front matter token line from the response
    DroppedHeader,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Fails the first N requests, then succeeds
    FailTimes { times: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared across clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a mock that echoes its input, tokens intact
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Create a mock that corrupts placeholder token ids
    pub fn mangled_tokens() -> Self {
        Self::new(MockBehavior::MangledTokens)
    }

    /// Create a mock that drops the front matter token line
    pub fn dropped_header() -> Self {
        Self::new(MockBehavior::DroppedHeader)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that fails the first `times` requests, then succeeds
    pub fn fail_times(times: usize) -> Self {
        Self::new(MockBehavior::FailTimes { times })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that answers after a delay
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests seen so far (shared across clones)
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn mangle_tokens(text: &str) -> String {
        // Swap the series prefixes inside placeholder ids so reinjection
        // cannot match them and the markers survive into the output
        text.replace("_spt_", "_tps_")
            .replace("TabItem_", "BatItem_")
            .replace("admonition_", "admonishment_")
    }

    fn drop_header_line(text: &str) -> String {
        let header_prefix = format!("{}{}", MARKER_OPEN, HEADER_TOKEN_ID);
        text.lines()
            .filter(|line| !line.starts_with(&header_prefix))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Identity => {
                let text = if let Some(generator) = self.custom_response {
                    generator(&request)
                } else {
                    request.text.clone()
                };

                Ok(MockResponse {
                    text,
                    prompt_tokens: Some(request.text.len() as u64),
                    completion_tokens: Some(request.text.len() as u64),
                })
            }

            MockBehavior::MangledTokens => Ok(MockResponse {
                text: Self::mangle_tokens(&request.text),
                prompt_tokens: Some(10),
                completion_tokens: Some(10),
            }),

            MockBehavior::DroppedHeader => Ok(MockResponse {
                text: Self::drop_header_line(&request.text),
                prompt_tokens: Some(10),
                completion_tokens: Some(10),
            }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse {
                        text: request.text.clone(),
                        prompt_tokens: Some(10),
                        completion_tokens: Some(10),
                    })
                }
            }

            MockBehavior::FailTimes { times } => {
                if count < times {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated transient failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse {
                        text: request.text.clone(),
                        prompt_tokens: Some(10),
                        completion_tokens: Some(10),
                    })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(MockResponse {
                text: String::new(),
                prompt_tokens: Some(0),
                completion_tokens: Some(0),
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(MockResponse {
                    text: request.text.clone(),
                    prompt_tokens: Some(10),
                    completion_tokens: Some(10),
                })
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
