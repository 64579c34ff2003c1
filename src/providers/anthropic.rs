//! Anthropic Messages API adapter.
//!
//! Anthropic is the one provider with a non-bearer auth scheme: the key
//! travels in a custom `x-api-key` header alongside a pinned API version.
//!
//! See: <https://docs.anthropic.com/en/api/messages>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::traits::{ProviderAdapter, ProviderReply};
use crate::error::{Result, RouterError};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// The Messages API requires an explicit completion budget.
const MAX_TOKENS: u32 = 1024;

/// Adapter for the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicAdapter {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl AnthropicAdapter {
    /// Create an adapter pointed at the hosted API.
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Create an adapter with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: super::http_client(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn send(
        &self,
        prompt: &str,
        model: &str,
        api_key: &str,
        streaming: bool,
    ) -> Result<ProviderReply> {
        let url = format!("{}/v1/messages", self.base_url);

        let mut request = self
            .http
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&MessagesRequest {
                model,
                messages: [Message {
                    role: "user",
                    content: prompt,
                }],
                max_tokens: MAX_TOKENS,
                stream: streaming,
            });
        if !streaming {
            request = request.timeout(self.timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RouterError::upstream(self.name(), e))?;

        super::into_reply(self.name(), response, streaming).await
    }
}
