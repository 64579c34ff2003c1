//! Ollama adapter — local inference over the generate API.
//!
//! See: <https://github.com/ollama/ollama/blob/main/docs/api.md>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::traits::{ProviderAdapter, ProviderReply};
use crate::error::{Result, RouterError};

/// Default base URL for a local Ollama instance.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Adapter for a local Ollama server. Needs no credential.
#[derive(Clone)]
pub struct OllamaAdapter {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaAdapter {
    /// Create an adapter pointed at the default local instance.
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Create an adapter with a custom base URL (configuration, or wiremock
    /// in tests). `timeout` bounds buffered requests only.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: super::http_client(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn send(
        &self,
        prompt: &str,
        model: &str,
        _api_key: &str,
        streaming: bool,
    ) -> Result<ProviderReply> {
        let url = format!("{}/api/generate", self.base_url);

        let mut request = self.http.post(&url).json(&GenerateRequest {
            model,
            prompt,
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
