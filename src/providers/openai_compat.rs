//! Shared adapter for OpenAI-compatible chat-completions APIs.
//!
//! OpenAI, Mistral, Together, and Groq expose the same request shape
//! (`POST /v1/chat/completions`) and bearer-token auth; only the base URL
//! and the name reported in diagnostics differ. One adapter covers all
//! four rather than four copies of the same wire code.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::traits::{ProviderAdapter, ProviderReply};
use crate::error::{Result, RouterError};

/// Adapter for any chat-completions API with bearer-token auth.
#[derive(Clone)]
pub struct OpenAiCompatAdapter {
    name: &'static str,
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAiCompatAdapter {
    /// OpenAI's hosted API.
    pub fn openai(timeout: Duration) -> Self {
        Self::with_base_url("openai", "https://api.openai.com", timeout)
    }

    /// Mistral's hosted API.
    pub fn mistral(timeout: Duration) -> Self {
        Self::with_base_url("mistral", "https://api.mistral.ai", timeout)
    }

    /// Together AI's hosted API.
    pub fn together(timeout: Duration) -> Self {
        Self::with_base_url("together", "https://api.together.xyz", timeout)
    }

    /// Groq's hosted API (served under an `/openai` prefix).
    pub fn groq(timeout: Duration) -> Self {
        Self::with_base_url("groq", "https://api.groq.com/openai", timeout)
    }

    /// Create an adapter with an explicit name and base URL (for testing
    /// with wiremock, or self-hosted compatible servers).
    pub fn with_base_url(
        name: &'static str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            name,
            http: super::http_client(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(
        &self,
        prompt: &str,
        model: &str,
        api_key: &str,
        streaming: bool,
    ) -> Result<ProviderReply> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut request = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&ChatRequest {
                model,
                messages: [ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                stream: streaming,
            });
        if !streaming {
            request = request.timeout(self.timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RouterError::upstream(self.name, e))?;

        super::into_reply(self.name, response, streaming).await
    }
}
