//! Provider adapters for upstream text-generation services.
//!
//! Each adapter translates a `(prompt, model, credential, streaming)` tuple
//! into one provider's wire format and normalises the transport response
//! into a [`ProviderReply`] — either a raw byte stream or a fully-buffered
//! JSON payload. Adapters never inspect the semantic content of a response;
//! shaping happens above this layer.
//!
//! Adding a provider means writing one adapter, adding a [`ProviderId`]
//! variant, and registering it in [`ProviderRegistry::with_defaults`].

mod anthropic;
mod ollama;
mod openai_compat;
mod registry;
mod traits;

pub use anthropic::AnthropicAdapter;
pub use ollama::OllamaAdapter;
pub use openai_compat::OpenAiCompatAdapter;
pub use registry::ProviderRegistry;
pub use traits::{ByteStream, ProviderAdapter, ProviderReply};

use std::time::Duration;

use futures_util::TryStreamExt;
use reqwest::Client;

use crate::error::{Result, RouterError};

/// Connect timeout applied to every adapter's HTTP client. The overall
/// request timeout is per-call (buffered requests only — a total deadline
/// would cut long-lived streams short).
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Known upstream providers, selectable by configuration string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// Local Ollama instance (no credential).
    Ollama,
    OpenAi,
    Anthropic,
    Mistral,
    Together,
    Groq,
}

impl ProviderId {
    /// Every known provider, in the order reported by `GET /config`.
    pub const ALL: [ProviderId; 6] = [
        ProviderId::Ollama,
        ProviderId::OpenAi,
        ProviderId::Anthropic,
        ProviderId::Mistral,
        ProviderId::Together,
        ProviderId::Groq,
    ];

    /// Canonical lowercase name, as used in config files and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Ollama => "ollama",
            ProviderId::OpenAi => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Mistral => "mistral",
            ProviderId::Together => "together",
            ProviderId::Groq => "groq",
        }
    }

    /// Case-insensitive lookup. Returns `None` for unknown names — callers
    /// surface that as [`RouterError::UnknownProvider`], never a default.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the shared HTTP client used by an adapter.
pub(crate) fn http_client() -> Client {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
}

/// Normalise an upstream HTTP response into a [`ProviderReply`].
///
/// Non-2xx statuses become [`RouterError::Upstream`] carrying the provider
/// name and as much of the error body as could be read. Success responses
/// are relayed verbatim: raw byte stream when `streaming`, parsed JSON
/// otherwise.
pub(crate) async fn into_reply(
    provider: &'static str,
    response: reqwest::Response,
    streaming: bool,
) -> Result<ProviderReply> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RouterError::Upstream {
            provider,
            message: format!("upstream returned {status}: {body}"),
        });
    }

    if streaming {
        let stream = response
            .bytes_stream()
            .map_err(move |e| RouterError::Stream(format!("{provider}: {e}")));
        Ok(ProviderReply::Stream(Box::pin(stream)))
    } else {
        let payload = response
            .json()
            .await
            .map_err(|e| RouterError::upstream(provider, e))?;
        Ok(ProviderReply::Buffered(payload))
    }
}
