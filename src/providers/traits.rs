//! The adapter contract shared by every provider.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;

use crate::error::Result;

/// Byte stream relayed verbatim from an upstream provider body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A provider's response: incrementally delivered or fully materialised.
///
/// The two cases are deliberately explicit so the router's caching logic
/// can be restricted to `Buffered` — a stream cannot be captured and
/// replayed without fully buffering it first.
pub enum ProviderReply {
    /// Incremental body, piped straight to the caller. Never cached.
    Stream(ByteStream),
    /// Fully-buffered JSON payload, eligible for caching.
    Buffered(serde_json::Value),
}

impl std::fmt::Debug for ProviderReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderReply::Stream(_) => f.write_str("ProviderReply::Stream(..)"),
            ProviderReply::Buffered(v) => f.debug_tuple("ProviderReply::Buffered").field(v).finish(),
        }
    }
}

/// One upstream text-generation service.
///
/// Adapters are responsible only for building the provider-specific request
/// body and headers, choosing the buffered-vs-streamed transport mode, and
/// wrapping failures with the provider's name. No state is retained between
/// calls beyond the shared HTTP client.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider name for diagnostics and error wrapping.
    fn name(&self) -> &'static str;

    /// Send a prompt upstream.
    ///
    /// Fails with [`RouterError::Upstream`](crate::RouterError::Upstream) on
    /// any transport error or non-2xx response. `api_key` is ignored by
    /// providers that need no credential.
    async fn send(
        &self,
        prompt: &str,
        model: &str,
        api_key: &str,
        streaming: bool,
    ) -> Result<ProviderReply>;
}
