//! ai-router — single-node request router for code-assistance LLM providers.
//!
//! Accepts completion and multi-file refactor requests, dispatches them to
//! one of several interchangeable upstream text-generation providers
//! selected by mutable configuration, and serves previously computed
//! buffered responses from an in-memory FIFO + TTL cache.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use ai_router::{
//!     AppState, FileConfigSource, ProviderRegistry, ResponseCache, Router, server,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(ProviderRegistry::with_defaults(
//!         "http://localhost:11434",
//!         Duration::from_secs(60),
//!     ));
//!     let cache = Arc::new(ResponseCache::new(100, Duration::from_secs(3600), true));
//!     let config = Arc::new(FileConfigSource::new(".aistudio/config.json"));
//!     let router = Arc::new(Router::new(registry, cache.clone(), config.clone()));
//!
//!     let app = server::app(AppState { router, cache, config });
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod providers;
pub mod router;
pub mod server;
pub mod telemetry;

// Re-export main types at crate root
pub use cache::{CacheStats, ResponseCache, cache_key};
pub use config::{
    ApiKeys, ConfigSnapshot, ConfigSource, DEFAULT_CONFIG_PATH, FileConfigSource,
    StaticConfigSource,
};
pub use error::{Result, RouterError};
pub use providers::{
    AnthropicAdapter, ByteStream, OllamaAdapter, OpenAiCompatAdapter, ProviderAdapter, ProviderId,
    ProviderRegistry, ProviderReply,
};
pub use router::{RefactorFile, RefactorOutcome, Router};
pub use server::AppState;
