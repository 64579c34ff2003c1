//! aird — AI router daemon.
//!
//! Serves the code-assistance routing surface over HTTP: streaming
//! completion, buffered multi-file refactor, and cache administration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_router::{
    AppState, FileConfigSource, ProviderRegistry, ResponseCache, Router, server,
};

/// AI router daemon — code-assistance request router.
#[derive(Parser)]
#[command(name = "aird")]
#[command(about = "Code-assistance request router daemon")]
struct Args {
    /// Address to bind to.
    #[arg(long, env = "AI_ROUTER_ADDR", default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// Path to the per-request configuration file.
    #[arg(long, env = "AI_ROUTER_CONFIG", default_value = ai_router::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Maximum number of cached responses.
    #[arg(long, env = "AI_ROUTER_CACHE_CAPACITY", default_value_t = 100)]
    cache_capacity: usize,

    /// Time-to-live for cached responses, in seconds.
    #[arg(long, env = "AI_ROUTER_CACHE_TTL_SECS", default_value_t = 3600)]
    cache_ttl_secs: u64,

    /// Whether the response cache starts enabled.
    #[arg(long, env = "AI_ROUTER_CACHE_ENABLED", default_value_t = true,
          action = clap::ArgAction::Set)]
    cache_enabled: bool,

    /// Timeout for buffered upstream calls, in seconds. Streaming calls get
    /// a connect timeout only.
    #[arg(long, env = "AI_ROUTER_UPSTREAM_TIMEOUT_SECS", default_value_t = 60)]
    upstream_timeout_secs: u64,

    /// Base URL of the local Ollama instance.
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = "http://localhost:11434")]
    ollama_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let registry = Arc::new(ProviderRegistry::with_defaults(
        &args.ollama_url,
        Duration::from_secs(args.upstream_timeout_secs),
    ));
    let cache = Arc::new(ResponseCache::new(
        args.cache_capacity,
        Duration::from_secs(args.cache_ttl_secs),
        args.cache_enabled,
    ));
    let config = Arc::new(FileConfigSource::new(args.config.clone()));
    let router = Arc::new(Router::new(registry, cache.clone(), config.clone()));

    let state = AppState {
        router,
        cache,
        config,
    };

    info!(addr = %args.addr, config = %args.config.display(),
          cache_capacity = args.cache_capacity, cache_ttl_secs = args.cache_ttl_secs,
          "aird starting");

    let listener = TcpListener::bind(args.addr).await?;
    axum::serve(listener, server::app(state)).await?;

    Ok(())
}
