//! Per-request configuration snapshots.
//!
//! The router loads a fresh [`ConfigSnapshot`] on every request so that an
//! external editor can switch provider or model by rewriting one JSON file,
//! with no restart. The snapshot is an immutable value produced by a
//! [`ConfigSource`]; tests substitute [`StaticConfigSource`] for the
//! file-backed one.
//!
//! File format (default path `.aistudio/config.json`, workspace-relative):
//!
//! ```json
//! {
//!   "provider": "ollama",
//!   "model": "codellama",
//!   "apiKeys": { "openai": "sk-...", "anthropic": "sk-ant-..." }
//! }
//! ```
//!
//! An absent file falls back to environment-variable-derived defaults. A
//! present but unparsable file does the same with a warning — a broken
//! config file must never fail a request.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::providers::ProviderId;

/// Default workspace-relative path of the config file.
pub const DEFAULT_CONFIG_PATH: &str = ".aistudio/config.json";

/// Immutable configuration value consumed by one request.
///
/// `provider` is kept as the raw string from the file; validation happens
/// in the registry so unknown names surface as client-visible errors
/// rather than being silently defaulted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_keys: ApiKeys,
}

impl ConfigSnapshot {
    /// Built-in defaults, honouring `DEFAULT_PROVIDER` / `DEFAULT_MODEL`
    /// and the per-provider key environment variables.
    pub fn default_from_env() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_keys: ApiKeys::from_env(),
        }
    }
}

fn default_provider() -> String {
    std::env::var("DEFAULT_PROVIDER").unwrap_or_else(|_| "ollama".to_string())
}

fn default_model() -> String {
    std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| "codellama".to_string())
}

/// Per-provider credentials. Ollama runs locally and needs none.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    pub openai: String,
    #[serde(default)]
    pub anthropic: String,
    #[serde(default)]
    pub mistral: String,
    #[serde(default)]
    pub together: String,
    #[serde(default)]
    pub groq: String,
}

impl ApiKeys {
    /// Credential for a provider; empty string for providers without one.
    pub fn for_provider(&self, id: ProviderId) -> &str {
        match id {
            ProviderId::Ollama => "",
            ProviderId::OpenAi => &self.openai,
            ProviderId::Anthropic => &self.anthropic,
            ProviderId::Mistral => &self.mistral,
            ProviderId::Together => &self.together,
            ProviderId::Groq => &self.groq,
        }
    }

    fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self {
            openai: var("OPENAI_API_KEY"),
            anthropic: var("ANTHROPIC_API_KEY"),
            mistral: var("MISTRAL_API_KEY"),
            together: var("TOGETHER_API_KEY"),
            groq: var("GROQ_API_KEY"),
        }
    }
}

/// Source of per-request configuration snapshots.
///
/// Loading never fails: a source degrades to defaults rather than
/// propagating an error into the request path.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> ConfigSnapshot;
}

/// Reads the snapshot from a JSON file on every call.
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> ConfigSnapshot {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e,
                          "unparsable config file, falling back to defaults");
                    ConfigSnapshot::default_from_env()
                }
            },
            // Absent file is the normal first-run state, not worth a warning.
            Err(_) => ConfigSnapshot::default_from_env(),
        }
    }
}

/// Fixed snapshot source for tests and embedded use.
pub struct StaticConfigSource {
    snapshot: ConfigSnapshot,
}

impl StaticConfigSource {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self { snapshot }
    }
}

impl ConfigSource for StaticConfigSource {
    fn load(&self) -> ConfigSnapshot {
        self.snapshot.clone()
    }
}
