//! Provider registry keyed by configuration string.
//!
//! The registry replaces a string `match` over provider names with a table
//! built once at startup. Lookup is case-insensitive; unknown names produce
//! [`RouterError::UnknownProvider`] instead of an unreachable default branch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::traits::ProviderAdapter;
use super::{AnthropicAdapter, OllamaAdapter, OpenAiCompatAdapter, ProviderId};
use crate::error::{Result, RouterError};

/// Table mapping [`ProviderId`] to its adapter instance.
pub struct ProviderRegistry {
    adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Build a registry with every known provider registered.
    ///
    /// `timeout` bounds buffered upstream calls; `ollama_base_url` points at
    /// the local inference server.
    pub fn with_defaults(ollama_base_url: &str, timeout: Duration) -> Self {
        let mut registry = Self::new();
        registry.register(
            ProviderId::Ollama,
            Arc::new(OllamaAdapter::with_base_url(ollama_base_url, timeout)),
        );
        registry.register(
            ProviderId::OpenAi,
            Arc::new(OpenAiCompatAdapter::openai(timeout)),
        );
        registry.register(
            ProviderId::Anthropic,
            Arc::new(AnthropicAdapter::new(timeout)),
        );
        registry.register(
            ProviderId::Mistral,
            Arc::new(OpenAiCompatAdapter::mistral(timeout)),
        );
        registry.register(
            ProviderId::Together,
            Arc::new(OpenAiCompatAdapter::together(timeout)),
        );
        registry.register(
            ProviderId::Groq,
            Arc::new(OpenAiCompatAdapter::groq(timeout)),
        );
        registry
    }

    /// Register (or replace) the adapter for a provider.
    pub fn register(&mut self, id: ProviderId, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(id, adapter);
    }

    /// Resolve a configuration string to its adapter, case-insensitively.
    ///
    /// Returns [`RouterError::UnknownProvider`] when the name matches no
    /// registered adapter. The canonical [`ProviderId`] is returned alongside
    /// so callers can derive stable cache keys and credential lookups.
    pub fn resolve(&self, name: &str) -> Result<(ProviderId, Arc<dyn ProviderAdapter>)> {
        let id = ProviderId::parse(name)
            .ok_or_else(|| RouterError::UnknownProvider(name.to_string()))?;
        let adapter = self
            .adapters
            .get(&id)
            .cloned()
            .ok_or_else(|| RouterError::UnknownProvider(name.to_string()))?;
        Ok((id, adapter))
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether the registry has no adapters.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProviderRegistry {
        ProviderRegistry::with_defaults("http://localhost:11434", Duration::from_secs(5))
    }

    #[test]
    fn defaults_register_every_provider() {
        let registry = registry();
        assert_eq!(registry.len(), ProviderId::ALL.len());
        for id in ProviderId::ALL {
            assert!(registry.resolve(id.as_str()).is_ok());
        }
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let registry = registry();
        let (id, adapter) = registry.resolve("OLLAMA").expect("resolve");
        assert_eq!(id, ProviderId::Ollama);
        assert_eq!(adapter.name(), "ollama");
    }

    #[test]
    fn resolve_unknown_provider_fails() {
        let registry = registry();
        let err = registry.resolve("gpt4all").err().unwrap();
        assert_eq!(err.to_string(), "Unknown provider: gpt4all");
        assert!(err.is_client_error());
    }

    #[test]
    fn empty_registry_rejects_known_name() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.resolve("ollama").is_err());
    }
}
