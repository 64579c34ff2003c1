//! Request orchestration: prompt assembly, cache lookup, provider dispatch.
//!
//! The [`Router`] is stateless between calls — each request is fully
//! parameterised by a freshly-loaded [`ConfigSnapshot`]. The only stateful
//! collaborator is the injected [`ResponseCache`].
//!
//! Dispatch policy per endpoint:
//!
//! - `complete` streams: the adapter is called with `streaming=true` and the
//!   raw bytes are piped to the caller. Streamed results are never
//!   cache-eligible, so this path neither consults nor populates the cache.
//! - `refactor` buffers: always non-streaming and always cacheable, keyed on
//!   `(provider, model, prompt)`.
//!
//! Cancellation: handler futures are dropped when the inbound connection
//! goes away, which aborts the in-flight upstream call before the cache
//! write — the cache can never be populated from a cancelled request.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{ResponseCache, cache_key};
use crate::config::ConfigSource;
use crate::error::{Result, RouterError};
use crate::providers::{ProviderRegistry, ProviderReply};
use crate::telemetry;

/// One input file for a refactor request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefactorFile {
    pub path: String,
    pub content: String,
}

/// Result of a refactor call, echoing the provider/model that produced it.
#[derive(Debug, Clone)]
pub struct RefactorOutcome {
    pub result: Value,
    pub provider: String,
    pub model: String,
    pub cached: bool,
}

/// The orchestration layer between the HTTP surface and the adapters.
pub struct Router {
    registry: Arc<ProviderRegistry>,
    cache: Arc<ResponseCache>,
    config: Arc<dyn ConfigSource>,
}

impl Router {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        cache: Arc<ResponseCache>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            registry,
            cache,
            config,
        }
    }

    /// Streaming code completion.
    ///
    /// Builds the effective prompt (`context` prepended when non-empty),
    /// resolves the configured adapter, and delegates with `streaming=true`.
    /// Validation and unknown-provider errors fire before any network call.
    pub async fn complete(&self, prompt: &str, context: Option<&str>) -> Result<ProviderReply> {
        let started = Instant::now();
        let result = self.complete_inner(prompt, context).await;
        record("complete", started, result.is_ok());
        result
    }

    async fn complete_inner(&self, prompt: &str, context: Option<&str>) -> Result<ProviderReply> {
        if prompt.is_empty() {
            return Err(RouterError::Validation("Prompt is required".to_string()));
        }

        let snapshot = self.config.load();
        let full_prompt = match context {
            Some(context) if !context.is_empty() => format!("{context}\n\n{prompt}"),
            _ => prompt.to_string(),
        };

        let (id, adapter) = self.registry.resolve(&snapshot.provider)?;
        info!(provider = %id, model = %snapshot.model, "dispatching completion");

        adapter
            .send(
                &full_prompt,
                &snapshot.model,
                snapshot.api_keys.for_provider(id),
                true,
            )
            .await
    }

    /// Buffered multi-file refactor, served from cache when possible.
    pub async fn refactor(
        &self,
        files: &[RefactorFile],
        instruction: &str,
    ) -> Result<RefactorOutcome> {
        let started = Instant::now();
        let result = self.refactor_inner(files, instruction).await;
        record("refactor", started, result.is_ok());
        result
    }

    async fn refactor_inner(
        &self,
        files: &[RefactorFile],
        instruction: &str,
    ) -> Result<RefactorOutcome> {
        if files.is_empty() || instruction.is_empty() {
            return Err(RouterError::Validation(
                "Files and instruction are required".to_string(),
            ));
        }

        let snapshot = self.config.load();
        let (id, adapter) = self.registry.resolve(&snapshot.provider)?;
        let prompt = build_refactor_prompt(files, instruction);

        // Key on the canonical provider name so "Ollama" and "ollama" share
        // an entry.
        let key = cache_key(id.as_str(), &snapshot.model, &prompt);
        if let Some(result) = self.cache.get(key) {
            debug!(provider = %id, model = %snapshot.model, "refactor served from cache");
            return Ok(RefactorOutcome {
                result,
                provider: snapshot.provider,
                model: snapshot.model,
                cached: true,
            });
        }

        info!(provider = %id, model = %snapshot.model, files = files.len(),
              "dispatching refactor");

        let reply = adapter
            .send(
                &prompt,
                &snapshot.model,
                snapshot.api_keys.for_provider(id),
                false,
            )
            .await?;

        let result = match reply {
            ProviderReply::Buffered(value) => value,
            ProviderReply::Stream(_) => {
                return Err(RouterError::Upstream {
                    provider: adapter.name(),
                    message: "expected a buffered response for refactor".to_string(),
                });
            }
        };

        self.cache.put(key, result.clone());

        Ok(RefactorOutcome {
            result,
            provider: snapshot.provider,
            model: snapshot.model,
            cached: false,
        })
    }
}

fn record(operation: &'static str, started: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL, "operation" => operation, "status" => status)
        .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "operation" => operation)
        .record(started.elapsed().as_secs_f64());
}

/// Assemble the refactor prompt: instruction first, then each file as a
/// labelled code block in input order, then the closing directive.
fn build_refactor_prompt(files: &[RefactorFile], instruction: &str) -> String {
    let mut prompt =
        format!("Refactor the following code according to this instruction: {instruction}\n\n");
    for (index, file) in files.iter().enumerate() {
        prompt.push_str(&format!(
            "File {}: {}\n```\n{}\n```\n\n",
            index + 1,
            file.path,
            file.content
        ));
    }
    prompt.push_str("Provide the refactored code for each file.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refactor_prompt_labels_files_in_input_order() {
        let files = vec![
            RefactorFile {
                path: "a.js".to_string(),
                content: "x".to_string(),
            },
            RefactorFile {
                path: "b.js".to_string(),
                content: "y".to_string(),
            },
        ];
        let prompt = build_refactor_prompt(&files, "rename x to y");

        assert!(prompt.starts_with(
            "Refactor the following code according to this instruction: rename x to y\n\n"
        ));
        let a = prompt.find("File 1: a.js\n```\nx\n```\n\n").unwrap();
        let b = prompt.find("File 2: b.js\n```\ny\n```\n\n").unwrap();
        assert!(a < b);
        assert!(prompt.ends_with("Provide the refactored code for each file."));
    }

    #[test]
    fn refactor_prompt_is_deterministic() {
        let files = vec![RefactorFile {
            path: "a.js".to_string(),
            content: "x".to_string(),
        }];
        assert_eq!(
            build_refactor_prompt(&files, "i"),
            build_refactor_prompt(&files, "i")
        );
    }
}
