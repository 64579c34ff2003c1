//! Router error types.

/// Errors produced while routing a request.
///
/// The taxonomy maps directly onto the HTTP surface: [`Validation`] and
/// [`UnknownProvider`] are client errors detected before any network call,
/// everything else is a server-side failure.
///
/// [`Validation`]: RouterError::Validation
/// [`UnknownProvider`]: RouterError::UnknownProvider
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Missing or malformed caller input. Never retried.
    #[error("{0}")]
    Validation(String),

    /// Configuration names a provider with no registered adapter.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Transport failure or non-2xx response from an upstream provider.
    #[error("{provider} error: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    /// Failure while relaying a streamed upstream body.
    #[error("stream error: {0}")]
    Stream(String),

    /// Process-level misconfiguration (bad bind address, etc.).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RouterError {
    /// Wrap an upstream transport failure with the provider's name.
    pub fn upstream(provider: &'static str, cause: impl std::fmt::Display) -> Self {
        RouterError::Upstream {
            provider,
            message: cause.to_string(),
        }
    }

    /// Whether this error is the caller's fault (HTTP 400 class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RouterError::Validation(_) | RouterError::UnknownProvider(_)
        )
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
