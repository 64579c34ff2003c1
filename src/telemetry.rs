//! Telemetry metric name constants.
//!
//! Centralised metric names for router operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `airouter_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation` — endpoint invoked ("complete" | "refactor")
//! - `provider` — provider name (e.g. "ollama", "openai")
//! - `status` — outcome: "ok" or "error"

/// Total requests dispatched through the router.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "airouter_requests_total";

/// Request duration in seconds.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "airouter_request_duration_seconds";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "airouter_cache_hits_total";

/// Total response cache misses, counting absent and expired lookups.
/// Lookups against a disabled cache are not counted — a disabled cache
/// is silent.
pub const CACHE_MISSES_TOTAL: &str = "airouter_cache_misses_total";
