//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default Graph API base URL.
pub const GRAPH_URL: &str = "https://graph.facebook.com";

/// Default Graph API version for the messaging endpoint.
pub const API_VERSION: &str = "v20.0";

/// Default batch width (recipients per concurrent wave).
pub const BATCH_SIZE: usize = 78;

/// Default pause between batches in milliseconds.
pub const BATCH_PAUSE_MS: u64 = 200;

/// Default per-request timeout in seconds. Zero disables the bound.
pub const SEND_TIMEOUT_SECS: u64 = 30;

/// Default connection pool capacity shared across a job's sends.
pub const POOL_LIMIT: usize = 1000;

/// Default inter-batch pause as Duration.
#[must_use]
pub const fn batch_pause() -> Duration {
    Duration::from_millis(BATCH_PAUSE_MS)
}

/// Default per-request timeout as Duration.
#[must_use]
pub const fn send_timeout() -> Duration {
    Duration::from_secs(SEND_TIMEOUT_SECS)
}
