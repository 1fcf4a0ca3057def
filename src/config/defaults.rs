//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default per-attempt request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default maximum number of delivery attempts.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default base retry delay in seconds.
pub const RETRY_BASE_DELAY_SECS: u64 = 1;

/// Default per-attempt request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}

/// Default base retry delay as Duration.
#[must_use]
pub const fn retry_base_delay() -> Duration {
    Duration::from_secs(RETRY_BASE_DELAY_SECS)
}
