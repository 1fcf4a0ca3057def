//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait that lets the delivery loop wait
//! between attempts, while tests substitute a sleeper that returns at once.

use std::time::Duration;

/// Abstraction over waiting for testability.
///
/// The delivery loop awaits the sleeper during backoff, which parks the
/// calling task for the whole delay.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use yopass_webhook::time::{InstantSleeper, Sleeper};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// InstantSleeper.sleep(Duration::from_secs(3600)).await;
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately.
///
/// Useful in tests that exercise retries without waiting.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
