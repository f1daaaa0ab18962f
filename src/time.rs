//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait that allows injecting
//! instant sleepers in tests while using real Tokio delays in production.
//! The batch dispatcher uses it for inter-batch pacing.

use std::time::Duration;

/// Abstraction over asynchronous delays.
///
/// Implementations suspend the current task for the requested duration,
/// allowing tests to skip real waiting entirely.
///
/// # Example
///
/// ```
/// use bulk_relay::time::{Sleeper, TokioSleeper};
/// use std::time::Duration;
///
/// # async fn example() {
/// let sleeper = TokioSleeper;
/// sleeper.sleep(Duration::from_millis(1)).await;
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Suspends the current task for the given duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately without waiting.
///
/// Used in tests to exercise pacing logic without real delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
