//! Subscription backend seam.
//!
//! The tracker's async operations go through this trait. A production
//! deployment implements it against the backend of record (profile +
//! payment provider); [`MockSubscriptionBackend`] simulates the
//! round-trips with fixed delays and always succeeds.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Authoritative subscription state returned by the backend of record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnapshot {
    pub is_premium: bool,
}

/// Remote subscription/payment operations.
#[async_trait]
pub trait SubscriptionBackend: Send + Sync {
    /// Fetch the authoritative subscription state for a user.
    ///
    /// Returns `Ok(None)` when the backend has nothing newer than the
    /// local counters (the mocked path always answers this way).
    async fn fetch_status(&self, user_id: &str) -> Result<Option<SubscriptionSnapshot>>;

    /// Run the payment round-trip for a premium upgrade.
    ///
    /// Returns whether the payment succeeded.
    async fn upgrade(&self) -> Result<bool>;

    /// Cancel the premium subscription.
    ///
    /// Returns whether the cancellation was accepted.
    async fn cancel(&self) -> Result<bool>;
}

/// Mock backend with fixed round-trip delays.
///
/// Matches the latencies of the real flows it stands in for: a quick
/// status check, a slow payment round-trip, and a cancellation in
/// between.
#[derive(Debug, Clone)]
pub struct MockSubscriptionBackend {
    check_delay: Duration,
    upgrade_delay: Duration,
    cancel_delay: Duration,
}

impl MockSubscriptionBackend {
    /// Create a mock with realistic delays (500ms / 2s / 1s).
    #[must_use]
    pub fn new() -> Self {
        Self {
            check_delay: Duration::from_millis(500),
            upgrade_delay: Duration::from_secs(2),
            cancel_delay: Duration::from_secs(1),
        }
    }

    /// Create a mock with zero delays, for tests.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            check_delay: Duration::ZERO,
            upgrade_delay: Duration::ZERO,
            cancel_delay: Duration::ZERO,
        }
    }
}

impl Default for MockSubscriptionBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionBackend for MockSubscriptionBackend {
    async fn fetch_status(&self, user_id: &str) -> Result<Option<SubscriptionSnapshot>> {
        tokio::time::sleep(self.check_delay).await;
        tracing::debug!(
            target: "verdant::entitlements",
            user_id = %user_id,
            "mock subscription check"
        );
        Ok(None)
    }

    async fn upgrade(&self) -> Result<bool> {
        tokio::time::sleep(self.upgrade_delay).await;
        Ok(true)
    }

    async fn cancel(&self) -> Result<bool> {
        tokio::time::sleep(self.cancel_delay).await;
        Ok(true)
    }
}
