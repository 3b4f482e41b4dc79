//! Usage accounting and gate recomputation.

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::SubscriptionConfig;
use crate::error::{Result, VerdantError};

use super::backend::SubscriptionBackend;
use super::status::{EntitlementStatus, LimitedResource};

/// Tracks usage counters and enforces freemium limits.
///
/// Counters are process-local mutable state: the tracker is a
/// convenience cache over the backend of record, and a restart loses
/// usage counts. Callers that need durable accounting must go through
/// [`check_subscription_status`](Self::check_subscription_status)
/// against a real backend.
///
/// Construct one per application (or per test) and share it via
/// [`AppContext`](crate::AppContext); there is no ambient singleton.
pub struct EntitlementTracker {
    status: RwLock<EntitlementStatus>,
    limits: SubscriptionConfig,
    backend: Arc<dyn SubscriptionBackend>,
}

impl EntitlementTracker {
    /// Create a tracker with the given ceilings and backend.
    #[must_use]
    pub fn new(limits: SubscriptionConfig, backend: Arc<dyn SubscriptionBackend>) -> Self {
        Self {
            status: RwLock::new(EntitlementStatus::fresh()),
            limits,
            backend,
        }
    }

    /// The configured free-tier ceilings.
    #[must_use]
    pub fn limits(&self) -> &SubscriptionConfig {
        &self.limits
    }

    /// Snapshot of the current counters and gating booleans.
    #[must_use]
    pub fn get_status(&self) -> EntitlementStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Refresh from the backend of record and recompute all four
    /// gating booleans.
    ///
    /// On the mocked path the backend returns nothing and this reduces
    /// to a fixed-delay recompute from the local counters.
    pub async fn check_subscription_status(&self, user_id: &str) -> Result<EntitlementStatus> {
        let snapshot = self.backend.fetch_status(user_id).await?;

        let mut status = self.write_status();
        if let Some(snap) = snapshot {
            status.is_premium = snap.is_premium;
        }
        status.recompute_all(&self.limits);
        Ok(status.clone())
    }

    /// Record an owned-plant addition.
    pub fn increment_plants_count(&self) {
        let mut status = self.write_status();
        status.plants_count += 1;
        status.recompute(LimitedResource::Plants, &self.limits);
    }

    /// Record an owned-plant removal.
    ///
    /// Driven by UI removal events; saturates at zero.
    pub fn decrement_plants_count(&self) {
        let mut status = self.write_status();
        if status.plants_count > 0 {
            status.plants_count -= 1;
            status.recompute(LimitedResource::Plants, &self.limits);
        }
    }

    /// Record an AI room analysis.
    pub fn increment_analysis_count(&self) {
        let mut status = self.write_status();
        status.analysis_count += 1;
        status.recompute(LimitedResource::Analysis, &self.limits);
    }

    /// Record an AI care consultation.
    pub fn increment_consultation_count(&self) {
        let mut status = self.write_status();
        status.consultation_count += 1;
        status.recompute(LimitedResource::Consultation, &self.limits);
    }

    /// Record an AR image generation.
    pub fn increment_ar_generation_count(&self) {
        let mut status = self.write_status();
        status.ar_generation_count += 1;
        status.recompute(LimitedResource::ArGeneration, &self.limits);
    }

    /// Check-and-increment in one step.
    ///
    /// Refuses with [`VerdantError::LimitExceeded`] without touching the
    /// counter when the resource is gated; otherwise records the usage
    /// and recomputes the resource's gating boolean.
    pub fn try_consume(&self, resource: LimitedResource) -> Result<()> {
        let mut status = self.write_status();
        if !status.allowed(resource) {
            return Err(VerdantError::LimitExceeded {
                resource,
                current: status.counter(resource),
                max: resource.ceiling(&self.limits),
            });
        }

        match resource {
            LimitedResource::Plants => status.plants_count += 1,
            LimitedResource::Analysis => status.analysis_count += 1,
            LimitedResource::Consultation => status.consultation_count += 1,
            LimitedResource::ArGeneration => status.ar_generation_count += 1,
        }
        status.recompute(resource, &self.limits);
        Ok(())
    }

    /// Run the payment round-trip and, on success, ungate everything.
    pub async fn upgrade_to_premium(&self) -> Result<bool> {
        let ok = self.backend.upgrade().await?;
        if ok {
            let mut status = self.write_status();
            status.is_premium = true;
            status.force_all_allowed();
            tracing::info!(target: "verdant::entitlements", "upgraded to premium");
        }
        Ok(ok)
    }

    /// Cancel the premium subscription.
    ///
    /// Clears `is_premium` but does NOT recompute the four gating
    /// booleans; they keep their last values until the next
    /// [`check_subscription_status`](Self::check_subscription_status).
    pub async fn cancel_subscription(&self) -> Result<bool> {
        let ok = self.backend.cancel().await?;
        if ok {
            let mut status = self.write_status();
            status.is_premium = false;
            tracing::info!(target: "verdant::entitlements", "subscription canceled");
        }
        Ok(ok)
    }

    /// Start a new billing period: zero the three AI counters and
    /// re-allow them.
    ///
    /// `plants_count` is untouched; plant ownership is not a
    /// renewing-period resource.
    pub fn reset_monthly_limits(&self) {
        let mut status = self.write_status();
        status.analysis_count = 0;
        status.consultation_count = 0;
        status.ar_generation_count = 0;
        status.can_analyze = true;
        status.can_consult = true;
        status.can_generate_ar = true;
    }

    fn write_status(&self) -> std::sync::RwLockWriteGuard<'_, EntitlementStatus> {
        // Recover from a poisoned lock; the status is a plain value and
        // stays internally consistent.
        self.status.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlements::backend::MockSubscriptionBackend;

    fn tracker() -> EntitlementTracker {
        EntitlementTracker::new(
            SubscriptionConfig::default(),
            Arc::new(MockSubscriptionBackend::instant()),
        )
    }

    fn tracker_with(limits: SubscriptionConfig) -> EntitlementTracker {
        EntitlementTracker::new(limits, Arc::new(MockSubscriptionBackend::instant()))
    }

    #[test]
    fn test_analysis_ceiling_flips_on_reaching_limit() {
        let tracker = tracker();
        let max = tracker.limits().max_free_ai_analysis;

        for i in 0..max {
            assert!(tracker.get_status().can_analyze, "gated too early at {i}");
            tracker.increment_analysis_count();
        }

        // The increment that reached the ceiling flipped the gate.
        let status = tracker.get_status();
        assert_eq!(status.analysis_count, max);
        assert!(!status.can_analyze);

        // Further increments leave it gated.
        tracker.increment_analysis_count();
        assert!(!tracker.get_status().can_analyze);
    }

    #[test]
    fn test_decrement_plants_guards_zero() {
        let tracker = tracker();
        tracker.decrement_plants_count();
        assert_eq!(tracker.get_status().plants_count, 0);

        tracker.increment_plants_count();
        tracker.decrement_plants_count();
        tracker.decrement_plants_count();
        assert_eq!(tracker.get_status().plants_count, 0);
    }

    #[test]
    fn test_plants_gate_reopens_on_removal() {
        let tracker = tracker();
        let max = tracker.limits().max_free_plants;

        for _ in 0..max {
            tracker.increment_plants_count();
        }
        assert!(!tracker.get_status().can_add_more_plants);

        tracker.decrement_plants_count();
        let status = tracker.get_status();
        assert_eq!(status.plants_count, max - 1);
        assert!(status.can_add_more_plants);
    }

    #[test]
    fn test_try_consume_refuses_without_counting() {
        let limits = SubscriptionConfig {
            max_free_ar_generation: 2,
            ..SubscriptionConfig::default()
        };
        let tracker = tracker_with(limits);

        assert!(tracker.try_consume(LimitedResource::ArGeneration).is_ok());
        assert!(tracker.try_consume(LimitedResource::ArGeneration).is_ok());

        let err = tracker
            .try_consume(LimitedResource::ArGeneration)
            .unwrap_err();
        assert!(err.is_limit_exceeded());

        // Refusal did not bump the counter.
        assert_eq!(tracker.get_status().ar_generation_count, 2);
    }

    #[tokio::test]
    async fn test_upgrade_forces_all_gates_open() {
        let tracker = tracker();
        for _ in 0..10 {
            tracker.increment_analysis_count();
            tracker.increment_plants_count();
        }
        assert!(!tracker.get_status().can_analyze);

        assert!(tracker.upgrade_to_premium().await.unwrap());

        let status = tracker.get_status();
        assert!(status.is_premium);
        assert!(status.can_add_more_plants);
        assert!(status.can_analyze);
        assert!(status.can_consult);
        assert!(status.can_generate_ar);
    }

    #[tokio::test]
    async fn test_cancel_leaves_gates_until_next_check() {
        let tracker = tracker();
        for _ in 0..10 {
            tracker.increment_analysis_count();
        }
        tracker.upgrade_to_premium().await.unwrap();

        assert!(tracker.cancel_subscription().await.unwrap());

        // Premium flag dropped, but booleans still show the forced values.
        let status = tracker.get_status();
        assert!(!status.is_premium);
        assert!(status.can_analyze);

        // A status check recomputes against the counters.
        let status = tracker.check_subscription_status("u1").await.unwrap();
        assert!(!status.can_analyze);
    }

    #[test]
    fn test_reset_monthly_limits_spares_plants() {
        let tracker = tracker();
        for _ in 0..10 {
            tracker.increment_analysis_count();
            tracker.increment_consultation_count();
            tracker.increment_ar_generation_count();
            tracker.increment_plants_count();
        }

        tracker.reset_monthly_limits();

        let status = tracker.get_status();
        assert_eq!(status.analysis_count, 0);
        assert_eq!(status.consultation_count, 0);
        assert_eq!(status.ar_generation_count, 0);
        assert!(status.can_analyze);
        assert!(status.can_consult);
        assert!(status.can_generate_ar);

        // Plant ownership is not a renewing resource.
        assert_eq!(status.plants_count, 10);
        assert!(!status.can_add_more_plants);
    }

    #[tokio::test]
    async fn test_check_status_recomputes_from_counters() {
        let tracker = tracker();
        let max = tracker.limits().max_free_ai_consultation;
        for _ in 0..max {
            tracker.increment_consultation_count();
        }

        let status = tracker.check_subscription_status("user-1").await.unwrap();
        assert!(!status.can_consult);
        assert!(status.can_analyze);
    }
}
