//! Entitlement status: usage counters and derived gating booleans.

use serde::{Deserialize, Serialize};

use crate::config::SubscriptionConfig;

/// A resource limited on the free tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LimitedResource {
    /// Owned-plant slots.
    Plants,
    /// AI room analyses.
    Analysis,
    /// AI care consultations.
    Consultation,
    /// AR image generations.
    ArGeneration,
}

impl LimitedResource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plants => "plants",
            Self::Analysis => "analysis",
            Self::Consultation => "consultation",
            Self::ArGeneration => "ar_generation",
        }
    }

    /// The configured free-tier ceiling for this resource.
    #[must_use]
    pub fn ceiling(&self, limits: &SubscriptionConfig) -> u32 {
        match self {
            Self::Plants => limits.max_free_plants,
            Self::Analysis => limits.max_free_ai_analysis,
            Self::Consultation => limits.max_free_ai_consultation,
            Self::ArGeneration => limits.max_free_ar_generation,
        }
    }
}

impl std::fmt::Display for LimitedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current subscription tier, usage counters, and gating booleans.
///
/// Each boolean is `true` iff the account is premium OR the
/// corresponding counter is strictly below its configured ceiling.
/// This shape also matches the subscription-status payload the backend
/// of record returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementStatus {
    pub is_premium: bool,
    pub plants_count: u32,
    pub analysis_count: u32,
    pub consultation_count: u32,
    pub ar_generation_count: u32,
    pub can_add_more_plants: bool,
    pub can_analyze: bool,
    pub can_consult: bool,
    pub can_generate_ar: bool,
}

impl EntitlementStatus {
    /// A fresh free-tier status: nothing used, everything allowed.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            is_premium: false,
            plants_count: 0,
            analysis_count: 0,
            consultation_count: 0,
            ar_generation_count: 0,
            can_add_more_plants: true,
            can_analyze: true,
            can_consult: true,
            can_generate_ar: true,
        }
    }

    /// Current counter value for a resource.
    #[must_use]
    pub fn counter(&self, resource: LimitedResource) -> u32 {
        match resource {
            LimitedResource::Plants => self.plants_count,
            LimitedResource::Analysis => self.analysis_count,
            LimitedResource::Consultation => self.consultation_count,
            LimitedResource::ArGeneration => self.ar_generation_count,
        }
    }

    /// Current gating boolean for a resource.
    #[must_use]
    pub fn allowed(&self, resource: LimitedResource) -> bool {
        match resource {
            LimitedResource::Plants => self.can_add_more_plants,
            LimitedResource::Analysis => self.can_analyze,
            LimitedResource::Consultation => self.can_consult,
            LimitedResource::ArGeneration => self.can_generate_ar,
        }
    }

    /// Recompute the gating boolean for one resource from its counter.
    pub fn recompute(&mut self, resource: LimitedResource, limits: &SubscriptionConfig) {
        let allowed = self.is_premium || self.counter(resource) < resource.ceiling(limits);
        match resource {
            LimitedResource::Plants => self.can_add_more_plants = allowed,
            LimitedResource::Analysis => self.can_analyze = allowed,
            LimitedResource::Consultation => self.can_consult = allowed,
            LimitedResource::ArGeneration => self.can_generate_ar = allowed,
        }
    }

    /// Recompute all four gating booleans.
    pub fn recompute_all(&mut self, limits: &SubscriptionConfig) {
        self.recompute(LimitedResource::Plants, limits);
        self.recompute(LimitedResource::Analysis, limits);
        self.recompute(LimitedResource::Consultation, limits);
        self.recompute(LimitedResource::ArGeneration, limits);
    }

    /// Force every gating boolean to allowed, regardless of counters.
    pub fn force_all_allowed(&mut self) {
        self.can_add_more_plants = true;
        self.can_analyze = true;
        self.can_consult = true;
        self.can_generate_ar = true;
    }
}

impl Default for EntitlementStatus {
    fn default() -> Self {
        Self::fresh()
    }
}
