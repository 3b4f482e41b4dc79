//! Freemium entitlement tracking and feature gating.
//!
//! Four resources are independently limited on the free tier: owned
//! plants, AI room analyses, AI care consultations, and AR image
//! generations. Each has a monotonic usage counter and a derived gating
//! boolean; premium accounts are unconditionally ungated.
//!
//! # Example
//!
//! ```rust,ignore
//! use verdant::entitlements::{EntitlementTracker, MockSubscriptionBackend};
//! use verdant::config::SubscriptionConfig;
//! use std::sync::Arc;
//!
//! let tracker = EntitlementTracker::new(
//!     SubscriptionConfig::default(),
//!     Arc::new(MockSubscriptionBackend::new()),
//! );
//!
//! if tracker.get_status().can_analyze {
//!     // run the analysis, then report usage
//!     tracker.increment_analysis_count();
//! }
//! ```

pub mod backend;
pub mod status;
pub mod tracker;

pub use backend::{MockSubscriptionBackend, SubscriptionBackend, SubscriptionSnapshot};
pub use status::{EntitlementStatus, LimitedResource};
pub use tracker::EntitlementTracker;
