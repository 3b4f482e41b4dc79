//! Verdant - application core for a plant shopping and care-tracking app
//!
//! Verdant provides the state management and freemium gating layer for a
//! mobile plant app: a reducer-driven store for cross-screen state, an
//! entitlement tracker enforcing free-tier usage ceilings, and a
//! use-case layer that ties the two together. The UI, camera, and AI
//! backends are external collaborators; this crate owns the invariants.
//!
//! # Features
//!
//! - **Store**: deterministic reducer over a closed action set, with
//!   best-effort persistence to pluggable key-value storage
//! - **Entitlements**: four independently limited resources under a
//!   free/premium model, with a mockable subscription backend
//! - **Service**: gated use-cases (`add_plant`, `record_analysis`, …)
//!   that make check-mutate-report a single logical unit
//! - **Context**: explicit dependency injection, isolated instances per
//!   test
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use verdant::{AppContext, ConfigBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     verdant::init_tracing();
//!
//!     // Create and configure the context
//!     let config = ConfigBuilder::new().from_env().build();
//!     let ctx = AppContext::builder().with_config(config).build();
//!
//!     // Restore persisted state before any UI renders
//!     ctx.start().await;
//!
//!     let service = ctx.service();
//!     // ... hand `service` and `ctx.store().subscribe()` to the UI
//! }
//! ```

mod app;
pub mod config;
pub mod entitlements;
mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod traits;
pub mod utils;

// Re-exports for public API
pub use app::{AppContext, AppContextBuilder};
pub use config::{Config, ConfigBuilder, LoggingConfig, SubscriptionConfig};
pub use entitlements::{
    EntitlementStatus, EntitlementTracker, LimitedResource, MockSubscriptionBackend,
    SubscriptionBackend, SubscriptionSnapshot,
};
pub use error::{Result, VerdantError};
pub use model::{
    AppView, DifficultyLevel, LightRequirement, Plant, PlantCategory, PlantHealth, PlantSize,
    PurchaseListItem, PurchaseStatus, User, UserPlant, WateringFrequency,
};
pub use service::AppService;
pub use store::{AppAction, AppState, AppStore, RestoredState, Slice, UserPlantUpdate};
pub use traits::storage::{InMemoryStorage, StateStorage};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, before building the
/// [`AppContext`].
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "verdant=debug")
/// - `VERDANT_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("VERDANT_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
