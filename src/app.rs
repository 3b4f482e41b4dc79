use std::sync::Arc;

use crate::config::Config;
use crate::entitlements::{EntitlementTracker, MockSubscriptionBackend, SubscriptionBackend};
use crate::service::AppService;
use crate::store::AppStore;
use crate::traits::storage::StateStorage;

/// Application context for dependency injection and shared state
///
/// This is the composition root: it constructs the store and the
/// entitlement tracker from explicit dependencies and hands out the
/// use-case service. Nothing in the crate reaches for a module-level
/// singleton, so tests get isolated instances for free.
#[derive(Clone)]
pub struct AppContext {
    config: Config,
    store: Arc<AppStore>,
    entitlements: Arc<EntitlementTracker>,
}

impl AppContext {
    /// Builder pattern for constructing AppContext
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    pub fn entitlements(&self) -> &Arc<EntitlementTracker> {
        &self.entitlements
    }

    /// The use-case service over this context's store and tracker.
    pub fn service(&self) -> AppService {
        AppService::new(Arc::clone(&self.store), Arc::clone(&self.entitlements))
    }

    /// Rehydrate persisted state, logging and swallowing failures.
    ///
    /// Call once at process start, before interactive UI is reachable.
    /// Use [`AppStore::rehydrate`] directly to surface the error
    /// instead.
    pub async fn start(&self) {
        if let Err(err) = self.store.rehydrate().await {
            tracing::error!(
                target: "verdant::app",
                error = %err,
                "state rehydration failed; continuing from initial state"
            );
        }
    }
}

/// Builder for AppContext
#[must_use = "builder does nothing until you call build()"]
pub struct AppContextBuilder {
    config: Config,
    storage: Option<Arc<dyn StateStorage>>,
    backend: Option<Arc<dyn SubscriptionBackend>>,
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            storage: None,
            backend: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Durable storage for state slices. Without one, the store runs
    /// purely in memory.
    pub fn with_storage(mut self, storage: Arc<dyn StateStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Subscription backend of record. Defaults to the fixed-delay mock.
    pub fn with_backend(mut self, backend: Arc<dyn SubscriptionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> AppContext {
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(MockSubscriptionBackend::new()));

        let store = Arc::new(AppStore::new(&self.config.subscription, self.storage));
        let entitlements = Arc::new(EntitlementTracker::new(
            self.config.subscription.clone(),
            backend,
        ));

        AppContext {
            config: self.config,
            store,
            entitlements,
        }
    }
}

impl Default for AppContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
