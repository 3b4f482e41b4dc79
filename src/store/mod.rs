//! Application Store: single source of truth for cross-screen state.
//!
//! State transitions are synchronous and deterministic (see
//! [`reducer`]); durable persistence is a side effect that never blocks
//! a dispatch. Consumers read through [`AppStore::subscribe`] and mutate
//! exclusively through [`AppStore::dispatch`] — nobody holds a mutable
//! reference to the state itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use verdant::store::{AppStore, AppAction};
//! use verdant::config::SubscriptionConfig;
//!
//! let store = AppStore::new(&SubscriptionConfig::default(), Some(storage));
//! store.rehydrate().await?;
//!
//! let state = store.dispatch(AppAction::AddToPurchaseList(plant));
//! store.persist().await?;
//! ```

pub mod reducer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::config::SubscriptionConfig;
use crate::error::Result;
use crate::traits::storage::StateStorage;

pub use reducer::{reduce, AppAction, AppState, RestoredState, UserPlantUpdate};

/// Storage key for the purchase-consideration list snapshot.
pub const PURCHASE_LIST_KEY: &str = "purchase_list";
/// Storage key for the owned-plant collection snapshot.
pub const USER_PLANTS_KEY: &str = "userPlants";
/// Storage key for the signed-in user record.
pub const USER_KEY: &str = "user";

/// A slice of state mirrored to durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    PurchaseList,
    UserPlants,
    User,
}

impl Slice {
    /// All persisted slices.
    pub const ALL: &'static [Slice] = &[Slice::PurchaseList, Slice::UserPlants, Slice::User];

    /// The storage key this slice is written under.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::PurchaseList => PURCHASE_LIST_KEY,
            Self::UserPlants => USER_PLANTS_KEY,
            Self::User => USER_KEY,
        }
    }
}

impl AppAction {
    /// The persisted slices this action can touch.
    ///
    /// Drives the write-behind after a dispatch; pure-UI actions map to
    /// nothing.
    #[must_use]
    pub fn persisted_slices(&self) -> &'static [Slice] {
        match self {
            AppAction::SetUser(_) => &[Slice::User],
            AppAction::AddToPurchaseList(_)
            | AppAction::RemoveFromPurchaseList(_)
            | AppAction::MarkPurchased { .. }
            | AppAction::ClearPurchaseList => &[Slice::PurchaseList],
            AppAction::AddUserPlant(_)
            | AppAction::UpdateUserPlant { .. }
            | AppAction::RemoveUserPlant(_) => &[Slice::UserPlants],
            AppAction::SetRecommendedPlants(_)
            | AppAction::SetPremiumStatus(_)
            | AppAction::SetLoading(_)
            | AppAction::SetError(_)
            | AppAction::RestoreState(_) => &[],
        }
    }
}

/// Reducer-driven state container with best-effort durable persistence.
///
/// Construct one per application (or per test) and share it behind an
/// [`Arc`]; there is no ambient singleton.
pub struct AppStore {
    state: RwLock<AppState>,
    watch_tx: watch::Sender<AppState>,
    storage: Option<Arc<dyn StateStorage>>,
    max_free_plants: u32,
    restored: AtomicBool,
}

impl AppStore {
    /// Create a store at the compiled-in initial state.
    ///
    /// With `storage = None` the store is purely in-memory: dispatches
    /// work normally and every persistence operation is a no-op.
    #[must_use]
    pub fn new(limits: &SubscriptionConfig, storage: Option<Arc<dyn StateStorage>>) -> Self {
        let initial = AppState::initial();
        let (watch_tx, _) = watch::channel(initial.clone());
        Self {
            state: RwLock::new(initial),
            watch_tx,
            storage,
            max_free_plants: limits.max_free_plants,
            restored: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe to state changes.
    ///
    /// Every dispatch publishes the new state; receivers that lag only
    /// observe the latest value, which is all a UI consumer needs.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.watch_tx.subscribe()
    }

    /// Apply an action synchronously and broadcast the new state.
    ///
    /// Never blocks on persistence; pair with [`persist_slices`]
    /// (awaitable) or use [`dispatch_detached`] for write-behind.
    ///
    /// [`persist_slices`]: Self::persist_slices
    /// [`dispatch_detached`]: Self::dispatch_detached
    pub fn dispatch(&self, action: AppAction) -> AppState {
        let next = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = reduce(&state, action, self.max_free_plants);
            *state = next.clone();
            next
        };
        self.watch_tx.send_replace(next.clone());
        next
    }

    /// Apply an action synchronously, then persist the touched slices in
    /// a background task.
    ///
    /// Persistence failures are logged and swallowed — never surfaced,
    /// never retried. In-memory correctness does not depend on the write
    /// landing. Must be called within a Tokio runtime.
    pub fn dispatch_detached(self: &Arc<Self>, action: AppAction) -> AppState {
        let slices = action.persisted_slices();
        let next = self.dispatch(action);

        if !slices.is_empty() && self.storage.is_some() {
            let store = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(err) = store.persist_slices(slices).await {
                    tracing::warn!(
                        target: "verdant::store",
                        error = %err,
                        "detached persistence failed"
                    );
                }
            });
        }

        next
    }

    /// Write the given slices of the current state to durable storage.
    ///
    /// `user = None` deletes the persisted user record rather than
    /// writing a null.
    pub async fn persist_slices(&self, slices: &[Slice]) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        let snapshot = self.state();

        for slice in slices {
            match slice {
                Slice::PurchaseList => {
                    let json = serde_json::to_string(&snapshot.purchase_list_items)?;
                    storage.set_item(PURCHASE_LIST_KEY, &json).await?;
                }
                Slice::UserPlants => {
                    let json = serde_json::to_string(&snapshot.user_plants)?;
                    storage.set_item(USER_PLANTS_KEY, &json).await?;
                }
                Slice::User => match &snapshot.user {
                    Some(user) => {
                        let json = serde_json::to_string(user)?;
                        storage.set_item(USER_KEY, &json).await?;
                    }
                    None => storage.remove_item(USER_KEY).await?,
                },
            }
        }
        Ok(())
    }

    /// Write all persisted slices, concurrently.
    pub async fn persist(&self) -> Result<()> {
        futures::try_join!(
            self.persist_slices(&[Slice::PurchaseList]),
            self.persist_slices(&[Slice::UserPlants]),
            self.persist_slices(&[Slice::User]),
        )?;
        Ok(())
    }

    /// One-shot startup restore from durable storage.
    ///
    /// Reads the three persisted keys and merges whatever parses back
    /// into the current state. A corrupt snapshot is logged and skipped;
    /// a storage read failure is returned and leaves the state intact
    /// (and re-arms the one-shot so the composition root may retry).
    ///
    /// The merge applies only the keys present in storage, so dispatches
    /// that land before the restore completes survive for untouched
    /// keys and are overwritten for restored ones. The store is expected
    /// to rehydrate once, before interactive UI is reachable; a second
    /// call is a logged no-op.
    pub async fn rehydrate(&self) -> Result<()> {
        if self.restored.swap(true, Ordering::SeqCst) {
            tracing::warn!(target: "verdant::store", "rehydrate called more than once; ignoring");
            return Ok(());
        }

        let result = self.rehydrate_inner().await;
        if result.is_err() {
            self.restored.store(false, Ordering::SeqCst);
        }
        result
    }

    async fn rehydrate_inner(&self) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let purchase_raw = storage.get_item(PURCHASE_LIST_KEY).await?;
        let plants_raw = storage.get_item(USER_PLANTS_KEY).await?;
        let user_raw = storage.get_item(USER_KEY).await?;

        let mut restored = RestoredState::default();

        if let Some(raw) = purchase_raw {
            match serde_json::from_str(&raw) {
                Ok(items) => restored.purchase_list_items = Some(items),
                Err(err) => tracing::warn!(
                    target: "verdant::store",
                    error = %err,
                    "skipping corrupt purchase list snapshot"
                ),
            }
        }
        if let Some(raw) = plants_raw {
            match serde_json::from_str(&raw) {
                Ok(plants) => restored.user_plants = Some(plants),
                Err(err) => tracing::warn!(
                    target: "verdant::store",
                    error = %err,
                    "skipping corrupt user plants snapshot"
                ),
            }
        }
        if let Some(raw) = user_raw {
            match serde_json::from_str(&raw) {
                Ok(user) => restored.user = Some(user),
                Err(err) => tracing::warn!(
                    target: "verdant::store",
                    error = %err,
                    "skipping corrupt user snapshot"
                ),
            }
        }

        if restored.is_empty() {
            tracing::debug!(target: "verdant::store", "nothing persisted; keeping initial state");
            return Ok(());
        }

        self.dispatch(AppAction::RestoreState(restored));
        tracing::debug!(target: "verdant::store", "state rehydrated from storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DifficultyLevel, LightRequirement, Plant, PlantCategory, PlantSize, User,
        WateringFrequency,
    };
    use crate::traits::storage::InMemoryStorage;

    fn plant(id: &str, price: u64) -> Plant {
        Plant {
            id: id.to_string(),
            name: format!("Plant {id}"),
            price,
            size: PlantSize::S,
            difficulty: DifficultyLevel::Beginner,
            light: LightRequirement::PartialShade,
            water: WateringFrequency::OnceOrTwicePerWeek,
            description: String::new(),
            image_url: None,
            category: PlantCategory::Modern,
            stock: None,
        }
    }

    fn user(id: &str, premium: bool) -> User {
        User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: id.to_string(),
            is_premium: premium,
        }
    }

    fn store_with(storage: InMemoryStorage) -> AppStore {
        AppStore::new(&SubscriptionConfig::default(), Some(Arc::new(storage)))
    }

    #[tokio::test]
    async fn test_persist_writes_all_slices() {
        let storage = InMemoryStorage::new();
        let store = store_with(storage.clone());

        store.dispatch(AppAction::SetUser(Some(user("u1", false))));
        store.dispatch(AppAction::AddToPurchaseList(plant("p1", 800)));
        store.persist().await.unwrap();

        assert!(storage.get_item(USER_KEY).await.unwrap().is_some());
        let list_json = storage.get_item(PURCHASE_LIST_KEY).await.unwrap().unwrap();
        assert!(list_json.contains("\"considering\""));
        // Empty collections are written too.
        assert_eq!(
            storage.get_item(USER_PLANTS_KEY).await.unwrap().unwrap(),
            "[]"
        );
    }

    #[tokio::test]
    async fn test_sign_out_deletes_user_record() {
        let storage = InMemoryStorage::new();
        let store = store_with(storage.clone());

        store.dispatch(AppAction::SetUser(Some(user("u1", false))));
        store.persist_slices(&[Slice::User]).await.unwrap();
        assert!(storage.get_item(USER_KEY).await.unwrap().is_some());

        store.dispatch(AppAction::SetUser(None));
        store.persist_slices(&[Slice::User]).await.unwrap();
        assert_eq!(storage.get_item(USER_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rehydrate_round_trip() {
        let storage = InMemoryStorage::new();
        {
            let store = store_with(storage.clone());
            store.dispatch(AppAction::SetUser(Some(user("u1", true))));
            store.dispatch(AppAction::AddToPurchaseList(plant("p1", 1500)));
            store.persist().await.unwrap();
        }

        // A fresh process start.
        let store = store_with(storage);
        store.rehydrate().await.unwrap();

        let state = store.state();
        assert!(state.is_authenticated);
        assert!(state.is_premium);
        assert_eq!(state.purchase_list_total, 1500);
    }

    #[tokio::test]
    async fn test_rehydrate_is_one_shot() {
        let storage = InMemoryStorage::new();
        storage
            .set_item(USER_KEY, &serde_json::to_string(&user("u1", false)).unwrap())
            .await
            .unwrap();

        let store = store_with(storage.clone());
        store.rehydrate().await.unwrap();
        assert!(store.state().is_authenticated);

        // Sign out, then call rehydrate again: the stale record must not
        // come back.
        store.dispatch(AppAction::SetUser(None));
        store.rehydrate().await.unwrap();
        assert!(!store.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_rehydrate_skips_corrupt_snapshot() {
        let storage = InMemoryStorage::new();
        storage
            .set_item(PURCHASE_LIST_KEY, "{definitely not json")
            .await
            .unwrap();
        storage
            .set_item(USER_KEY, &serde_json::to_string(&user("u1", false)).unwrap())
            .await
            .unwrap();

        let store = store_with(storage);
        store.rehydrate().await.unwrap();

        let state = store.state();
        assert!(state.purchase_list_items.is_empty()); // corrupt slice skipped
        assert!(state.is_authenticated); // healthy slice applied
    }

    #[tokio::test]
    async fn test_rehydrate_read_failure_leaves_state_intact() {
        use crate::traits::storage::test::FailingStorage;

        let store = AppStore::new(
            &SubscriptionConfig::default(),
            Some(Arc::new(FailingStorage)),
        );
        let err = store.rehydrate().await.unwrap_err();
        assert!(matches!(err, crate::error::VerdantError::Storage(_)));
        assert_eq!(store.state(), AppState::initial());
    }

    #[tokio::test]
    async fn test_detached_dispatch_eventually_persists() {
        let storage = InMemoryStorage::new();
        let store = Arc::new(store_with(storage.clone()));

        store.dispatch_detached(AppAction::AddToPurchaseList(plant("p1", 2000)));

        // The write lands on a background task; poll briefly.
        let mut written = None;
        for _ in 0..100 {
            if let Some(json) = storage.get_item(PURCHASE_LIST_KEY).await.unwrap() {
                written = Some(json);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        let json = written.expect("detached persistence never landed");
        assert!(json.contains("\"p1\""));
    }

    #[tokio::test]
    async fn test_detached_dispatch_swallows_storage_failure() {
        use crate::traits::storage::test::FailingStorage;

        let store = Arc::new(AppStore::new(
            &SubscriptionConfig::default(),
            Some(Arc::new(FailingStorage)),
        ));

        // Must not panic or surface the failure; state still advances.
        let state = store.dispatch_detached(AppAction::AddToPurchaseList(plant("p1", 100)));
        assert_eq!(state.purchase_list_total, 100);
        tokio::task::yield_now().await;
        assert_eq!(store.state().purchase_list_total, 100);
    }

    #[tokio::test]
    async fn test_subscribe_observes_dispatches() {
        let store = AppStore::new(&SubscriptionConfig::default(), None);
        let mut rx = store.subscribe();

        store.dispatch(AppAction::SetLoading(true));
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_loading);
    }

    #[tokio::test]
    async fn test_persistence_noop_without_storage() {
        let store = AppStore::new(&SubscriptionConfig::default(), None);
        store.dispatch(AppAction::AddToPurchaseList(plant("p1", 100)));
        store.persist().await.unwrap();
        store.rehydrate().await.unwrap();
        assert_eq!(store.state().purchase_list_total, 100);
    }

    #[test]
    fn test_persisted_slices_mapping() {
        assert_eq!(
            AppAction::SetUser(None).persisted_slices(),
            &[Slice::User]
        );
        assert_eq!(
            AppAction::ClearPurchaseList.persisted_slices(),
            &[Slice::PurchaseList]
        );
        assert_eq!(
            AppAction::RemoveUserPlant("x".to_string()).persisted_slices(),
            &[Slice::UserPlants]
        );
        assert!(AppAction::SetLoading(true).persisted_slices().is_empty());
        assert!(AppAction::RestoreState(RestoredState::default())
            .persisted_slices()
            .is_empty());
    }
}
