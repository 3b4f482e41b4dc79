//! Gated use-case layer.
//!
//! The store and the entitlement tracker are independent shared state:
//! callers that talk to both directly can interleave or crash between
//! the entitlement check, the state mutation, and the usage report.
//! [`AppService`] wraps each such sequence in a single function so the
//! check, the mutation, and the report happen as one logical unit and a
//! refusal leaves everything untouched.
//!
//! The pair is still not transactional across a process crash: a crash
//! after the tracker increments but before the store persists leaves the
//! counter and the list inconsistent until the next subscription check
//! against the backend of record.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::entitlements::{EntitlementStatus, EntitlementTracker, LimitedResource};
use crate::error::Result;
use crate::model::{PlantHealth, User, UserPlant};
use crate::store::{AppAction, AppState, AppStore, Slice, UserPlantUpdate};

/// Application use-cases over the store/tracker pair.
///
/// Cheap to clone; hand one to each feature that needs gated access.
#[derive(Clone)]
pub struct AppService {
    store: Arc<AppStore>,
    entitlements: Arc<EntitlementTracker>,
}

impl AppService {
    #[must_use]
    pub fn new(store: Arc<AppStore>, entitlements: Arc<EntitlementTracker>) -> Self {
        Self {
            store,
            entitlements,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    #[must_use]
    pub fn entitlements(&self) -> &Arc<EntitlementTracker> {
        &self.entitlements
    }

    /// Sign a user in and persist the user record.
    pub async fn sign_in(&self, user: User) -> Result<AppState> {
        let state = self.store.dispatch(AppAction::SetUser(Some(user)));
        self.store.persist_slices(&[Slice::User]).await?;
        Ok(state)
    }

    /// Sign out: clears the user and deletes the persisted record.
    pub async fn sign_out(&self) -> Result<AppState> {
        let state = self.store.dispatch(AppAction::SetUser(None));
        self.store.persist_slices(&[Slice::User]).await?;
        Ok(state)
    }

    /// Add an owned plant, gated by the free-plant ceiling.
    ///
    /// Refuses with [`VerdantError::LimitExceeded`] before touching the
    /// store or the counter. On success the in-memory update is applied
    /// before persistence resolves, so a persistence `Err` arrives with
    /// the state already advanced.
    ///
    /// [`VerdantError::LimitExceeded`]: crate::error::VerdantError::LimitExceeded
    pub async fn add_plant(&self, plant: UserPlant) -> Result<AppState> {
        self.entitlements.try_consume(LimitedResource::Plants)?;
        let state = self.store.dispatch(AppAction::AddUserPlant(plant));
        self.store.persist_slices(&[Slice::UserPlants]).await?;
        Ok(state)
    }

    /// Remove an owned plant and release its slot.
    pub async fn remove_plant(&self, id: &str) -> Result<AppState> {
        let state = self
            .store
            .dispatch(AppAction::RemoveUserPlant(id.to_string()));
        self.entitlements.decrement_plants_count();
        self.store.persist_slices(&[Slice::UserPlants]).await?;
        Ok(state)
    }

    /// Record a watering for an owned plant.
    ///
    /// Resets `last_watered` to `today`, restores the countdown from the
    /// plant's watering frequency, and marks it healthy. Silently leaves
    /// the state unchanged if the id is unknown.
    pub async fn water_plant(&self, id: &str, today: NaiveDate) -> Result<AppState> {
        let interval = {
            let state = self.store.state();
            match state.user_plants.iter().find(|p| p.id == id) {
                Some(plant) => plant.water.interval_days(),
                None => {
                    tracing::debug!(target: "verdant::service", plant_id = %id, "watering unknown plant; ignoring");
                    return Ok(state);
                }
            }
        };

        let state = self.store.dispatch(AppAction::UpdateUserPlant {
            id: id.to_string(),
            updates: UserPlantUpdate {
                last_watered: Some(today),
                days_until_watering: Some(interval),
                health: Some(PlantHealth::Healthy),
                ..UserPlantUpdate::default()
            },
        });
        self.store.persist_slices(&[Slice::UserPlants]).await?;
        Ok(state)
    }

    /// Consume one AI room analysis, gated by the free ceiling.
    pub fn record_analysis(&self) -> Result<EntitlementStatus> {
        self.entitlements.try_consume(LimitedResource::Analysis)?;
        Ok(self.entitlements.get_status())
    }

    /// Consume one AI care consultation, gated by the free ceiling.
    pub fn record_consultation(&self) -> Result<EntitlementStatus> {
        self.entitlements
            .try_consume(LimitedResource::Consultation)?;
        Ok(self.entitlements.get_status())
    }

    /// Consume one AR image generation, gated by the free ceiling.
    pub fn record_ar_generation(&self) -> Result<EntitlementStatus> {
        self.entitlements
            .try_consume(LimitedResource::ArGeneration)?;
        Ok(self.entitlements.get_status())
    }

    /// Upgrade to premium and sync the store's tier flag.
    pub async fn upgrade_to_premium(&self) -> Result<bool> {
        let ok = self.entitlements.upgrade_to_premium().await?;
        if ok {
            self.store.dispatch(AppAction::SetPremiumStatus(true));
        }
        Ok(ok)
    }

    /// Cancel the subscription and sync the store's tier flag.
    ///
    /// The tracker keeps its gating booleans until the next
    /// [`check_subscription_status`]; the store regates plant additions
    /// immediately (that recompute is part of the `SetPremiumStatus`
    /// transition).
    ///
    /// [`check_subscription_status`]: EntitlementTracker::check_subscription_status
    pub async fn cancel_subscription(&self) -> Result<bool> {
        let ok = self.entitlements.cancel_subscription().await?;
        if ok {
            self.store.dispatch(AppAction::SetPremiumStatus(false));
        }
        Ok(ok)
    }
}
