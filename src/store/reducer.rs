//! Pure state transitions.
//!
//! [`reduce`] is total over the action space: every precondition failure
//! documented on an action is a silent no-op, never an error. All
//! derived fields (`purchase_list_total`, `plants_count`,
//! `can_add_more_plants`) are recomputed from scratch by the transitions
//! that touch them.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AppView, Plant, PlantHealth, PurchaseListItem, PurchaseStatus, User, UserPlant};

/// Cross-screen application state.
///
/// Exclusively owned by the [`AppStore`](super::AppStore); all mutation
/// flows through [`reduce`], never direct field assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub user: Option<User>,
    pub is_authenticated: bool,

    pub purchase_list_items: Vec<PurchaseListItem>,
    /// Reference total over entries still being decided (`Considering`
    /// only). Purchased entries are excluded: this is "cost of what's
    /// still being considered", not a lifetime total, and no payment
    /// hangs off it.
    pub purchase_list_total: u64,

    pub user_plants: Vec<UserPlant>,
    pub recommended_plants: Vec<Plant>,

    pub current_view: AppView,
    pub is_loading: bool,
    pub error: Option<String>,

    pub is_premium: bool,
    pub plants_count: u32,
    pub can_add_more_plants: bool,
}

impl AppState {
    /// The compiled-in initial state.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            purchase_list_items: Vec::new(),
            purchase_list_total: 0,
            user_plants: Vec::new(),
            recommended_plants: Vec::new(),
            current_view: AppView::Home,
            is_loading: false,
            error: None,
            is_premium: false,
            plants_count: 0,
            can_add_more_plants: true,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Partial update for an owned plant. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPlantUpdate {
    pub nickname: Option<String>,
    pub location: Option<String>,
    pub last_watered: Option<NaiveDate>,
    pub days_until_watering: Option<u32>,
    pub health: Option<PlantHealth>,
}

impl UserPlantUpdate {
    fn apply(&self, plant: &mut UserPlant) {
        if let Some(nickname) = &self.nickname {
            plant.nickname = Some(nickname.clone());
        }
        if let Some(location) = &self.location {
            plant.location = location.clone();
        }
        if let Some(last_watered) = self.last_watered {
            plant.last_watered = last_watered;
        }
        if let Some(days) = self.days_until_watering {
            plant.days_until_watering = days;
        }
        if let Some(health) = self.health {
            plant.health = health;
        }
    }
}

/// State slices read back from durable storage at startup.
///
/// Only slices present in the payload are applied; everything else keeps
/// its current in-memory value.
#[derive(Debug, Clone, Default)]
pub struct RestoredState {
    pub purchase_list_items: Option<Vec<PurchaseListItem>>,
    pub user_plants: Option<Vec<UserPlant>>,
    pub user: Option<User>,
}

impl RestoredState {
    /// Whether the payload carries nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.purchase_list_items.is_none() && self.user_plants.is_none() && self.user.is_none()
    }
}

/// The closed set of state transitions.
#[derive(Debug, Clone)]
pub enum AppAction {
    /// Set or clear the signed-in user.
    SetUser(Option<User>),
    /// Append a `Considering` entry unless one already exists for the
    /// plant id (duplicate adds are silently ignored).
    AddToPurchaseList(Plant),
    /// Remove the `Considering` entry for a plant id. Purchased entries
    /// for the same plant are untouched.
    RemoveFromPurchaseList(String),
    /// Flip a `Considering` entry to `Purchased`, stamping the purchase
    /// time and the outbound link. No-op if no `Considering` entry
    /// matches.
    MarkPurchased {
        plant_id: String,
        external_url: Option<String>,
    },
    /// Empty the purchase list.
    ClearPurchaseList,
    /// Append an owned plant. Gating is the caller's responsibility,
    /// enforced before dispatch.
    AddUserPlant(UserPlant),
    /// Merge fields into an owned plant. No-op if the id is absent.
    UpdateUserPlant { id: String, updates: UserPlantUpdate },
    /// Remove an owned plant.
    RemoveUserPlant(String),
    /// Replace the recommendation results.
    SetRecommendedPlants(Vec<Plant>),
    /// Set the subscription tier and regate plant additions.
    SetPremiumStatus(bool),
    SetLoading(bool),
    SetError(Option<String>),
    /// Merge persisted slices back in at startup.
    RestoreState(RestoredState),
}

/// Sum of prices over entries still being decided.
#[must_use]
pub fn purchase_list_total(items: &[PurchaseListItem]) -> u64 {
    items
        .iter()
        .filter(|item| item.is_considering())
        .map(|item| item.plant.price)
        .sum()
}

fn can_add_more_plants(is_premium: bool, plants_count: u32, max_free_plants: u32) -> bool {
    is_premium || plants_count < max_free_plants
}

/// Apply an action to a state, producing the next state.
#[must_use]
pub fn reduce(state: &AppState, action: AppAction, max_free_plants: u32) -> AppState {
    let mut next = state.clone();

    match action {
        AppAction::SetUser(user) => {
            next.is_authenticated = user.is_some();
            next.is_premium = user.as_ref().map_or(false, |u| u.is_premium);
            next.user = user;
        }

        AppAction::AddToPurchaseList(plant) => {
            let exists = next
                .purchase_list_items
                .iter()
                .any(|item| item.plant.id == plant.id && item.is_considering());
            if !exists {
                next.purchase_list_items
                    .push(PurchaseListItem::considering(plant, Utc::now()));
            }
            next.purchase_list_total = purchase_list_total(&next.purchase_list_items);
        }

        AppAction::RemoveFromPurchaseList(plant_id) => {
            next.purchase_list_items
                .retain(|item| !(item.plant.id == plant_id && item.is_considering()));
            next.purchase_list_total = purchase_list_total(&next.purchase_list_items);
        }

        AppAction::MarkPurchased {
            plant_id,
            external_url,
        } => {
            for item in &mut next.purchase_list_items {
                if item.plant.id == plant_id && item.is_considering() {
                    item.status = PurchaseStatus::Purchased;
                    item.purchased_at = Some(Utc::now());
                    item.external_url = external_url.clone();
                }
            }
            next.purchase_list_total = purchase_list_total(&next.purchase_list_items);
        }

        AppAction::ClearPurchaseList => {
            next.purchase_list_items.clear();
            next.purchase_list_total = 0;
        }

        AppAction::AddUserPlant(plant) => {
            next.user_plants.push(plant);
            next.plants_count = next.user_plants.len() as u32;
            next.can_add_more_plants =
                can_add_more_plants(next.is_premium, next.plants_count, max_free_plants);
        }

        AppAction::UpdateUserPlant { id, updates } => {
            if let Some(plant) = next.user_plants.iter_mut().find(|p| p.id == id) {
                updates.apply(plant);
            }
        }

        AppAction::RemoveUserPlant(id) => {
            next.user_plants.retain(|p| p.id != id);
            next.plants_count = next.user_plants.len() as u32;
            next.can_add_more_plants =
                can_add_more_plants(next.is_premium, next.plants_count, max_free_plants);
        }

        AppAction::SetRecommendedPlants(plants) => {
            next.recommended_plants = plants;
        }

        AppAction::SetPremiumStatus(is_premium) => {
            next.is_premium = is_premium;
            next.can_add_more_plants =
                can_add_more_plants(is_premium, next.plants_count, max_free_plants);
        }

        AppAction::SetLoading(is_loading) => {
            next.is_loading = is_loading;
        }

        AppAction::SetError(error) => {
            next.error = error;
        }

        AppAction::RestoreState(restored) => {
            if let Some(items) = restored.purchase_list_items {
                next.purchase_list_items = items;
                next.purchase_list_total = purchase_list_total(&next.purchase_list_items);
            }
            if let Some(plants) = restored.user_plants {
                next.user_plants = plants;
                next.plants_count = next.user_plants.len() as u32;
            }
            if let Some(user) = restored.user {
                next.is_authenticated = true;
                next.is_premium = user.is_premium;
                next.user = Some(user);
            }
            next.can_add_more_plants =
                can_add_more_plants(next.is_premium, next.plants_count, max_free_plants);
        }
    }

    next
}
