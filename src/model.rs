//! Domain value objects shared across the store, entitlements, and
//! service layers.
//!
//! These types mirror the records the app persists and exchanges with the
//! backend, so serde names stay in camelCase.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user.
///
/// Created on sign-in/sign-up, cleared on sign-out. `is_premium` is
/// toggled only by the entitlement upgrade/cancel operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_premium: bool,
}

/// Pot/plant size class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlantSize {
    S,
    M,
    L,
}

/// Care difficulty shown on the catalog card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Light a plant needs to thrive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LightRequirement {
    FullShade,
    BrightShade,
    PartialShade,
    FullSun,
}

/// How often a plant wants water.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WateringFrequency {
    Daily,
    TwoToThreePerWeek,
    OnceOrTwicePerWeek,
    OncePerWeek,
    TwoToThreePerMonth,
}

impl WateringFrequency {
    /// Days until the next watering is due after a fresh watering.
    #[must_use]
    pub fn interval_days(&self) -> u32 {
        match self {
            Self::Daily => 1,
            Self::TwoToThreePerWeek => 3,
            Self::OnceOrTwicePerWeek => 5,
            Self::OncePerWeek => 7,
            Self::TwoToThreePerMonth => 10,
        }
    }
}

/// Interior style category used by the recommendation flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlantCategory {
    Natural,
    Modern,
    Cozy,
    Nordic,
    Tropical,
    Cool,
}

/// A catalog plant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub name: String,
    /// Price in the smallest currency unit (whole yen).
    pub price: u64,
    pub size: PlantSize,
    pub difficulty: DifficultyLevel,
    pub light: LightRequirement,
    pub water: WateringFrequency,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: PlantCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Lifecycle state of a purchase-list entry.
///
/// `Considering` is pre-decision; `Purchased` is terminal. No entry ever
/// transitions back to `Considering`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Considering,
    Purchased,
}

/// An entry on the purchase-consideration list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseListItem {
    pub plant: Plant,
    pub status: PurchaseStatus,
    pub added_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<DateTime<Utc>>,
    /// Outbound purchase link, stamped when the entry is marked purchased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

impl PurchaseListItem {
    /// Create a fresh `Considering` entry for a plant.
    #[must_use]
    pub fn considering(plant: Plant, added_at: DateTime<Utc>) -> Self {
        Self {
            plant,
            status: PurchaseStatus::Considering,
            added_at,
            purchased_at: None,
            external_url: None,
        }
    }

    #[must_use]
    pub fn is_considering(&self) -> bool {
        self.status == PurchaseStatus::Considering
    }

    #[must_use]
    pub fn is_purchased(&self) -> bool {
        self.status == PurchaseStatus::Purchased
    }
}

/// Health of an owned plant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlantHealth {
    Healthy,
    Warning,
    Critical,
}

/// An owned-plant record tracked by the care features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPlant {
    pub id: String,
    /// Catalog plant this record was adopted from.
    pub plant_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub location: String,
    pub last_watered: NaiveDate,
    /// Countdown until the next watering is due.
    pub days_until_watering: u32,
    pub health: PlantHealth,
    pub water: WateringFrequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
}

impl UserPlant {
    /// Adopt a catalog plant into the owned collection.
    ///
    /// The record starts healthy, freshly watered today, with the
    /// countdown seeded from the plant's watering frequency.
    #[must_use]
    pub fn adopt(
        plant: &Plant,
        nickname: Option<String>,
        location: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            id: format!("user-plant-{}", uuid::Uuid::new_v4()),
            plant_id: plant.id.clone(),
            name: plant.name.clone(),
            nickname,
            location: location.into(),
            last_watered: today,
            days_until_watering: plant.water.interval_days(),
            health: PlantHealth::Healthy,
            water: plant.water,
            image_url: plant.image_url.clone(),
            purchase_date: Some(today),
        }
    }

    /// Record a watering: resets `last_watered`, restores the countdown
    /// from the watering frequency, and marks the plant healthy.
    pub fn water_on(&mut self, date: NaiveDate) {
        self.last_watered = date;
        self.days_until_watering = self.water.interval_days();
        self.health = PlantHealth::Healthy;
    }
}

/// The views the application can present.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AppView {
    #[default]
    Home,
    Capture,
    Generating,
    Recommendations,
    MyPlants,
    Shop,
    PurchaseList,
}
