//! Trip entity model and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use wanderwise_core::budget::Expense;
use wanderwise_core::itinerary::DayPlan;

/// A trip row from the `trips` table.
///
/// The itinerary and expense sequences live in JSONB columns and are
/// replaced wholesale on save. `budget_spent` is derived from the expense
/// list and overwritten together with it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trip {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub destination_name: String,
    pub destination_country: Option<String>,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    pub budget_total: f64,
    pub budget_spent: f64,
    pub currency: String,
    pub itinerary: Json<Vec<DayPlan>>,
    pub expenses: Json<Vec<Expense>>,
    pub owner: Uuid,
    pub companions: Vec<Uuid>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Whether `user` may mutate this trip (owner only).
    pub fn is_owned_by(&self, user: Uuid) -> bool {
        self.owner == user
    }

    /// Whether `user` is the owner or a listed companion.
    pub fn is_member(&self, user: Uuid) -> bool {
        self.owner == user || self.companions.contains(&user)
    }
}

/// DTO for creating a new trip.
///
/// The itinerary and expense lists always start empty; day plans are
/// derived lazily from the date range on read.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTrip {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub destination_name: String,
    pub destination_country: Option<String>,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    /// Defaults to 0 if omitted.
    pub budget_total: Option<f64>,
    /// Defaults to `USD` if omitted.
    pub currency: Option<String>,
    pub companions: Option<Vec<Uuid>>,
    /// Defaults to private if omitted.
    pub is_public: Option<bool>,
}

/// DTO for updating an existing trip. All fields are optional.
///
/// This is the full set of fields an owner may change through the trip
/// update endpoint. The itinerary, expenses, derived spent amount, and
/// ownership are deliberately absent: they have their own mutation paths
/// (or none). Unknown fields are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTrip {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub destination_name: Option<String>,
    pub destination_country: Option<String>,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    pub budget_total: Option<f64>,
    pub currency: Option<String>,
    pub companions: Option<Vec<Uuid>>,
    pub is_public: Option<bool>,
}
