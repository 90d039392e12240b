//! Repository for the `trips` table.
//!
//! Every mutation entry point re-verifies ownership (or membership, for
//! expense writes) in its own WHERE clause; callers never bypass the
//! access check. There is no optimistic-concurrency token: concurrent
//! saves of the same document resolve by last physical write.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use wanderwise_core::budget::Expense;
use wanderwise_core::itinerary::DayPlan;

use crate::models::trip::{CreateTrip, Trip, UpdateTrip};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, start_date, end_date, \
     destination_name, destination_country, destination_lat, destination_lng, \
     budget_total, budget_spent, currency, itinerary, expenses, \
     owner, companions, is_public, created_at, updated_at";

/// Provides storage and retrieval for trip aggregates.
pub struct TripRepo;

impl TripRepo {
    /// Insert a new trip owned by `owner`, returning the created row.
    ///
    /// The itinerary and expense documents start empty and spent starts
    /// at zero.
    pub async fn create(
        pool: &PgPool,
        owner: Uuid,
        input: &CreateTrip,
    ) -> Result<Trip, sqlx::Error> {
        let query = format!(
            "INSERT INTO trips (title, description, start_date, end_date,
                 destination_name, destination_country, destination_lat, destination_lng,
                 budget_total, currency, owner, companions, is_public)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                 COALESCE($9, 0), COALESCE($10, 'USD'), $11,
                 COALESCE($12, ARRAY[]::uuid[]), COALESCE($13, FALSE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.destination_name)
            .bind(&input.destination_country)
            .bind(input.destination_lat)
            .bind(input.destination_lng)
            .bind(input.budget_total)
            .bind(&input.currency)
            .bind(owner)
            .bind(&input.companions)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    /// Find a trip readable by `requester`: owner, listed companion, or
    /// anyone if the trip is public.
    pub async fn find_accessible(
        pool: &PgPool,
        trip_id: Uuid,
        requester: Uuid,
    ) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trips
             WHERE id = $1 AND (owner = $2 OR $2 = ANY(companions) OR is_public)"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(trip_id)
            .bind(requester)
            .fetch_optional(pool)
            .await
    }

    /// Find a trip for a mutation path requiring ownership.
    pub async fn find_owned(
        pool: &PgPool,
        trip_id: Uuid,
        requester: Uuid,
    ) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trips WHERE id = $1 AND owner = $2");
        sqlx::query_as::<_, Trip>(&query)
            .bind(trip_id)
            .bind(requester)
            .fetch_optional(pool)
            .await
    }

    /// Find a trip where `requester` is the owner or a companion. Used by
    /// the expense mutation paths, which companions share.
    pub async fn find_member(
        pool: &PgPool,
        trip_id: Uuid,
        requester: Uuid,
    ) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trips
             WHERE id = $1 AND (owner = $2 OR $2 = ANY(companions))"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(trip_id)
            .bind(requester)
            .fetch_optional(pool)
            .await
    }

    /// List trips where `requester` is the owner or a companion, most
    /// recent start date first.
    pub async fn list_for_user(pool: &PgPool, requester: Uuid) -> Result<Vec<Trip>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trips
             WHERE owner = $1 OR $1 = ANY(companions)
             ORDER BY start_date DESC"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(requester)
            .fetch_all(pool)
            .await
    }

    /// Update a trip. Only non-`None` fields in `input` are applied, and
    /// only the owner may update.
    ///
    /// Returns `None` if no trip with the given id is owned by `requester`.
    pub async fn update(
        pool: &PgPool,
        trip_id: Uuid,
        requester: Uuid,
        input: &UpdateTrip,
    ) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!(
            "UPDATE trips SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                destination_name = COALESCE($7, destination_name),
                destination_country = COALESCE($8, destination_country),
                destination_lat = COALESCE($9, destination_lat),
                destination_lng = COALESCE($10, destination_lng),
                budget_total = COALESCE($11, budget_total),
                currency = COALESCE($12, currency),
                companions = COALESCE($13, companions),
                is_public = COALESCE($14, is_public),
                updated_at = NOW()
             WHERE id = $1 AND owner = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(trip_id)
            .bind(requester)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.destination_name)
            .bind(&input.destination_country)
            .bind(input.destination_lat)
            .bind(input.destination_lng)
            .bind(input.budget_total)
            .bind(&input.currency)
            .bind(&input.companions)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Delete a trip and everything nested in it. Owner only.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        trip_id: Uuid,
        requester: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1 AND owner = $2")
            .bind(trip_id)
            .bind(requester)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the full itinerary document. Owner only.
    ///
    /// Whole-document replacement: every save transmits the entire
    /// sequence, and a second save with identical content is a no-op in
    /// effect. Returns the stored sequence, or `None` if no trip with the
    /// given id is owned by `requester`.
    pub async fn replace_itinerary(
        pool: &PgPool,
        trip_id: Uuid,
        requester: Uuid,
        day_plans: &[DayPlan],
    ) -> Result<Option<Vec<DayPlan>>, sqlx::Error> {
        let stored: Option<Json<Vec<DayPlan>>> = sqlx::query_scalar(
            "UPDATE trips SET itinerary = $3, updated_at = NOW()
             WHERE id = $1 AND owner = $2
             RETURNING itinerary",
        )
        .bind(trip_id)
        .bind(requester)
        .bind(Json(day_plans))
        .fetch_optional(pool)
        .await?;
        Ok(stored.map(|json| json.0))
    }

    /// Overwrite the full expense document and the derived spent amount
    /// in one statement. Owner or companion.
    ///
    /// Returns the updated row, or `None` if `requester` is not a member
    /// of the trip (or the trip is gone).
    pub async fn replace_expenses(
        pool: &PgPool,
        trip_id: Uuid,
        requester: Uuid,
        expenses: &[Expense],
        spent: f64,
    ) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!(
            "UPDATE trips SET expenses = $3, budget_spent = $4, updated_at = NOW()
             WHERE id = $1 AND (owner = $2 OR $2 = ANY(companions))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(trip_id)
            .bind(requester)
            .bind(Json(expenses))
            .bind(spent)
            .fetch_optional(pool)
            .await
    }
}
