//! Handlers for the `/trips` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use wanderwise_core::error::CoreError;
use wanderwise_core::itinerary;
use wanderwise_db::models::trip::{CreateTrip, Trip, UpdateTrip};
use wanderwise_db::repositories::TripRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: Uuid) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Trip", id })
}

/// Validate trip creation input: non-blank title, end date not before
/// start date, non-negative budget total.
fn validate_create_input(input: &CreateTrip) -> AppResult<()> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Trip title must not be empty".to_string(),
        )));
    }
    if input.end_date < input.start_date {
        return Err(AppError::Core(CoreError::Validation(
            "Trip end date must not be before start date".to_string(),
        )));
    }
    if let Some(total) = input.budget_total {
        if !total.is_finite() || total < 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Budget total must be a non-negative amount".to_string(),
            )));
        }
    }
    Ok(())
}

/// Validate a trip patch against the trip's current state. The date-range
/// check uses the effective value of each field (patched or existing).
fn validate_update_input(trip: &Trip, input: &UpdateTrip) -> AppResult<()> {
    if let Some(ref title) = input.title {
        if title.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Trip title must not be empty".to_string(),
            )));
        }
    }
    let start = input.start_date.unwrap_or(trip.start_date);
    let end = input.end_date.unwrap_or(trip.end_date);
    if end < start {
        return Err(AppError::Core(CoreError::Validation(
            "Trip end date must not be before start date".to_string(),
        )));
    }
    if let Some(total) = input.budget_total {
        if !total.is_finite() || total < 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Budget total must be a non-negative amount".to_string(),
            )));
        }
    }
    Ok(())
}

/// POST /api/v1/trips
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTrip>,
) -> AppResult<(StatusCode, Json<Trip>)> {
    validate_create_input(&input)?;

    let trip = TripRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(trip_id = %trip.id, owner = %user.user_id, "Trip created");
    Ok((StatusCode::CREATED, Json(trip)))
}

/// GET /api/v1/trips
pub async fn list(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Trip>>> {
    let trips = TripRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(trips))
}

/// GET /api/v1/trips/{id}
///
/// Readable by the owner, a listed companion, or anyone if the trip is
/// public; access denial is indistinguishable from absence. An empty
/// stored itinerary is materialized from the trip's date range in the
/// response only -- nothing is written back.
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Trip>> {
    let mut trip = TripRepo::find_accessible(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let days = std::mem::take(&mut trip.itinerary.0);
    trip.itinerary.0 = itinerary::initialize(trip.start_date, trip.end_date, days);

    Ok(Json(trip))
}

/// PUT /api/v1/trips/{id}
///
/// Owner only; a companion (or public reader) gets 403 rather than 404
/// since they can see the trip exists. Changing the date range does NOT
/// reconcile the stored itinerary against the new range.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTrip>,
) -> AppResult<Json<Trip>> {
    let trip = TripRepo::find_accessible(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !trip.is_owned_by(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized to update this trip".to_string(),
        )));
    }

    validate_update_input(&trip, &input)?;

    let updated = TripRepo::update(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(updated))
}

/// DELETE /api/v1/trips/{id}
///
/// Owner only. The trip and all nested day plans, activities, and
/// expenses are destroyed together.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let trip = TripRepo::find_accessible(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !trip.is_owned_by(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized to delete this trip".to_string(),
        )));
    }

    let deleted = TripRepo::delete(&state.pool, id, user.user_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
