//! Handler for whole-itinerary replacement.
//!
//! The editing surface mutates its day-plan sequence locally and submits
//! the complete ordered sequence on save. There are no incremental or
//! partial updates: every save transmits the entire itinerary, and the
//! later of two concurrent saves silently wins.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;
use wanderwise_core::error::CoreError;
use wanderwise_core::itinerary::DayPlan;
use wanderwise_db::repositories::TripRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response payload for an itinerary save: the canonical stored sequence.
#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub itinerary: Vec<DayPlan>,
}

/// PUT /api/v1/trips/{id}/itinerary
///
/// Requires ownership; a non-owner gets 404, indistinguishable from a
/// missing trip. The body must be `{"itinerary": [...]}` -- a missing or
/// non-sequence payload is a 400. Returns the stored sequence unchanged,
/// so saving identical content twice is idempotent.
pub async fn replace(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> AppResult<Json<ItineraryResponse>> {
    if TripRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound { entity: "Trip", id }));
    }

    let payload = body
        .get("itinerary")
        .filter(|v| v.is_array())
        .ok_or_else(|| AppError::BadRequest("Valid itinerary data is required".to_string()))?;

    let day_plans: Vec<DayPlan> = serde_json::from_value(payload.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid itinerary payload: {e}")))?;

    let stored = TripRepo::replace_itinerary(&state.pool, id, user.user_id, &day_plans)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Trip", id }))?;

    tracing::info!(trip_id = %id, days = stored.len(), "Itinerary replaced");
    Ok(Json(ItineraryResponse { itinerary: stored }))
}
