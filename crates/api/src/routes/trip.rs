//! Route definitions for the `/trips` resource.
//!
//! Also nests the itinerary and expense routes under `/trips/{id}/...`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{expense, itinerary, trip};
use crate::state::AppState;

/// Routes mounted at `/trips`.
///
/// ```text
/// GET    /                             -> list
/// POST   /                             -> create
/// GET    /{id}                         -> get_by_id
/// PUT    /{id}                         -> update
/// DELETE /{id}                         -> delete
///
/// PUT    /{id}/itinerary               -> replace
///
/// GET    /{id}/expenses                -> list
/// POST   /{id}/expenses                -> create
/// PUT    /{id}/expenses/{expense_id}   -> update
/// DELETE /{id}/expenses/{expense_id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    let expense_routes = Router::new()
        .route("/", get(expense::list).post(expense::create))
        .route(
            "/{expense_id}",
            put(expense::update).delete(expense::delete),
        );

    Router::new()
        .route("/", get(trip::list).post(trip::create))
        .route(
            "/{id}",
            get(trip::get_by_id).put(trip::update).delete(trip::delete),
        )
        .route("/{id}/itinerary", put(itinerary::replace))
        .nest("/{id}/expenses", expense_routes)
}
