pub mod health;
pub mod trip;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /trips                                  list, create
/// /trips/{id}                             get, update, delete
/// /trips/{id}/itinerary                   replace (PUT)
/// /trips/{id}/expenses                    list, create
/// /trips/{id}/expenses/{expense_id}       update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/trips", trip::router())
}
