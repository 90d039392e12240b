//! Handlers for the `/trips/{id}/expenses` resource.
//!
//! Expenses live inside their parent trip document; every mutation reads
//! the trip, mutates the expense list in memory via the budget ledger,
//! recomputes the derived spent amount from scratch, and writes both back
//! in one statement. The spent column is never patched incrementally.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wanderwise_core::budget::{self, BudgetSummary, Expense, ExpenseCategory, ExpensePatch};
use wanderwise_core::error::CoreError;
use wanderwise_db::models::trip::Trip;
use wanderwise_db::repositories::TripRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// DTO for recording a new expense. Unknown fields are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateExpense {
    pub title: String,
    pub amount: f64,
    /// Defaults to the trip's budget currency if omitted.
    pub currency: Option<String>,
    pub category: ExpenseCategory,
    /// Defaults to now if omitted.
    pub date: Option<DateTime<Utc>>,
    pub split_with: Option<Vec<Uuid>>,
    pub notes: Option<String>,
}

/// Response payload for expense mutations: the affected expense plus the
/// recomputed budget figures.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub expense: Expense,
    pub budget: BudgetSummary,
}

/// Response payload for an expense deletion.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub budget: BudgetSummary,
}

/// Response payload for the expense listing.
#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
}

fn not_found(id: Uuid) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Trip", id })
}

/// Load a trip for an expense operation. Expense paths are shared between
/// the owner and listed companions; everyone else sees 404.
async fn ensure_member(pool: &sqlx::PgPool, trip_id: Uuid, requester: Uuid) -> AppResult<Trip> {
    TripRepo::find_member(pool, trip_id, requester)
        .await?
        .ok_or_else(|| not_found(trip_id))
}

/// GET /api/v1/trips/{id}/expenses
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ExpenseListResponse>> {
    let trip = ensure_member(&state.pool, id, user.user_id).await?;
    Ok(Json(ExpenseListResponse {
        expenses: trip.expenses.0,
    }))
}

/// POST /api/v1/trips/{id}/expenses
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<ExpenseResponse>)> {
    let trip = ensure_member(&state.pool, id, user.user_id).await?;

    let expense = Expense {
        id: Uuid::new_v4(),
        title: input.title,
        amount: input.amount,
        currency: input.currency.unwrap_or_else(|| trip.currency.clone()),
        category: input.category,
        date: input.date.unwrap_or_else(Utc::now),
        split_with: input.split_with.unwrap_or_default(),
        notes: input.notes,
    };

    let mut expenses = trip.expenses.0;
    budget::add_expense(&mut expenses, expense.clone())?;
    let summary = budget::recompute(&expenses, trip.budget_total);

    TripRepo::replace_expenses(&state.pool, id, user.user_id, &expenses, summary.spent)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(trip_id = %id, expense_id = %expense.id, amount = expense.amount, "Expense recorded");
    Ok((
        StatusCode::CREATED,
        Json(ExpenseResponse {
            expense,
            budget: summary,
        }),
    ))
}

/// PUT /api/v1/trips/{id}/expenses/{expense_id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path((id, expense_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<ExpensePatch>,
) -> AppResult<Json<ExpenseResponse>> {
    let trip = ensure_member(&state.pool, id, user.user_id).await?;

    let mut expenses = trip.expenses.0;
    let updated = budget::edit_expense(&mut expenses, expense_id, &patch)?;
    let summary = budget::recompute(&expenses, trip.budget_total);

    TripRepo::replace_expenses(&state.pool, id, user.user_id, &expenses, summary.spent)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(ExpenseResponse {
        expense: updated,
        budget: summary,
    }))
}

/// DELETE /api/v1/trips/{id}/expenses/{expense_id}
///
/// Removal recomputes the budget over the remaining list rather than
/// subtracting the removed amount.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path((id, expense_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<BudgetResponse>> {
    let trip = ensure_member(&state.pool, id, user.user_id).await?;

    let mut expenses = trip.expenses.0;
    let removed = budget::remove_expense(&mut expenses, expense_id)?;
    let summary = budget::recompute(&expenses, trip.budget_total);

    TripRepo::replace_expenses(&state.pool, id, user.user_id, &expenses, summary.spent)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(trip_id = %id, expense_id = %removed.id, "Expense deleted");
    Ok(Json(BudgetResponse { budget: summary }))
}
