//! Budget ledger.
//!
//! The spent/remaining/percent-used figures are a pure function of the
//! trip's expense list and must be recomputed after every expense
//! mutation. They are never patched incrementally: an edit that changes
//! `amount` would make incremental bookkeeping drift, and a full
//! [`recompute`] also corrects any drift already present in stored data.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Fixed category set for expenses.
///
/// Distinct from the activity categories in [`crate::itinerary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Accommodation,
    Food,
    Transportation,
    Activities,
    Shopping,
    Entertainment,
    Other,
}

impl ExpenseCategory {
    /// Category name as serialized on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::Accommodation => "Accommodation",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Activities => "Activities",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Other => "Other",
        }
    }
}

/// A single monetary outlay recorded against a trip's budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub currency: String,
    pub category: ExpenseCategory,
    pub date: DateTime<Utc>,
    /// Companions this expense is split with.
    #[serde(default)]
    pub split_with: Vec<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Field-enumerated patch for an existing expense.
///
/// Unknown fields are rejected: callers may change exactly these fields
/// and nothing else.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpensePatch {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub date: Option<DateTime<Utc>>,
    pub split_with: Option<Vec<Uuid>>,
    pub notes: Option<String>,
}

/// Derived budget figures for a trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub spent: f64,
    pub remaining: f64,
    pub percent_used: f64,
}

/// Recompute the derived budget figures from scratch.
///
/// - `spent` is the sum of all expense amounts.
/// - `remaining` clamps at zero when the budget is exceeded.
/// - `percent_used` is zero for a zero total, regardless of spending.
pub fn recompute(expenses: &[Expense], budget_total: f64) -> BudgetSummary {
    let spent: f64 = expenses.iter().map(|e| e.amount).sum();
    let remaining = (budget_total - spent).max(0.0);
    let percent_used = if budget_total > 0.0 {
        spent / budget_total * 100.0
    } else {
        0.0
    };
    BudgetSummary {
        spent,
        remaining,
        percent_used,
    }
}

/// Validate an expense title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Expense title must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate an expense amount. Amounts must be strictly positive.
pub fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Expense amount must be greater than zero (got {amount})"
        )));
    }
    Ok(())
}

/// Validate and append a new expense to the list.
///
/// Fails without mutating the list if the title is blank or the amount is
/// not strictly positive.
pub fn add_expense(expenses: &mut Vec<Expense>, expense: Expense) -> Result<(), CoreError> {
    validate_title(&expense.title)?;
    validate_amount(expense.amount)?;
    expenses.push(expense);
    Ok(())
}

/// Apply a field-enumerated patch to the expense with the given identity.
///
/// The patch is validated before anything is applied, so a rejected patch
/// leaves the list untouched. Returns a copy of the updated expense.
pub fn edit_expense(
    expenses: &mut [Expense],
    expense_id: Uuid,
    patch: &ExpensePatch,
) -> Result<Expense, CoreError> {
    if let Some(ref title) = patch.title {
        validate_title(title)?;
    }
    if let Some(amount) = patch.amount {
        validate_amount(amount)?;
    }

    let expense = expenses
        .iter_mut()
        .find(|e| e.id == expense_id)
        .ok_or(CoreError::NotFound {
            entity: "Expense",
            id: expense_id,
        })?;

    if let Some(ref title) = patch.title {
        expense.title = title.clone();
    }
    if let Some(amount) = patch.amount {
        expense.amount = amount;
    }
    if let Some(ref currency) = patch.currency {
        expense.currency = currency.clone();
    }
    if let Some(category) = patch.category {
        expense.category = category;
    }
    if let Some(date) = patch.date {
        expense.date = date;
    }
    if let Some(ref split_with) = patch.split_with {
        expense.split_with = split_with.clone();
    }
    if let Some(ref notes) = patch.notes {
        expense.notes = Some(notes.clone());
    }

    Ok(expense.clone())
}

/// Remove the expense with the given identity, returning it.
///
/// Fails with `NotFound` and leaves the list unchanged if no expense has
/// that identity.
pub fn remove_expense(expenses: &mut Vec<Expense>, expense_id: Uuid) -> Result<Expense, CoreError> {
    let position = expenses
        .iter()
        .position(|e| e.id == expense_id)
        .ok_or(CoreError::NotFound {
            entity: "Expense",
            id: expense_id,
        })?;
    Ok(expenses.remove(position))
}

/// Group expense totals by lower-cased category name.
///
/// Display aggregation only; iteration order is unspecified.
pub fn group_by_category(expenses: &[Expense]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for expense in expenses {
        *totals
            .entry(expense.category.name().to_lowercase())
            .or_insert(0.0) += expense.amount;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn expense(title: &str, amount: f64, category: ExpenseCategory) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            title: title.to_string(),
            amount,
            currency: "USD".to_string(),
            category,
            date: Utc::now(),
            split_with: Vec::new(),
            notes: None,
        }
    }

    // -----------------------------------------------------------------------
    // recompute
    // -----------------------------------------------------------------------

    #[test]
    fn recompute_empty_list() {
        let summary = recompute(&[], 500.0);
        assert_eq!(summary.spent, 0.0);
        assert_eq!(summary.remaining, 500.0);
        assert_eq!(summary.percent_used, 0.0);
    }

    #[test]
    fn recompute_hotel_and_dinner_scenario() {
        let expenses = vec![
            expense("Hotel", 300.0, ExpenseCategory::Accommodation),
            expense("Dinner", 45.50, ExpenseCategory::Food),
        ];
        let summary = recompute(&expenses, 1000.0);
        assert!((summary.spent - 345.50).abs() < EPSILON);
        assert!((summary.remaining - 654.50).abs() < EPSILON);
        assert!((summary.percent_used - 34.55).abs() < 1e-6);
    }

    #[test]
    fn remaining_clamps_to_zero_when_over_budget() {
        let expenses = vec![expense("Suite", 900.0, ExpenseCategory::Accommodation)];
        let summary = recompute(&expenses, 500.0);
        assert_eq!(summary.remaining, 0.0);
        assert!((summary.percent_used - 180.0).abs() < EPSILON);
    }

    #[test]
    fn percent_used_is_zero_for_zero_total() {
        let expenses = vec![expense("Taxi", 20.0, ExpenseCategory::Transportation)];
        let summary = recompute(&expenses, 0.0);
        assert_eq!(summary.percent_used, 0.0);
        assert_eq!(summary.spent, 20.0);
        assert_eq!(summary.remaining, 0.0);
    }

    #[test]
    fn spent_matches_sum_after_mutation_sequence() {
        let mut expenses = Vec::new();
        add_expense(
            &mut expenses,
            expense("Hotel", 120.0, ExpenseCategory::Accommodation),
        )
        .unwrap();
        add_expense(
            &mut expenses,
            expense("Lunch", 18.25, ExpenseCategory::Food),
        )
        .unwrap();
        add_expense(
            &mut expenses,
            expense("Metro", 2.90, ExpenseCategory::Transportation),
        )
        .unwrap();

        let lunch_id = expenses[1].id;
        edit_expense(
            &mut expenses,
            lunch_id,
            &ExpensePatch {
                amount: Some(22.75),
                ..Default::default()
            },
        )
        .unwrap();

        let metro_id = expenses[2].id;
        remove_expense(&mut expenses, metro_id).unwrap();

        let expected: f64 = expenses.iter().map(|e| e.amount).sum();
        let summary = recompute(&expenses, 1000.0);
        assert!((summary.spent - expected).abs() < EPSILON);
        assert!((summary.spent - 142.75).abs() < EPSILON);
    }

    // -----------------------------------------------------------------------
    // add_expense
    // -----------------------------------------------------------------------

    #[test]
    fn add_expense_rejects_non_positive_amount() {
        let mut expenses = Vec::new();
        for amount in [0.0, -5.0, f64::NAN] {
            let result = add_expense(
                &mut expenses,
                expense("Bad", amount, ExpenseCategory::Other),
            );
            assert!(matches!(result, Err(CoreError::Validation(_))));
        }
        assert!(expenses.is_empty());
    }

    #[test]
    fn add_expense_rejects_blank_title() {
        let mut expenses = Vec::new();
        let result = add_expense(&mut expenses, expense("  ", 10.0, ExpenseCategory::Food));
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert!(expenses.is_empty());
    }

    // -----------------------------------------------------------------------
    // edit_expense
    // -----------------------------------------------------------------------

    #[test]
    fn edit_expense_applies_only_present_fields() {
        let mut expenses = vec![expense("Hotel", 300.0, ExpenseCategory::Accommodation)];
        let id = expenses[0].id;
        let updated = edit_expense(
            &mut expenses,
            id,
            &ExpensePatch {
                title: Some("Hotel (2 nights)".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.title, "Hotel (2 nights)");
        assert_eq!(updated.amount, 300.0);
        assert_eq!(updated.category, ExpenseCategory::Accommodation);
    }

    #[test]
    fn edit_expense_unknown_id_is_not_found() {
        let mut expenses = vec![expense("Hotel", 300.0, ExpenseCategory::Accommodation)];
        let result = edit_expense(&mut expenses, Uuid::new_v4(), &ExpensePatch::default());
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn edit_expense_invalid_patch_leaves_expense_untouched() {
        let mut expenses = vec![expense("Hotel", 300.0, ExpenseCategory::Accommodation)];
        let id = expenses[0].id;
        let result = edit_expense(
            &mut expenses,
            id,
            &ExpensePatch {
                title: Some("Renamed".to_string()),
                amount: Some(-1.0),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(expenses[0].title, "Hotel");
        assert_eq!(expenses[0].amount, 300.0);
    }

    #[test]
    fn expense_patch_rejects_unknown_fields() {
        let result: Result<ExpensePatch, _> =
            serde_json::from_str(r#"{"amount": 5.0, "owner": "someone-else"}"#);
        assert!(result.is_err());
    }

    // -----------------------------------------------------------------------
    // remove_expense
    // -----------------------------------------------------------------------

    #[test]
    fn remove_expense_returns_removed_and_shrinks_list() {
        let mut expenses = vec![
            expense("Hotel", 300.0, ExpenseCategory::Accommodation),
            expense("Dinner", 45.5, ExpenseCategory::Food),
        ];
        let id = expenses[0].id;
        let removed = remove_expense(&mut expenses, id).unwrap();
        assert_eq!(removed.title, "Hotel");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].title, "Dinner");
    }

    #[test]
    fn remove_expense_unknown_id_leaves_list_and_budget_unchanged() {
        let mut expenses = vec![expense("Hotel", 300.0, ExpenseCategory::Accommodation)];
        let before = recompute(&expenses, 1000.0);
        let result = remove_expense(&mut expenses, Uuid::new_v4());
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
        assert_eq!(expenses.len(), 1);
        assert_eq!(recompute(&expenses, 1000.0), before);
    }

    // -----------------------------------------------------------------------
    // group_by_category
    // -----------------------------------------------------------------------

    #[test]
    fn group_by_category_sums_per_lowercased_name() {
        let expenses = vec![
            expense("Hotel", 300.0, ExpenseCategory::Accommodation),
            expense("Hostel", 50.0, ExpenseCategory::Accommodation),
            expense("Dinner", 45.5, ExpenseCategory::Food),
        ];
        let groups = group_by_category(&expenses);
        assert_eq!(groups.len(), 2);
        assert!((groups["accommodation"] - 350.0).abs() < EPSILON);
        assert!((groups["food"] - 45.5).abs() < EPSILON);
    }

    #[test]
    fn category_serializes_capitalized() {
        let json = serde_json::to_string(&ExpenseCategory::Transportation).unwrap();
        assert_eq!(json, r#""Transportation""#);
    }
}
