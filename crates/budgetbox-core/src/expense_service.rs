use budgetbox_domain::{AppState, Expense};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    box_service::BoxService, period::rollover_if_needed, validation::validate_amount, CoreError,
};

/// Expense operations scoped to a box's current period.
pub struct ExpenseService;

impl ExpenseService {
    /// Logs a new expense and returns its index in the current period.
    pub fn add(
        state: &mut AppState,
        box_id: &str,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Result<usize, CoreError> {
        let amount = validate_amount(amount, "expense amount")?;
        let budget = BoxService::get_mut(state, box_id)?;
        rollover_if_needed(budget, now);
        budget.expenses.push(Expense::new(amount));
        debug!(box_id, amount, "expense added");
        Ok(budget.expenses.len() - 1)
    }

    /// Replaces the amount of the expense at `index`.
    ///
    /// The box is rolled over first, so an index from a period that already
    /// ended no longer resolves.
    pub fn edit(
        state: &mut AppState,
        box_id: &str,
        index: usize,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let amount = validate_amount(amount, "expense amount")?;
        let budget = BoxService::get_mut(state, box_id)?;
        rollover_if_needed(budget, now);
        let expense = budget
            .expense_mut(index)
            .ok_or_else(|| CoreError::ExpenseNotFound {
                box_id: box_id.to_string(),
                index,
            })?;
        expense.amount = amount;
        debug!(box_id, index, amount, "expense edited");
        Ok(())
    }

    pub fn remove(
        state: &mut AppState,
        box_id: &str,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<Expense, CoreError> {
        let budget = BoxService::get_mut(state, box_id)?;
        rollover_if_needed(budget, now);
        if index >= budget.expenses.len() {
            return Err(CoreError::ExpenseNotFound {
                box_id: box_id.to_string(),
                index,
            });
        }
        let removed = budget.expenses.remove(index);
        debug!(box_id, index, "expense deleted");
        Ok(removed)
    }
}
