use budgetbox_domain::{AppState, BudgetBox, Period, BOX_PALETTE};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    period::{period_key, rollover_if_needed},
    validation::{validate_amount, validate_name},
    CoreError, IdGenerator,
};

/// Input for a new box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxDraft {
    pub name: String,
    pub period: Period,
    pub amount_per_period: f64,
}

impl BoxDraft {
    pub fn new(name: impl Into<String>, period: Period, amount_per_period: f64) -> Self {
        Self {
            name: name.into(),
            period,
            amount_per_period,
        }
    }
}

/// Partial update of a box; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxPatch {
    pub name: Option<String>,
    pub period: Option<Period>,
    pub amount_per_period: Option<f64>,
}

impl BoxPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.period.is_none() && self.amount_per_period.is_none()
    }
}

/// Box lifecycle operations over an in-memory [`AppState`].
pub struct BoxService;

impl BoxService {
    /// Appends a new box keyed to the current period and returns its id.
    ///
    /// Colour tags cycle through [`BOX_PALETTE`] in creation order.
    pub fn create(
        state: &mut AppState,
        draft: BoxDraft,
        now: DateTime<Utc>,
        ids: &dyn IdGenerator,
    ) -> Result<String, CoreError> {
        let name = validate_name(&draft.name)?;
        let amount = validate_amount(draft.amount_per_period, "amount per period")?;
        let mut id = ids.next_id();
        while state.find_box(&id).is_some() {
            id = ids.next_id();
        }
        let budget = BudgetBox::new(
            id.clone(),
            name,
            draft.period,
            amount,
            period_key(draft.period, now),
        )
        .with_color(BOX_PALETTE[state.boxes.len() % BOX_PALETTE.len()]);
        info!(box_id = %id, name = %budget.name, period = %budget.period, "box created");
        state.boxes.push(budget);
        Ok(id)
    }

    /// Applies `patch` after rolling the box over.
    ///
    /// A period change re-keys the box for the new cadence and discards the
    /// expenses of the partial period; the carried balance is kept.
    pub fn edit(
        state: &mut AppState,
        id: &str,
        patch: BoxPatch,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let amount = patch
            .amount_per_period
            .map(|amount| validate_amount(amount, "amount per period"))
            .transpose()?;

        let budget = Self::get_mut(state, id)?;
        rollover_if_needed(budget, now);
        if let Some(name) = name {
            budget.name = name;
        }
        if let Some(amount) = amount {
            budget.amount_per_period = amount;
        }
        if let Some(period) = patch.period {
            if period != budget.period {
                budget.period = period;
                budget.current_period = period_key(period, now);
                budget.expenses.clear();
            }
        }
        info!(box_id = %id, "box updated");
        Ok(())
    }

    /// Deletes a box, moving the active selection if it pointed at it.
    pub fn remove(state: &mut AppState, id: &str) -> Result<BudgetBox, CoreError> {
        let index = state
            .position(id)
            .ok_or_else(|| CoreError::BoxNotFound(id.to_string()))?;
        let removed = state.boxes.remove(index);
        state.repair_active();
        info!(box_id = %id, "box deleted");
        Ok(removed)
    }

    /// Marks a box as the one shown in the detail view.
    pub fn open(state: &mut AppState, id: &str, now: DateTime<Utc>) -> Result<(), CoreError> {
        let budget = Self::get_mut(state, id)?;
        rollover_if_needed(budget, now);
        state.active_box_id = Some(id.to_string());
        Ok(())
    }

    /// Rolls every box over; returns how many changed.
    pub fn rollover_all(state: &mut AppState, now: DateTime<Utc>) -> usize {
        state
            .boxes
            .iter_mut()
            .map(|budget| rollover_if_needed(budget, now))
            .filter(|rolled| *rolled)
            .count()
    }

    pub fn get<'a>(state: &'a AppState, id: &str) -> Result<&'a BudgetBox, CoreError> {
        state
            .find_box(id)
            .ok_or_else(|| CoreError::BoxNotFound(id.to_string()))
    }

    pub fn get_mut<'a>(state: &'a mut AppState, id: &str) -> Result<&'a mut BudgetBox, CoreError> {
        state
            .find_box_mut(id)
            .ok_or_else(|| CoreError::BoxNotFound(id.to_string()))
    }
}
