//! Read-only projections for dashboards and detail views.

use budgetbox_domain::{sum_amounts, AppState, BudgetBox, Expense, Period};

use crate::period::balance;

/// One dashboard row.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub id: String,
    pub name: String,
    pub period: Period,
    pub balance: f64,
    pub is_active: bool,
    pub color: Option<String>,
}

/// All boxes with their live balances plus the grand total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub boxes: Vec<BoxSummary>,
    pub total: f64,
    pub active_box_id: Option<String>,
}

/// Everything the detail view of a single box shows.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxDetail {
    pub id: String,
    pub name: String,
    pub period: Period,
    pub amount_per_period: f64,
    pub last_balance: f64,
    pub current_period: String,
    pub spent: f64,
    pub balance: f64,
    pub expenses: Vec<Expense>,
}

pub struct SummaryService;

impl SummaryService {
    /// Projects the dashboard. Callers roll boxes over beforehand.
    pub fn dashboard(state: &AppState) -> Dashboard {
        let boxes: Vec<BoxSummary> = state
            .boxes
            .iter()
            .map(|budget| BoxSummary {
                id: budget.id.clone(),
                name: budget.name.clone(),
                period: budget.period,
                balance: balance(budget),
                is_active: state.active_box_id.as_deref() == Some(budget.id.as_str()),
                color: budget.color.clone(),
            })
            .collect();
        let total = sum_amounts(boxes.iter().map(|row| row.balance));
        Dashboard {
            boxes,
            total,
            active_box_id: state.active_box_id.clone(),
        }
    }

    pub fn detail(budget: &BudgetBox) -> BoxDetail {
        BoxDetail {
            id: budget.id.clone(),
            name: budget.name.clone(),
            period: budget.period,
            amount_per_period: budget.amount_per_period,
            last_balance: budget.last_balance,
            current_period: budget.current_period.clone(),
            spent: budget.spent(),
            balance: balance(budget),
            expenses: budget.expenses.clone(),
        }
    }
}
