use serde::{Deserialize, Serialize};

use crate::{money::sum_amounts, period::Period};

/// A single debit logged against a box during its current period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub amount: f64,
}

impl Expense {
    pub fn new(amount: f64) -> Self {
        Self { amount }
    }
}

/// Tags handed out to new boxes, in order.
pub const BOX_PALETTE: [&str; 5] = ["#f39c12", "#27ae60", "#2980b9", "#8e44ad", "#e74c3c"];

/// True for a `#rrggbb` colour tag.
pub fn is_color_tag(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// A budget envelope replenished by a fixed allowance every period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBox {
    pub id: String,
    pub name: String,
    pub period: Period,
    pub amount_per_period: f64,
    pub last_balance: f64,
    /// Key of the period bucket the `expenses` belong to.
    pub current_period: String,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BudgetBox {
    /// Builds a fresh box that owes and is owed nothing.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        period: Period,
        amount_per_period: f64,
        current_period: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            period,
            amount_per_period,
            last_balance: 0.0,
            current_period: current_period.into(),
            expenses: Vec::new(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Total spent in the current period.
    pub fn spent(&self) -> f64 {
        sum_amounts(self.expenses.iter().map(|expense| expense.amount))
    }

    pub fn expense(&self, index: usize) -> Option<&Expense> {
        self.expenses.get(index)
    }

    pub fn expense_mut(&mut self, index: usize) -> Option<&mut Expense> {
        self.expenses.get_mut(index)
    }
}
