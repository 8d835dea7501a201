//! Normalisation of untrusted application state.
//!
//! Persisted data can be edited by hand, so everything read from or written to the
//! medium passes through [`sanitize`] (typed input) or [`sanitize_value`] (raw JSON).
//! Both are total: malformed pieces are coerced, dropped or regenerated, never rejected.

use std::collections::HashSet;

use budgetbox_domain::{is_color_tag, round2, AppState, BudgetBox, Expense, Period};
use serde_json::{Map, Value};
use tracing::debug;

use crate::IdGenerator;

/// Restores every invariant of a typed state. Idempotent.
pub fn sanitize(state: AppState, ids: &dyn IdGenerator) -> AppState {
    let mut seen = HashSet::new();
    let boxes = state
        .boxes
        .into_iter()
        .map(|budget| sanitize_box(budget, ids, &mut seen))
        .collect();
    let mut sanitized = AppState {
        active_box_id: state.active_box_id,
        boxes,
    };
    sanitized.repair_active();
    sanitized
}

/// Builds a sanitized state from a parsed JSON document.
///
/// Returns `None` when the document is not an object and so cannot hold a state at all.
pub fn sanitize_value(value: &Value, ids: &dyn IdGenerator) -> Option<AppState> {
    let fields = value.as_object()?;
    let boxes = fields
        .get("boxes")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(raw_box).collect())
        .unwrap_or_default();
    let state = AppState {
        active_box_id: fields.get("activeBoxId").and_then(coerce_id),
        boxes,
    };
    Some(sanitize(state, ids))
}

fn sanitize_box(mut budget: BudgetBox, ids: &dyn IdGenerator, seen: &mut HashSet<String>) -> BudgetBox {
    if budget.id.trim().is_empty() || seen.contains(&budget.id) {
        let mut fresh = ids.next_id();
        while seen.contains(&fresh) {
            fresh = ids.next_id();
        }
        debug!(previous = %budget.id, regenerated = %fresh, "regenerating box id");
        budget.id = fresh;
    }
    seen.insert(budget.id.clone());

    budget.amount_per_period = round2(budget.amount_per_period).max(0.0);
    budget.last_balance = round2(budget.last_balance);
    budget.expenses = budget
        .expenses
        .into_iter()
        .filter(|expense| expense.amount.is_finite() && expense.amount >= 0.0)
        .map(|expense| Expense::new(round2(expense.amount)))
        .collect();
    budget.color = budget
        .color
        .filter(|tag| is_color_tag(tag))
        .map(|tag| tag.to_ascii_lowercase());
    budget
}

fn raw_box(value: &Value) -> Option<BudgetBox> {
    let fields = value.as_object()?;
    Some(BudgetBox {
        id: fields.get("id").and_then(coerce_id).unwrap_or_default(),
        name: fields.get("name").map(coerce_text).unwrap_or_default(),
        period: fields
            .get("period")
            .and_then(Value::as_str)
            .map(Period::from_str_or_default)
            .unwrap_or_default(),
        amount_per_period: number_field(fields, "amountPerPeriod"),
        last_balance: number_field(fields, "lastBalance"),
        current_period: fields
            .get("currentPeriod")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        expenses: fields
            .get("expenses")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(raw_expense).collect())
            .unwrap_or_default(),
        color: fields.get("color").and_then(Value::as_str).map(str::to_string),
    })
}

fn raw_expense(value: &Value) -> Option<Expense> {
    let amount = match value {
        Value::Object(fields) => fields.get("amount").and_then(coerce_number)?,
        other => coerce_number(other)?,
    };
    (amount >= 0.0).then(|| Expense::new(amount))
}

fn number_field(fields: &Map<String, Value>, key: &str) -> f64 {
    fields.get(key).and_then(coerce_number).unwrap_or(0.0)
}

/// Finite number from a JSON number or a numeric string.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}
