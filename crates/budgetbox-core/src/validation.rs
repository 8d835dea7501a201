//! Input checks applied before any state is touched.

use budgetbox_domain::round2;

use crate::CoreError;

/// Trims and checks a box name.
pub fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Checks that `amount` is a positive finite value once rounded to cents.
pub fn validate_amount(amount: f64, label: &str) -> Result<f64, CoreError> {
    if !amount.is_finite() {
        return Err(CoreError::Validation(format!("{label} must be a number")));
    }
    let rounded = round2(amount);
    if rounded <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{label} must be greater than 0"
        )));
    }
    Ok(rounded)
}
