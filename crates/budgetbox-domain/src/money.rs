//! Two-decimal money helpers shared by every layer that stores an amount.

/// Rounds a monetary value to two decimal places.
///
/// Non-finite input collapses to `0.0` and negative zero is normalised to `0.0`
/// so stored values compare and serialize consistently. Magnitudes too large to
/// scale by 100 carry no cents and are returned unchanged.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Sums a sequence of amounts and rounds the result.
pub fn sum_amounts<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    round2(amounts.into_iter().sum())
}
