//! Turns user-typed text into the values the core expects.

use std::fmt;

use budgetbox_domain::Period;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAmountError(pub String);

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid amount", self.0)
    }
}

impl std::error::Error for ParseAmountError {}

/// Parses amounts typed with either a comma or a dot as the decimal separator.
///
/// When both appear, the right-most one is the decimal separator and the other
/// is treated as digit grouping, so `1.234,56` and `1,234.56` both read 1234.56.
/// A leading currency symbol such as `R$` is ignored.
pub fn parse_amount(input: &str) -> Result<f64, ParseAmountError> {
    let error = || ParseAmountError(input.trim().to_string());

    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let digits: String = unsigned
        .trim_start_matches(|ch: char| ch.is_alphabetic() || ch == '$')
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '_')
        .collect();
    if digits.is_empty() {
        return Err(error());
    }

    let decimal = match (digits.rfind(','), digits.rfind('.')) {
        (Some(comma), Some(dot)) => Some(if comma > dot { ',' } else { '.' }),
        (Some(_), None) => Some(','),
        (None, Some(_)) => Some('.'),
        (None, None) => None,
    };
    let normalized: String = match decimal {
        Some(separator) => {
            let grouping = if separator == ',' { '.' } else { ',' };
            let without_grouping: String = digits.chars().filter(|ch| *ch != grouping).collect();
            if without_grouping.matches(separator).count() > 1 {
                return Err(error());
            }
            without_grouping.replace(separator, ".")
        }
        None => digits,
    };

    if !normalized.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
        return Err(error());
    }
    let value: f64 = normalized.parse().map_err(|_| error())?;
    if !value.is_finite() {
        return Err(error());
    }
    Ok(if negative { -value } else { value })
}

pub fn parse_period(input: &str) -> Result<Period, String> {
    input.parse::<Period>().map_err(|err| err.to_string())
}

/// 1-based list position typed by the user, returned as a 0-based index.
pub fn parse_position(input: &str) -> Option<usize> {
    input
        .trim()
        .trim_start_matches('#')
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_comma_and_dot_decimals() {
        assert_eq!(parse_amount("12,50"), Ok(12.5));
        assert_eq!(parse_amount("12.50"), Ok(12.5));
        assert_eq!(parse_amount(" 30 "), Ok(30.0));
    }

    #[test]
    fn strips_grouping_and_currency() {
        assert_eq!(parse_amount("1.234,56"), Ok(1234.56));
        assert_eq!(parse_amount("1,234.56"), Ok(1234.56));
        assert_eq!(parse_amount("R$ 7,25"), Ok(7.25));
        assert_eq!(parse_amount("-3,5"), Ok(-3.5));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("1,2,3").is_err());
        assert!(parse_amount("12x").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_position("1"), Some(0));
        assert_eq!(parse_position("#3"), Some(2));
        assert_eq!(parse_position("0"), None);
        assert_eq!(parse_position("food"), None);
    }

    #[test]
    fn periods_parse_case_insensitively() {
        assert_eq!(parse_period("Weekly"), Ok(Period::Weekly));
        assert!(parse_period("hourly").is_err());
    }
}
