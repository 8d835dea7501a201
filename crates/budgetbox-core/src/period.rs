//! Period accounting: bucket keys, single-step rollover and live balance.

use budgetbox_domain::{round2, BudgetBox, Period};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::debug;

/// Hours added to UTC to obtain the accounting day (fixed UTC-3, no DST).
pub const ACCOUNTING_UTC_OFFSET_HOURS: i64 = -3;

/// Calendar date of `now` in the fixed accounting zone.
pub fn accounting_date(now: DateTime<Utc>) -> NaiveDate {
    (now + Duration::hours(ACCOUNTING_UTC_OFFSET_HOURS)).date_naive()
}

/// Monday that opens the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Canonical bucket identifier of `period` at instant `now`.
///
/// Daily keys look like `2024-03-15`, monthly keys like `2024-03` and weekly keys
/// like `W:2024-03-11` (the Monday of the week).
pub fn period_key(period: Period, now: DateTime<Utc>) -> String {
    let date = accounting_date(now);
    match period {
        Period::Daily => date.format("%Y-%m-%d").to_string(),
        Period::Weekly => format!("W:{}", week_start(date).format("%Y-%m-%d")),
        Period::Monthly => date.format("%Y-%m").to_string(),
    }
}

/// Live balance of a box. Only meaningful once the box has been rolled over for "now".
pub fn balance(budget: &BudgetBox) -> f64 {
    round2(budget.last_balance + budget.amount_per_period - budget.spent())
}

/// Folds the current period into `last_balance` when the box's key is stale.
///
/// Exactly one allowance is credited no matter how many boundaries were crossed
/// since the box was last touched. Returns whether the box changed.
pub fn rollover_if_needed(budget: &mut BudgetBox, now: DateTime<Utc>) -> bool {
    let key = period_key(budget.period, now);
    if key == budget.current_period {
        return false;
    }
    let carried = balance(budget);
    debug!(
        box_id = %budget.id,
        from = %budget.current_period,
        to = %key,
        carried,
        "rolling box over to new period"
    );
    budget.last_balance = carried;
    budget.expenses.clear();
    budget.current_period = key;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetbox_domain::Expense;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn daily_box(now: DateTime<Utc>) -> BudgetBox {
        BudgetBox::new("b1", "Food", Period::Daily, 100.0, period_key(Period::Daily, now))
    }

    #[test]
    fn keys_for_a_friday() {
        let now = at(2024, 3, 15, 12, 0);
        assert_eq!(period_key(Period::Daily, now), "2024-03-15");
        assert_eq!(period_key(Period::Monthly, now), "2024-03");
        assert_eq!(period_key(Period::Weekly, now), "W:2024-03-11");
    }

    #[test]
    fn daily_key_changes_at_three_utc() {
        assert_eq!(period_key(Period::Daily, at(2024, 3, 16, 2, 59)), "2024-03-15");
        assert_eq!(period_key(Period::Daily, at(2024, 3, 16, 3, 0)), "2024-03-16");
    }

    #[test]
    fn monthly_key_uses_shifted_calendar() {
        assert_eq!(period_key(Period::Monthly, at(2024, 4, 1, 1, 0)), "2024-03");
        assert_eq!(period_key(Period::Monthly, at(2024, 4, 1, 3, 0)), "2024-04");
        assert_eq!(period_key(Period::Monthly, at(2025, 1, 1, 2, 0)), "2024-12");
    }

    #[test]
    fn weekly_key_is_stable_through_sunday() {
        let monday = period_key(Period::Weekly, at(2024, 3, 11, 3, 0));
        let sunday_night = period_key(Period::Weekly, at(2024, 3, 18, 2, 59));
        let next_monday = period_key(Period::Weekly, at(2024, 3, 18, 3, 0));
        assert_eq!(monday, "W:2024-03-11");
        assert_eq!(sunday_night, "W:2024-03-11");
        assert_eq!(next_monday, "W:2024-03-18");
    }

    #[test]
    fn weekly_key_crosses_month_and_year() {
        assert_eq!(period_key(Period::Weekly, at(2025, 1, 1, 12, 0)), "W:2024-12-30");
    }

    #[test]
    fn balance_is_pure_projection() {
        let now = at(2024, 3, 15, 12, 0);
        let mut budget = daily_box(now);
        budget.last_balance = -20.0;
        budget.expenses = vec![Expense::new(30.0), Expense::new(0.1), Expense::new(0.2)];
        let before = budget.clone();
        assert_eq!(balance(&budget), 49.7);
        assert_eq!(budget, before);
    }

    #[test]
    fn rollover_is_noop_within_period() {
        let now = at(2024, 3, 15, 12, 0);
        let mut budget = daily_box(now);
        budget.expenses.push(Expense::new(30.0));
        assert!(!rollover_if_needed(&mut budget, now + Duration::hours(5)));
        assert_eq!(budget.expenses.len(), 1);
    }

    #[test]
    fn rollover_folds_once_and_is_idempotent() {
        let now = at(2024, 3, 15, 12, 0);
        let mut budget = daily_box(now);
        budget.expenses.push(Expense::new(30.0));

        let tomorrow = now + Duration::days(1);
        assert!(rollover_if_needed(&mut budget, tomorrow));
        assert_eq!(budget.last_balance, 70.0);
        assert!(budget.expenses.is_empty());
        assert_eq!(budget.current_period, "2024-03-16");
        assert_eq!(balance(&budget), 170.0);

        let snapshot = budget.clone();
        assert!(!rollover_if_needed(&mut budget, tomorrow));
        assert_eq!(budget, snapshot);
    }

    #[test]
    fn rollover_is_single_step_after_long_absence() {
        let now = at(2024, 1, 10, 12, 0);
        let mut budget =
            BudgetBox::new("b1", "Rent", Period::Monthly, 500.0, period_key(Period::Monthly, now));
        budget.last_balance = 12.5;
        budget.expenses.push(Expense::new(200.0));

        assert!(rollover_if_needed(&mut budget, at(2024, 4, 20, 12, 0)));
        assert_eq!(budget.last_balance, 312.5);
        assert_eq!(budget.current_period, "2024-04");
        assert!(budget.expenses.is_empty());
    }

    #[test]
    fn overspend_carries_negative_balance() {
        let now = at(2024, 3, 15, 12, 0);
        let mut budget = daily_box(now);
        budget.expenses.push(Expense::new(130.25));
        rollover_if_needed(&mut budget, now + Duration::days(1));
        assert_eq!(budget.last_balance, -30.25);
        assert_eq!(balance(&budget), 69.75);
    }
}
