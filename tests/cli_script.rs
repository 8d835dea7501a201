mod common;

use common::{data_file, script, temp_home, FRIDAY_NOON};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

#[test]
fn script_mode_runs_daily_box_flow() {
    let home = temp_home();

    script(
        &home,
        FRIDAY_NOON,
        "new Food 100 daily\nopen food\nspend 30\nboxes\nexit\n",
    )
    .assert()
    .success()
    .stdout(contains("Box `Food` created with R$ 100,00 per daily period."))
    .stdout(contains("Spent R$ 30,00 from `Food`. Balance: R$ 70,00"))
    .stdout(contains("Total: R$ 70,00"));

    assert!(data_file(&home).exists());
}

#[test]
fn next_day_carries_the_balance_over() {
    let home = temp_home();
    script(&home, FRIDAY_NOON, "new Food 100 daily\nopen 1\nspend 30\n")
        .assert()
        .success();

    script(&home, "2024-03-16T15:00:00Z", "show\n")
        .assert()
        .success()
        .stdout(contains("Carried over: R$ 70,00"))
        .stdout(contains("Balance     : R$ 170,00"))
        .stdout(contains("No expenses this period."));
}

#[test]
fn long_absence_credits_a_single_allowance() {
    let home = temp_home();
    script(&home, FRIDAY_NOON, "new Rent 50 weekly\nopen Rent\nspend 20\n")
        .assert()
        .success();

    script(&home, "2024-06-01T15:00:00Z", "boxes\n")
        .assert()
        .success()
        .stdout(contains("R$ 80,00"));
}

#[test]
fn invalid_input_reports_and_continues() {
    let home = temp_home();
    script(
        &home,
        FRIDAY_NOON,
        "new Food abc daily\nnew Food 10 hourly\nspend 5\nboxs\nnew Food 10 daily\nboxes\n",
    )
    .assert()
    .success()
    .stdout(contains("`abc` is not a valid amount"))
    .stdout(contains("unknown period `hourly`"))
    .stdout(contains("No box is open"))
    .stdout(contains("Suggestion: `boxes`?"))
    .stdout(contains("Food"));
}

#[test]
fn overdrawn_boxes_show_negative_balances() {
    let home = temp_home();
    script(
        &home,
        FRIDAY_NOON,
        "new Snacks 10 daily\nspend 12,5 Snacks\nboxes\n",
    )
    .assert()
    .success()
    .stdout(contains("-R$ 2,50"));
}

#[test]
fn reset_requires_confirmation_flag_in_scripts() {
    let home = temp_home();
    script(&home, FRIDAY_NOON, "new Food 10 daily\nreset\nboxes\n")
        .assert()
        .success()
        .stdout(contains("`reset` needs --yes in script mode"))
        .stdout(contains("No boxes yet").not());

    script(&home, FRIDAY_NOON, "reset --yes\nboxes\n")
        .assert()
        .success()
        .stdout(contains("All boxes and expenses erased."))
        .stdout(contains("No boxes yet"));
    let raw = std::fs::read_to_string(data_file(&home)).expect("rewritten on the next read");
    assert!(raw.contains(r#"\"boxes\":[]"#));
}

#[test]
fn bad_clock_override_fails_fast() {
    let home = temp_home();
    script(&home, "yesterday", "boxes\n")
        .assert()
        .failure()
        .stderr(contains("BUDGETBOX_NOW"));
}

#[test]
fn help_lists_commands() {
    let home = temp_home();
    script(&home, FRIDAY_NOON, "help\nhelp spend\nversion\n")
        .assert()
        .success()
        .stdout(contains("expense-delete"))
        .stdout(contains("Usage: spend <amount> [box]"))
        .stdout(contains(concat!("budgetbox ", env!("CARGO_PKG_VERSION"))))
        .stdout(contains("Storage   : in sync"));
}
