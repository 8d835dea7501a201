use std::{path::PathBuf, sync::Mutex};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Friday 2024-03-15, noon in UTC-3.
pub const FRIDAY_NOON: &str = "2024-03-15T15:00:00Z";

/// Creates an isolated `BUDGETBOX_HOME` for one test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Script-mode invocation of the CLI pinned to `now`.
pub fn script(home: &PathBuf, now: &str, input: &str) -> Command {
    let mut cmd = Command::cargo_bin("budgetbox_cli").expect("binary builds");
    cmd.env("BUDGETBOX_CLI_SCRIPT", "1")
        .env("BUDGETBOX_HOME", home)
        .env("BUDGETBOX_NOW", now)
        .env_remove("RUST_LOG")
        .write_stdin(input.to_string());
    cmd
}

pub fn data_file(home: &PathBuf) -> PathBuf {
    home.join("data").join("budgetbox.json")
}
