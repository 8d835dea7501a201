use std::{env, path::PathBuf};

use budgetbox_config::ConfigManager;

/// Overrides the data directory, mostly for scripts and tests.
pub const HOME_ENV: &str = "BUDGETBOX_HOME";

/// Root directory holding `config/` and `data/`.
pub fn resolve_home() -> PathBuf {
    match env::var_os(HOME_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => ConfigManager::default_base_dir(),
    }
}
