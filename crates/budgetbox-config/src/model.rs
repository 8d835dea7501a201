use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

use crate::ConfigError;

/// User-configurable frontend preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// Drops colours and decorative glyphs for assistive technology.
    #[serde(default)]
    pub screen_reader_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_quota_bytes: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom state file. Defaults to `<home>/data/budgetbox.json`.
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            locale: Self::default_locale(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            screen_reader_mode: false,
            storage_quota_bytes: None,
            data_file: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "R$".into()
    }

    pub fn default_locale() -> String {
        "pt-BR".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Colours are shown only when enabled and screen reader mode is off.
    pub fn colors_active(&self) -> bool {
        self.ui_color_enabled && !self.screen_reader_mode
    }

    pub fn resolve_data_file(&self, home: &std::path::Path) -> PathBuf {
        match &self.data_file {
            Some(path) => path.clone(),
            None => home.join("data").join("budgetbox.json"),
        }
    }

    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::CurrencySymbol => self.currency_symbol.clone(),
            ConfigKey::Locale => self.locale.clone(),
            ConfigKey::UiColorEnabled => self.ui_color_enabled.to_string(),
            ConfigKey::ScreenReaderMode => self.screen_reader_mode.to_string(),
            ConfigKey::StorageQuotaBytes => self
                .storage_quota_bytes
                .map(|bytes| bytes.to_string())
                .unwrap_or_else(|| "none".into()),
            ConfigKey::DataFile => self
                .data_file
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "default".into()),
        }
    }

    /// Applies a textual value. `none`/`default` unset the optional keys.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        match key {
            ConfigKey::CurrencySymbol => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.currency_symbol = value.to_string();
            }
            ConfigKey::Locale => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.locale = value.to_string();
            }
            ConfigKey::UiColorEnabled => {
                self.ui_color_enabled = parse_flag(value).ok_or_else(|| invalid("expected on/off"))?
            }
            ConfigKey::ScreenReaderMode => {
                self.screen_reader_mode =
                    parse_flag(value).ok_or_else(|| invalid("expected on/off"))?
            }
            ConfigKey::StorageQuotaBytes => {
                self.storage_quota_bytes = if is_unset(value) {
                    None
                } else {
                    Some(
                        value
                            .parse::<usize>()
                            .map_err(|_| invalid("expected a byte count"))?,
                    )
                };
            }
            ConfigKey::DataFile => {
                self.data_file = if is_unset(value) {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn is_unset(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("default")
}

/// Keys accepted by `config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    CurrencySymbol,
    Locale,
    UiColorEnabled,
    ScreenReaderMode,
    StorageQuotaBytes,
    DataFile,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::CurrencySymbol,
        ConfigKey::Locale,
        ConfigKey::UiColorEnabled,
        ConfigKey::ScreenReaderMode,
        ConfigKey::StorageQuotaBytes,
        ConfigKey::DataFile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::CurrencySymbol => "currency_symbol",
            ConfigKey::Locale => "locale",
            ConfigKey::UiColorEnabled => "ui_color_enabled",
            ConfigKey::ScreenReaderMode => "screen_reader_mode",
            ConfigKey::StorageQuotaBytes => "storage_quota_bytes",
            ConfigKey::DataFile => "data_file",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownKey(value.to_string()))
    }
}
