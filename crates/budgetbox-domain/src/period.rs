use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rollover cadence of a box.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Daily, Period::Weekly, Period::Monthly];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }

    /// Single-letter badge used in compact listings.
    pub fn badge(self) -> char {
        match self {
            Period::Daily => 'D',
            Period::Weekly => 'W',
            Period::Monthly => 'M',
        }
    }

    /// Lenient conversion used when reading untrusted data: unknown values map to daily.
    pub fn from_str_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Period::Daily),
            "weekly" | "week" | "w" => Ok(Period::Weekly),
            "monthly" | "month" | "m" => Ok(Period::Monthly),
            _ => Err(ParsePeriodError(value.to_string())),
        }
    }
}

/// Raised when a string does not name a known [`Period`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown period `{0}` (expected daily, weekly or monthly)")]
pub struct ParsePeriodError(pub String);
