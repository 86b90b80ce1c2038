//! Unit system shared by the backend API and display formatting.

use serde::{Deserialize, Serialize};

/// Unit system for temperatures, wind speeds and visibility.
///
/// The backend accepts the upper-case names as the `units` query parameter.
/// STANDARD (Kelvin) shares METRIC's non-temperature units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Wire form used as the `units` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "METRIC",
            Units::Imperial => "IMPERIAL",
            Units::Standard => "STANDARD",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Units {
    type Err = UnknownUnits;

    // The backend enum upper-cases its input, so parsing is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "METRIC" => Ok(Units::Metric),
            "IMPERIAL" => Ok(Units::Imperial),
            "STANDARD" => Ok(Units::Standard),
            _ => Err(UnknownUnits(s.to_string())),
        }
    }
}

/// Error for unit names the backend would reject.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown unit system: {0}")]
pub struct UnknownUnits(pub String);
