//! Calculation settings.

use crate::error::BannerError;
use serde::{Deserialize, Serialize};

/// Settings shared by every calculation pass.
///
/// All fields have defaults, so a partial JSON object is enough:
///
/// ```rust
/// use sugostat::CalcConfig;
///
/// let config = CalcConfig::from_json(r#"{"csvHorizon": 100}"#).unwrap();
/// assert_eq!(config.csv_horizon, 100);
/// assert_eq!(config.default_horizon, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalcConfig {
    /// Horizon used when a banner's `totalMultis` is missing or invalid.
    pub default_horizon: u32,

    /// Horizon of the detailed table, independent of any banner.
    pub csv_horizon: u32,

    /// Lower bound of the chart x-axis and the graph CSV width.
    pub min_chart_multis: u32,

    /// Whether the graph CSV carries the per-multi success chance row.
    pub include_success_row: bool,
}

impl CalcConfig {
    /// Parse settings from JSON, filling in defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self, BannerError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            default_horizon: 30,
            csv_horizon: 200,
            min_chart_multis: 30,
            include_success_row: false,
        }
    }
}
