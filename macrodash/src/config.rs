use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::observation::YearRange;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Root of the World Bank v2 API
    pub base_url: String,
    pub indicator: String,
    pub cache_path: String,
    pub per_page: u32,
    pub timeout_secs: u64,
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "https://api.worldbank.org/v2".into(),
            indicator: "SL.UEM.TOTL.ZS".into(),
            cache_path: "data/unemployment.csv".into(),
            per_page: 1000,
            timeout_secs: 30,
            dashboard: DashboardConfig::default(),
        }
    }
}

/// Where a dashboard pass gets its observations from.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DataSource {
    #[default]
    Live,
    Cached,
}

/// The knobs that distinguish one dashboard panel from another.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub window_years: u16,
    pub compute_comparison: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Live,
            window_years: 34,
            compute_comparison: true,
        }
    }
}

impl DashboardConfig {
    /// Inclusive range `[current_year - window_years, current_year]`.
    pub fn year_range(&self, current_year: i32) -> YearRange {
        YearRange::new(current_year - i32::from(self.window_years), current_year)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"cache_path": "/tmp/u.csv"}"#).unwrap();
        assert_eq!(config.cache_path, "/tmp/u.csv");
        assert_eq!(config.indicator, "SL.UEM.TOTL.ZS");
        assert_eq!(config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn dashboard_section_deserializes() {
        let config: Config = serde_json::from_str(
            r#"{"dashboard": {"source": "cached", "window_years": 10, "compute_comparison": false}}"#,
        )
        .unwrap();
        assert_eq!(config.dashboard.source, DataSource::Cached);
        assert_eq!(config.dashboard.window_years, 10);
        assert!(!config.dashboard.compute_comparison);
    }

    #[test]
    fn data_source_should_parse_case_insensitively() {
        assert_eq!(DataSource::from_str("Cached").unwrap(), DataSource::Cached);
        assert_eq!(DataSource::from_str("live").unwrap(), DataSource::Live);
        assert!(DataSource::from_str("remote").is_err());
        assert_eq!(DataSource::Cached.to_string(), "cached");
    }

    #[test]
    fn window_is_inclusive_of_both_ends() {
        let dashboard = DashboardConfig {
            window_years: 10,
            ..Default::default()
        };
        assert_eq!(dashboard.year_range(2025), YearRange::new(2015, 2025));
    }
}
