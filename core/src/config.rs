use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::format::offset_from_minutes;
use crate::model::metrics::BalanceLevel;
use crate::service::metrics_engine::DEFAULT_AVERAGE_WINDOW;
use crate::service::series_builder::DEFAULT_CHART_WINDOW;
use crate::source::file::DEFAULT_DATA_FILE;
use crate::source::schedule::DEFAULT_REFRESH_INTERVAL_MS;

/// Dashboard settings (from config file)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Local path or http(s) URL of the dataset document
    #[serde(default = "default_data_location")]
    pub data_location: String,

    /// Refresh interval in milliseconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// Balance at or below this is shown as low
    #[serde(default = "default_low_threshold")]
    pub low_balance_threshold: f64,

    /// Balance at or below this (and above low) is shown as medium
    #[serde(default = "default_medium_threshold")]
    pub medium_balance_threshold: f64,

    /// Readings in the rolling average window
    #[serde(default = "default_average_window")]
    pub average_window: usize,

    /// Days shown in the charts
    #[serde(default = "default_chart_window")]
    pub chart_window: usize,

    /// Display offset from UTC in minutes; local time when unset
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,

    /// Meter unit label
    #[serde(default = "default_unit")]
    pub unit: String,

    #[serde(default)]
    pub messages: Messages,
}

/// Fixed user-facing strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Messages {
    #[serde(default = "default_unknown")]
    pub unknown: String,

    #[serde(default = "default_not_applicable")]
    pub not_applicable: String,

    #[serde(default = "default_fetch_failure")]
    pub fetch_failure: String,
}

fn default_data_location() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_MS
}

fn default_low_threshold() -> f64 {
    50.0
}

fn default_medium_threshold() -> f64 {
    100.0
}

fn default_average_window() -> usize {
    DEFAULT_AVERAGE_WINDOW
}

fn default_chart_window() -> usize {
    DEFAULT_CHART_WINDOW
}

fn default_unit() -> String {
    "kWh".to_string()
}

fn default_unknown() -> String {
    "unknown".to_string()
}

fn default_not_applicable() -> String {
    "n/a".to_string()
}

fn default_fetch_failure() -> String {
    "Failed to fetch data, please try again later".to_string()
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            unknown: default_unknown(),
            not_applicable: default_not_applicable(),
            fetch_failure: default_fetch_failure(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_location: default_data_location(),
            refresh_interval_ms: default_refresh_interval(),
            low_balance_threshold: default_low_threshold(),
            medium_balance_threshold: default_medium_threshold(),
            average_window: default_average_window(),
            chart_window: default_chart_window(),
            utc_offset_minutes: None,
            unit: default_unit(),
            messages: Messages::default(),
        }
    }
}

impl Settings {
    /// Load settings from the given file, the default locations, or defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load_file(p);
        }

        let default_paths = [
            dirs::config_dir().map(|p| p.join("meterdash/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/meterdash/config.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_file(path);
            }
        }

        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Command line values take precedence over the file
    pub fn merge_overrides(&mut self, data_location: Option<String>, refresh_interval_ms: Option<u64>) {
        if let Some(location) = data_location {
            self.data_location = location;
        }
        if let Some(interval) = refresh_interval_ms {
            self.refresh_interval_ms = interval;
        }
    }

    /// Replace values that would make the dashboard misbehave
    pub fn validate(&mut self) {
        if self.refresh_interval_ms == 0 {
            tracing::warn!("refresh_interval_ms must be positive, using default");
            self.refresh_interval_ms = default_refresh_interval();
        }
        if self.average_window < 2 {
            tracing::warn!(value = self.average_window, "average_window needs at least 2 readings");
            self.average_window = default_average_window();
        }
        if self.chart_window == 0 {
            self.chart_window = default_chart_window();
        }
        if self.medium_balance_threshold < self.low_balance_threshold {
            tracing::warn!("medium_balance_threshold below low_balance_threshold, raising it");
            self.medium_balance_threshold = self.low_balance_threshold;
        }
        if let Some(minutes) = self.utc_offset_minutes {
            if offset_from_minutes(minutes).is_none() {
                tracing::warn!(value = minutes, "utc_offset_minutes out of range, using local time");
                self.utc_offset_minutes = None;
            }
        }
    }

    pub fn balance_level(&self, balance: f64) -> BalanceLevel {
        BalanceLevel::classify(balance, self.low_balance_threshold, self.medium_balance_threshold)
    }
}
