//! Dashboard configuration.
//!
//! Built-in defaults, then feed credentials captured at build time
//! (`SUPABASE_URL`, `SUPABASE_ANON_KEY`), then an optional JSON override
//! placed on the page as `window.__DASHBOARD_CONFIG__`.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::errors::AppError;
use crate::domain::logging::LogLevel;

pub const WINDOW_CONFIG_KEY: &str = "__DASHBOARD_CONFIG__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default = "default_clocks")]
    pub clocks: Vec<ClockConfig>,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the price table lives and how to listen for changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_order_column")]
    pub order_column: String,

    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    pub label: String,

    /// IANA name, or empty / "local" for the browser zone
    #[serde(default)]
    pub time_zone: String,

    #[serde(default = "default_diameter")]
    pub diameter: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_display_zone")]
    pub display_zone: String,

    #[serde(default = "default_chart_width")]
    pub width: u32,

    #[serde(default = "default_chart_height")]
    pub height: u32,

    #[serde(default = "default_line_color")]
    pub line_color: String,
}

fn default_base_url() -> String {
    option_env!("SUPABASE_URL").unwrap_or("http://localhost:54321").to_string()
}

fn default_api_key() -> String {
    option_env!("SUPABASE_ANON_KEY").unwrap_or_default().to_string()
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_table() -> String {
    "brent_crude".to_string()
}

fn default_order_column() -> String {
    "created_at".to_string()
}

fn default_heartbeat_interval() -> u32 {
    30_000 // 30 seconds
}

fn default_diameter() -> u32 {
    180
}

fn default_clocks() -> Vec<ClockConfig> {
    [("Vancouver", "America/Vancouver"), ("UTC", "UTC"), ("Hong Kong", "Asia/Hong_Kong")]
        .into_iter()
        .map(|(label, zone)| ClockConfig {
            label: label.to_string(),
            time_zone: zone.to_string(),
            diameter: default_diameter(),
        })
        .collect()
}

fn default_title() -> String {
    "Brent Crude Oil Price (Real-time Chart)".to_string()
}

fn default_display_zone() -> String {
    "America/Vancouver".to_string()
}

fn default_chart_width() -> u32 {
    900
}

fn default_chart_height() -> u32 {
    400
}

fn default_line_color() -> String {
    "#8884d8".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            schema: default_schema(),
            table: default_table(),
            order_column: default_order_column(),
            heartbeat_interval_ms: default_heartbeat_interval(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            display_zone: default_display_zone(),
            width: default_chart_width(),
            height: default_chart_height(),
            line_color: default_line_color(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            clocks: default_clocks(),
            chart: ChartConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl ChartConfig {
    pub fn zone(&self) -> Result<Tz, AppError> {
        self.display_zone
            .parse()
            .map_err(|_| AppError::ConfigError(format!("invalid display zone '{}'", self.display_zone)))
    }
}

impl DashboardConfig {
    /// Parse a JSON override; absent fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw).map_err(|e| AppError::ConfigError(format!("invalid config JSON: {e}")))
    }

    /// Defaults, overridden by `window.__DASHBOARD_CONFIG__` when present.
    /// The override may be a JSON string or a plain object.
    pub fn load() -> Result<Self, AppError> {
        let Some(window) = web_sys::window() else {
            return Ok(Self::default());
        };
        let value = js_sys::Reflect::get(&window, &WINDOW_CONFIG_KEY.into())
            .map_err(|e| AppError::ConfigError(format!("cannot read {WINDOW_CONFIG_KEY}: {e:?}")))?;
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let raw = match value.as_string() {
            Some(text) => text,
            None => js_sys::JSON::stringify(&value)
                .map(String::from)
                .map_err(|e| AppError::ConfigError(format!("cannot serialise {WINDOW_CONFIG_KEY}: {e:?}")))?,
        };
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.chart.zone()?;
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(AppError::ConfigError("chart size must be positive".into()));
        }
        if let Some(clock) = self.clocks.iter().find(|clock| clock.diameter == 0) {
            return Err(AppError::ConfigError(format!("clock '{}' has zero diameter", clock.label)));
        }
        if self.feed.base_url.trim().is_empty() {
            return Err(AppError::ConfigError("feed base_url is empty".into()));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel, AppError> {
        self.log_level
            .parse()
            .map_err(|_| AppError::ConfigError(format!("unknown log level '{}'", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_three_city_layout() {
        let config = DashboardConfig::default();
        let zones: Vec<&str> = config.clocks.iter().map(|c| c.time_zone.as_str()).collect();
        assert_eq!(zones, ["America/Vancouver", "UTC", "Asia/Hong_Kong"]);
        assert!(config.clocks.iter().all(|c| c.diameter == 180));
        assert_eq!(config.feed.table, "brent_crude");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{"chart":{"display_zone":"UTC"},"log_level":"debug"}"#).unwrap();
        assert_eq!(config.chart.display_zone, "UTC");
        assert_eq!(config.chart.width, 900);
        assert_eq!(config.clocks.len(), 3);
        assert_eq!(config.log_level().unwrap(), LogLevel::Debug);
    }

    #[test]
    fn bad_display_zone_fails_validation() {
        let mut config = DashboardConfig::default();
        config.chart.display_zone = "Nowhere/Special".into();
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn invalid_clock_zone_is_not_a_config_error() {
        let mut config = DashboardConfig::default();
        config.clocks[0].time_zone = "Nowhere/Special".into();
        assert!(config.validate().is_ok());
    }
}
