//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::GymApiConfig;
use crate::catalog::{Catalog, CatalogError, Location, Selection};
use crate::views::{DashboardSettings, RenderStyle};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Custom location list; empty means the built-in catalog
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_occupancy_url")]
    pub occupancy_url: String,

    #[serde(default = "default_route_set_url")]
    pub route_set_url: String,

    /// 0 disables the timeout
    #[serde(default)]
    pub request_timeout_secs: u64,
}

fn default_occupancy_url() -> String {
    GymApiConfig::default().occupancy_url
}

fn default_route_set_url() -> String {
    GymApiConfig::default().route_set_url
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            occupancy_url: default_occupancy_url(),
            route_set_url: default_route_set_url(),
            request_timeout_secs: 0,
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> GymApiConfig {
        GymApiConfig {
            occupancy_url: self.occupancy_url.clone(),
            route_set_url: self.route_set_url.clone(),
            request_timeout: (self.request_timeout_secs > 0)
                .then(|| Duration::from_secs(self.request_timeout_secs)),
            ..GymApiConfig::default()
        }
    }
}

/// Refresh timing
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_refetch_ms")]
    pub occupancy_refetch_ms: u64,

    #[serde(default = "default_clock_tick_ms")]
    pub clock_tick_ms: u64,
}

fn default_refetch_ms() -> u64 {
    6000 // 6 seconds
}

fn default_clock_tick_ms() -> u64 {
    1000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            occupancy_refetch_ms: default_refetch_ms(),
            clock_tick_ms: default_clock_tick_ms(),
        }
    }
}

/// Terminal presentation
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Location selected on startup; `None` means the first catalog entry
    pub default_location: Option<String>,

    #[serde(default = "default_breakpoint")]
    pub breakpoint_columns: u16,

    /// Used when the terminal width is unknown
    #[serde(default = "default_width")]
    pub width: u16,

    #[serde(default = "default_color")]
    pub color: bool,

    #[serde(default = "default_gauge_width")]
    pub gauge_width: usize,

    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

fn default_breakpoint() -> u16 {
    80
}

fn default_width() -> u16 {
    100
}

fn default_color() -> bool {
    true
}

fn default_gauge_width() -> usize {
    40
}

fn default_bar_width() -> usize {
    40
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_location: None,
            breakpoint_columns: default_breakpoint(),
            width: default_width(),
            color: default_color(),
            gauge_width: default_gauge_width(),
            bar_width: default_bar_width(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("gymwatch").join("config.toml")),
            Some(PathBuf::from("./gymwatch.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// An explicit path must load; otherwise search the default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("GYMWATCH_OCCUPANCY_URL") {
            self.api.occupancy_url = url;
        }
        if let Ok(url) = std::env::var("GYMWATCH_ROUTE_SET_URL") {
            self.api.route_set_url = url;
        }

        if let Ok(ms) = std::env::var("GYMWATCH_REFETCH_MS") {
            if let Ok(ms) = ms.parse() {
                self.polling.occupancy_refetch_ms = ms;
            }
        }

        if let Ok(location) = std::env::var("GYMWATCH_DEFAULT_LOCATION") {
            self.display.default_location = Some(location);
        }

        if let Ok(level) = std::env::var("GYMWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GYMWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// The location catalog: the configured list, or the built-in one
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        if self.locations.is_empty() {
            Ok(Catalog::builtin())
        } else {
            Catalog::new(self.locations.clone())
        }
    }

    /// Startup selection; an unknown configured name is an error
    pub fn initial_selection(&self, catalog: &Catalog) -> Result<Selection, CatalogError> {
        match &self.display.default_location {
            Some(name) => catalog.selection(name),
            None => Ok(catalog.default_selection()),
        }
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            occupancy_refetch: Duration::from_millis(self.polling.occupancy_refetch_ms.max(1)),
            clock_tick: Duration::from_millis(self.polling.clock_tick_ms.max(1)),
            breakpoint_columns: self.display.breakpoint_columns,
            style: self.render_style(),
        }
    }

    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            color: self.display.color,
            gauge_width: self.display.gauge_width.max(1),
            bar_width: self.display.bar_width.max(4),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Gymwatch Configuration
#
# Environment variables override these settings:
# - GYMWATCH_OCCUPANCY_URL
# - GYMWATCH_ROUTE_SET_URL
# - GYMWATCH_REFETCH_MS
# - GYMWATCH_DEFAULT_LOCATION
# - GYMWATCH_LOG_LEVEL
# - GYMWATCH_LOG_FORMAT

[api]
# Occupancy endpoint (the location id is sent as ?branch=)
occupancy_url = "https://portal.urbanclimb.com.au/uc-services/ajax/gym/occupancy.ashx"

# Last route set endpoint
route_set_url = "https://api-prod.urbanclimb.com.au/widgets/last-set"

# Request timeout in seconds (0 = no timeout)
request_timeout_secs = 0

[polling]
# How often the single-location view refetches occupancy (ms)
occupancy_refetch_ms = 6000

# How often "N seconds ago" labels are recomputed (ms)
clock_tick_ms = 1000

[display]
# Location shown on startup (defaults to the first location)
# default_location = "West End"

# Below this terminal width the location selector stacks vertically
breakpoint_columns = 80

# Terminal width used when it cannot be detected
width = 100

# Colour gauges and bars with each gym's colour
color = true

# Gauge and bar sizes in cells
gauge_width = 40
bar_width = 40

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json
format = "pretty"

# Optional log file path (logs go to stderr otherwise)
# file = "/tmp/gymwatch.log"

# Custom location list (replaces the built-in gyms)
# [[locations]]
# name = "West End"
# id = "D969F1B2-0C9F-49A9-B2AC-D7775642F298"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.polling.occupancy_refetch_ms, 6000);
        assert_eq!(config.polling.clock_tick_ms, 1000);
        assert_eq!(config.logging.level, "info");
        assert!(config.locations.is_empty());
        assert!(config.api.client_config().request_timeout.is_none());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.polling.occupancy_refetch_ms, 6000);
        assert_eq!(config.display.breakpoint_columns, 80);
        assert_eq!(config.api.occupancy_url, default_occupancy_url());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
request_timeout_secs = 10

[display]
default_location = "Milton"
color = false

[[locations]]
name = "Milton"
id = "690326F9-98CE-4249-BD91-53A0676A137B"

[[locations]]
name = "Newstead"
id = "A3010228-DFC6-4317-86C0-3839FFDF3FD0"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(
            config.api.client_config().request_timeout,
            Some(Duration::from_secs(10))
        );
        assert_eq!(config.polling.occupancy_refetch_ms, 6000);
        assert!(!config.render_style().color);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.option_names(), vec!["Milton", "Newstead", "Compare"]);
        assert_eq!(config.initial_selection(&catalog).unwrap().name(), "Milton");
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let config: Config = toml::from_str(
            r#"
[[locations]]
name = "Compare"
id = "abc"
"#,
        )
        .unwrap();
        assert!(matches!(config.catalog(), Err(CatalogError::ReservedName(_))));
    }

    #[test]
    fn test_unknown_default_location_fails_fast() {
        let mut config = Config::default();
        config.display.default_location = Some("Atlantis".to_string());
        let catalog = config.catalog().unwrap();
        assert!(matches!(
            config.initial_selection(&catalog),
            Err(CatalogError::UnknownLocation(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load(Path::new("/nonexistent/gymwatch.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[polling]\noccupancy_refetch_ms = \"soon\"").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("GYMWATCH_REFETCH_MS", "2500");
        std::env::set_var("GYMWATCH_ROUTE_SET_URL", "http://localhost:9999/last-set");
        let config = Config::from_env();
        std::env::remove_var("GYMWATCH_REFETCH_MS");
        std::env::remove_var("GYMWATCH_ROUTE_SET_URL");

        assert_eq!(config.polling.occupancy_refetch_ms, 2500);
        assert_eq!(config.api.route_set_url, "http://localhost:9999/last-set");
    }
}
