use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Weather panel settings
    #[serde(default)]
    pub weather: WeatherSettings,
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hearth")
}

/// Measurement unit system sent to the weather provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Query-parameter value understood by the provider.
    pub fn as_param(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

/// Which location selector a request should carry.
///
/// A numeric provider id is preferred over a free-text query when both are
/// configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationSelector {
    Id(String),
    Query(String),
}

/// Settings for the weather panel widget.
///
/// Every field has a documented default; a user config file only needs to
/// list the fields it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    /// Free-text location query (e.g. "Amsterdam,NL").
    pub location: Option<String>,

    /// Numeric provider location id. Preferred over `location` when set.
    pub location_id: Option<String>,

    /// Provider API credential. Empty means "not configured".
    pub api_key: String,

    /// Unit system for temperatures and precipitation.
    pub units: Units,

    /// Language code passed to the provider and used for weekday names.
    pub lang: String,

    /// Optional panel header shown by the host.
    pub header: Option<String>,

    /// Hide the panel once the dashboard reports its panels are mounted.
    pub hide_header: bool,

    /// Steady-state delay between fetch cycles, in milliseconds.
    pub update_interval_ms: u64,

    /// Delay before the very first fetch cycle, in milliseconds.
    pub initial_load_delay_ms: u64,

    /// Delay between cycles until the first successful reconciliation.
    pub retry_delay_ms: u64,

    /// Animation duration handed to the host on show/hide/redraw.
    pub animation_speed_ms: u64,

    /// Provider API base URL.
    pub api_base: String,

    /// Provider API version path segment.
    pub api_version: String,

    /// Endpoint for current conditions.
    pub current_endpoint: String,

    /// Endpoint for the daily forecast.
    pub forecast_endpoint: String,

    /// Number of forecast days requested from the provider.
    pub forecast_count: u32,

    /// Provider icon code to display class. Unmapped codes render without
    /// an icon.
    pub icon_table: HashMap<String, String>,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            location: None,
            location_id: None,
            api_key: String::new(),
            units: Units::default(),
            lang: "en".to_string(),
            header: None,
            hide_header: false,
            update_interval_ms: 10 * 60 * 1000,
            initial_load_delay_ms: 2500,
            retry_delay_ms: 2500,
            animation_speed_ms: 1000,
            api_base: "https://api.openweathermap.org/data/".to_string(),
            api_version: "2.5".to_string(),
            current_endpoint: "weather".to_string(),
            forecast_endpoint: "forecast/daily".to_string(),
            forecast_count: 4,
            icon_table: default_icon_table(),
        }
    }
}

/// Day/night display classes for the nine provider condition codes.
pub fn default_icon_table() -> HashMap<String, String> {
    let entries = [
        ("01d", "wu-clear"),
        ("02d", "wu-partlycloudy"),
        ("03d", "wu-cloudy"),
        ("04d", "wu-cloudy"),
        ("09d", "wu-flurries"),
        ("10d", "wu-rain"),
        ("11d", "wu-tstorms"),
        ("13d", "wu-snow"),
        ("50d", "wu-fog"),
        ("01n", "wu-clear wu-night"),
        ("02n", "wu-partlycloudy wu-night"),
        ("03n", "wu-cloudy wu-night"),
        ("04n", "wu-cloudy wu-night"),
        ("09n", "wu-flurries wu-night"),
        ("10n", "wu-rain wu-night"),
        ("11n", "wu-tstorms wu-night"),
        ("13n", "wu-snow wu-night"),
        ("50n", "wu-fog wu-night"),
    ];

    entries
        .iter()
        .map(|(code, class)| (code.to_string(), class.to_string()))
        .collect()
}

impl WeatherSettings {
    /// Whether the provider credential is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// The location selector for request URLs, id preferred over query.
    /// Returns `None` when neither is configured; the panel stays hidden.
    pub fn location_selector(&self) -> Option<LocationSelector> {
        if let Some(id) = self.location_id.as_ref().filter(|s| !s.is_empty()) {
            return Some(LocationSelector::Id(id.clone()));
        }
        self.location
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|q| LocationSelector::Query(q.clone()))
    }

    /// Display class for a provider icon code, if the table maps it.
    pub fn icon_class(&self, code: &str) -> Option<&str> {
        self.icon_table.get(code).map(String::as_str)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn initial_load_delay(&self) -> Duration {
        Duration::from_millis(self.initial_load_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn animation_speed(&self) -> Duration {
        Duration::from_millis(self.animation_speed_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from an explicit path, creating default if absent.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to_path(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.api_base, "weather.api_base", &mut result);

        if !self.weather.has_api_key() {
            result.add_warning(
                "weather.api_key",
                "API credential not set - panel will show setup instructions",
            );
        }

        if self.weather.location_selector().is_none() {
            result.add_warning(
                "weather.location",
                "Neither location nor location_id configured - panel stays hidden",
            );
        }

        if self.weather.update_interval_ms == 0 {
            result.add_warning(
                "weather.update_interval_ms",
                "Weather refresh disabled (0 ms)",
            );
        }

        if self.weather.forecast_count == 0 {
            result.add_warning("weather.forecast_count", "Forecast request disabled (0 days)");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("hearth");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(
            result.is_valid(),
            "Default config should be valid: {:?}",
            result.errors
        );
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_missing_location_is_warning() {
        let config = Config::default();
        let result = config.validate();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == "weather.location"));
    }

    #[test]
    fn test_invalid_api_base() {
        let mut config = Config::default();
        config.weather.api_base = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.api_base"));
    }

    #[test]
    fn test_invalid_api_base_scheme() {
        let mut config = Config::default();
        config.weather.api_base = "ftp://api.openweathermap.org/data/".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_documented_defaults() {
        let settings = WeatherSettings::default();
        assert_eq!(settings.update_interval_ms, 600_000);
        assert_eq!(settings.initial_load_delay_ms, 2500);
        assert_eq!(settings.retry_delay_ms, 2500);
        assert_eq!(settings.forecast_count, 4);
        assert_eq!(settings.api_version, "2.5");
        assert_eq!(settings.current_endpoint, "weather");
        assert_eq!(settings.forecast_endpoint, "forecast/daily");
    }

    #[test]
    fn test_icon_table_has_day_and_night_variants() {
        let table = default_icon_table();
        assert_eq!(table.len(), 18);
        assert_eq!(table.get("10d").map(String::as_str), Some("wu-rain"));
        assert_eq!(
            table.get("10n").map(String::as_str),
            Some("wu-rain wu-night")
        );
        assert_eq!(table.get("01d").map(String::as_str), Some("wu-clear"));
        assert!(table.get("99x").is_none());
    }

    #[test]
    fn test_location_selector_prefers_id() {
        let mut settings = WeatherSettings::default();
        settings.location = Some("London,UK".to_string());
        settings.location_id = Some("2643743".to_string());
        assert_eq!(
            settings.location_selector(),
            Some(LocationSelector::Id("2643743".to_string()))
        );

        settings.location_id = None;
        assert_eq!(
            settings.location_selector(),
            Some(LocationSelector::Query("London,UK".to_string()))
        );

        settings.location = None;
        assert_eq!(settings.location_selector(), None);
    }

    #[test]
    fn test_empty_selector_strings_are_ignored() {
        let mut settings = WeatherSettings::default();
        settings.location = Some(String::new());
        settings.location_id = Some(String::new());
        assert_eq!(settings.location_selector(), None);
    }

    #[test]
    fn test_partial_toml_merges_over_defaults() {
        let toml_str = r#"
            [weather]
            location_id = "2643743"
            api_key = "abc"
            units = "imperial"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.weather.location_id.as_deref(), Some("2643743"));
        assert_eq!(config.weather.api_key, "abc");
        assert_eq!(config.weather.units, Units::Imperial);
        // Untouched fields keep their documented defaults.
        assert_eq!(config.weather.update_interval_ms, 600_000);
        assert_eq!(config.weather.icon_table.len(), 18);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.weather.api_key = "abc".to_string();
        config.weather.location = Some("Utrecht".to_string());
        config.save_to_path(&path).unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.weather.api_key, "abc");
        assert_eq!(reloaded.weather.location.as_deref(), Some("Utrecht"));
    }

    #[test]
    fn test_load_creates_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh").join("config.toml");

        let config = Config::load_from_path(&path).unwrap();
        assert!(path.exists());
        assert!(!config.weather.has_api_key());
    }
}
