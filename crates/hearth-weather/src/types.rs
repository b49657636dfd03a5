use serde::{Deserialize, Serialize};

/// Weather fetch errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Provider rejected the API credential")]
    Unauthorized,
    #[error("Provider returned status {status}")]
    Api { status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Round a reading to the nearest integer, rendered as a string.
/// Non-numeric input comes back as "0".
pub fn round_value(value: f64) -> String {
    if value.is_nan() {
        return "0".to_string();
    }
    format!("{}", value.round() as i64)
}

/// Display-ready current conditions.
///
/// All values are pre-rounded strings; `icon` stays `None` for provider
/// codes the icon table does not map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentDisplay {
    pub icon: Option<String>,
    pub temp: String,
    pub max_temp: String,
    pub min_temp: String,
    pub rain: String,
}

/// Display-ready forecast day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDayDisplay {
    /// Locale-formatted weekday name.
    pub day: String,
    pub icon: Option<String>,
    pub max_temp: String,
    pub min_temp: String,
}

/// What the panel currently shows.
///
/// Replaced wholesale when a reconciliation succeeds; a failed or partial
/// fetch cycle leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub loaded: bool,
    pub current: Option<CurrentDisplay>,
    pub forecast: Vec<ForecastDayDisplay>,
}
