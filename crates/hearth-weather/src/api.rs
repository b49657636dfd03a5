use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use hearth_core::{LocationSelector, WeatherSettings};

use crate::types::WeatherError;

/// Current conditions payload (provider shape).
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionTag>,
}

impl CurrentConditions {
    /// Icon code of the leading weather condition, if any.
    pub fn icon_code(&self) -> Option<&str> {
        self.weather.first().map(|w| w.icon.as_str())
    }
}

/// Temperature block of the current conditions payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub temp_max: f64,
    pub temp_min: f64,
}

/// One weather condition tag; only the icon code is used.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionTag {
    pub icon: String,
}

/// Daily forecast payload (provider shape).
#[derive(Debug, Clone, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

/// One forecast day.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// UNIX timestamp of the forecast day.
    pub dt: i64,
    pub temp: TempRange,
    #[serde(default)]
    pub weather: Vec<ConditionTag>,
    /// Rain amount in mm; the provider omits the field on dry days.
    #[serde(default)]
    pub rain: Option<f64>,
}

impl ForecastEntry {
    pub fn icon_code(&self) -> Option<&str> {
        self.weather.first().map(|w| w.icon.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TempRange {
    pub max: f64,
    pub min: f64,
}

/// OpenWeatherMap API client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: Url,
    client: Arc<Client>,
}

impl OpenWeatherClient {
    /// Create a new client against the configured API base.
    pub fn new(settings: &WeatherSettings) -> Result<Self, WeatherError> {
        let base_url =
            Url::parse(&settings.api_base).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url,
            client: Arc::new(client),
        })
    }

    /// Fetch current conditions.
    pub async fn current(
        &self,
        settings: &WeatherSettings,
        selector: &LocationSelector,
    ) -> Result<CurrentConditions, WeatherError> {
        tracing::debug!("Fetching current conditions");
        let url = self.endpoint_url(settings, &settings.current_endpoint, selector, None)?;
        self.get_json(url).await
    }

    /// Fetch the daily forecast, constrained to the configured day count.
    pub async fn forecast(
        &self,
        settings: &WeatherSettings,
        selector: &LocationSelector,
    ) -> Result<DailyForecast, WeatherError> {
        tracing::debug!("Fetching daily forecast");
        let url = self.endpoint_url(
            settings,
            &settings.forecast_endpoint,
            selector,
            Some(settings.forecast_count),
        )?;
        self.get_json(url).await
    }

    /// Build `<base><version>/<endpoint>?<query>` for one request.
    pub(crate) fn endpoint_url(
        &self,
        settings: &WeatherSettings,
        endpoint: &str,
        selector: &LocationSelector,
        count: Option<u32>,
    ) -> Result<Url, WeatherError> {
        let mut url = self
            .base_url
            .join(&format!("{}/{}", settings.api_version, endpoint))
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            match selector {
                LocationSelector::Id(id) => query.append_pair("id", id),
                LocationSelector::Query(location) => query.append_pair("q", location),
            };
            query.append_pair("units", settings.units.as_param());
            query.append_pair("lang", &settings.lang);
            query.append_pair("appid", &settings.api_key);
            if let Some(count) = count {
                query.append_pair("cnt", &count.to_string());
            }
        }

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, WeatherError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(WeatherError::Unauthorized);
        }
        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> WeatherSettings {
        let mut settings = WeatherSettings::default();
        settings.api_key = "abc".to_string();
        settings.lang = "en".to_string();
        settings
    }

    #[test]
    fn test_current_conditions_deserialization() {
        let json = r#"{
            "main": {"temp": 15.6, "temp_max": 17.2, "temp_min": 9.9},
            "weather": [{"icon": "10d"}]
        }"#;
        let payload: CurrentConditions = serde_json::from_str(json).unwrap();
        assert_eq!(payload.main.temp, 15.6);
        assert_eq!(payload.icon_code(), Some("10d"));
    }

    #[test]
    fn test_current_conditions_without_weather_tags() {
        let json = r#"{"main": {"temp": 1.0, "temp_max": 2.0, "temp_min": 0.0}}"#;
        let payload: CurrentConditions = serde_json::from_str(json).unwrap();
        assert_eq!(payload.icon_code(), None);
    }

    #[test]
    fn test_forecast_deserialization_with_optional_rain() {
        let json = r#"{
            "list": [
                {"dt": 1, "temp": {"max": 17.0, "min": 9.0}, "weather": [{"icon": "10d"}], "rain": 0.4},
                {"dt": 2, "temp": {"max": 12.0, "min": 4.0}, "weather": [{"icon": "01d"}]}
            ]
        }"#;
        let payload: DailyForecast = serde_json::from_str(json).unwrap();
        assert_eq!(payload.list.len(), 2);
        assert_eq!(payload.list[0].rain, Some(0.4));
        assert_eq!(payload.list[1].rain, None);
        assert_eq!(payload.list[1].icon_code(), Some("01d"));
    }

    #[test]
    fn test_endpoint_url_prefers_location_id() {
        let settings = settings();
        let client = OpenWeatherClient::new(&settings).unwrap();

        let url = client
            .endpoint_url(
                &settings,
                &settings.current_endpoint,
                &LocationSelector::Id("2643743".to_string()),
                None,
            )
            .unwrap();

        assert!(url.path().ends_with("2.5/weather"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&("id".to_string(), "2643743".to_string())));
        assert!(pairs.iter().all(|(k, _)| k != "q"));
        assert!(pairs.contains(&("units".to_string(), "metric".to_string())));
        assert!(pairs.contains(&("lang".to_string(), "en".to_string())));
        assert!(pairs.contains(&("appid".to_string(), "abc".to_string())));
        assert!(pairs.iter().all(|(k, _)| k != "cnt"));
    }

    #[test]
    fn test_forecast_url_carries_day_count() {
        let settings = settings();
        let client = OpenWeatherClient::new(&settings).unwrap();

        let url = client
            .endpoint_url(
                &settings,
                &settings.forecast_endpoint,
                &LocationSelector::Query("London,UK".to_string()),
                Some(settings.forecast_count),
            )
            .unwrap();

        assert!(url.path().ends_with("2.5/forecast/daily"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "London,UK".to_string())));
        assert!(pairs.contains(&("cnt".to_string(), "4".to_string())));
    }

    #[test]
    fn test_invalid_api_base_is_rejected() {
        let mut settings = settings();
        settings.api_base = "not a url".to_string();
        assert!(matches!(
            OpenWeatherClient::new(&settings),
            Err(WeatherError::Parse(_))
        ));
    }
}
