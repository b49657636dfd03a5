//! Per-cycle fetch state and reconciliation into the display model.
//!
//! Each fetch cycle owns a fresh `FetchCycle` tagged with a monotonic
//! generation. Completions carry the generation they were issued under;
//! a store with a stale generation is discarded, so a slow response from
//! a superseded cycle can never overwrite newer data.

use chrono::{DateTime, Locale, Utc};

use hearth_core::WeatherSettings;

use crate::api::{CurrentConditions, DailyForecast};
use crate::types::{round_value, CurrentDisplay, ForecastDayDisplay};

/// Buffer holding the two raw responses until both are present.
#[derive(Debug, Default)]
pub(crate) struct FetchCycle {
    generation: u64,
    current: Option<CurrentConditions>,
    forecast: Option<DailyForecast>,
}

impl FetchCycle {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            current: None,
            forecast: None,
        }
    }

    /// Store the current-conditions payload. Returns false (and drops the
    /// payload) when it was fetched under a different generation.
    pub fn store_current(&mut self, generation: u64, payload: CurrentConditions) -> bool {
        if generation != self.generation {
            tracing::warn!(
                "Discarding stale current conditions (generation {} != {})",
                generation,
                self.generation
            );
            return false;
        }
        self.current = Some(payload);
        true
    }

    /// Store the forecast payload, with the same generation check.
    pub fn store_forecast(&mut self, generation: u64, payload: DailyForecast) -> bool {
        if generation != self.generation {
            tracing::warn!(
                "Discarding stale forecast (generation {} != {})",
                generation,
                self.generation
            );
            return false;
        }
        self.forecast = Some(payload);
        true
    }
}

/// Join the two halves of a cycle into the display model.
///
/// Returns `None` while either half is missing; the caller keeps waiting
/// without touching previously displayed data.
pub(crate) fn reconcile(
    cycle: &FetchCycle,
    settings: &WeatherSettings,
) -> Option<(CurrentDisplay, Vec<ForecastDayDisplay>)> {
    let current = cycle.current.as_ref()?;
    let forecast = cycle.forecast.as_ref()?;

    // The first forecast entry duplicates "today"; its rain amount feeds
    // the current block, and the day list starts at index 1.
    let rain = forecast.list.first().and_then(|e| e.rain).unwrap_or(0.0);

    let display = CurrentDisplay {
        icon: icon_class(settings, current.icon_code()),
        temp: round_value(current.main.temp),
        max_temp: round_value(current.main.temp_max),
        min_temp: round_value(current.main.temp_min),
        rain: round_value(rain),
    };

    let days = forecast
        .list
        .iter()
        .skip(1)
        .map(|entry| ForecastDayDisplay {
            day: weekday_name(entry.dt, &settings.lang),
            icon: icon_class(settings, entry.icon_code()),
            max_temp: round_value(entry.temp.max),
            min_temp: round_value(entry.temp.min),
        })
        .collect();

    Some((display, days))
}

fn icon_class(settings: &WeatherSettings, code: Option<&str>) -> Option<String> {
    code.and_then(|c| settings.icon_class(c)).map(str::to_string)
}

/// Locale-formatted weekday name for a UNIX timestamp.
pub(crate) fn weekday_name(dt: i64, lang: &str) -> String {
    let Some(when) = DateTime::<Utc>::from_timestamp(dt, 0) else {
        return String::new();
    };
    when.format_localized("%A", locale_for(lang)).to_string()
}

/// Best-effort mapping of a language code to a chrono locale.
fn locale_for(lang: &str) -> Locale {
    let normalized = lang.replace('-', "_");
    if let Ok(locale) = Locale::try_from(normalized.as_str()) {
        return locale;
    }
    let doubled = format!("{}_{}", normalized, normalized.to_uppercase());
    Locale::try_from(doubled.as_str()).unwrap_or(Locale::en_US)
}
