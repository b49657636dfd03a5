//! Weather panel widget for Hearth
//!
//! Fetches current conditions and a short daily forecast from the
//! OpenWeatherMap API, joins the two responses into a display model, and
//! renders a panel for the dashboard host.

pub mod api;
mod cycle;
pub mod render;
mod schedule;
pub mod types;
pub mod widget;

pub use api::{CurrentConditions, DailyForecast, OpenWeatherClient};
pub use render::render_panel;
pub use types::{CurrentDisplay, ForecastDayDisplay, PanelState, WeatherError};
pub use widget::WeatherWidget;
