pub mod app;
pub mod config;
pub mod dom;
pub mod error;
pub mod widget;

pub use app::{App, PanelView};
pub use config::{Config, LocationSelector, Units, WeatherSettings};
pub use dom::DisplayNode;
pub use error::{AppError, ConfigError};
pub use widget::{Notification, PanelHost, Widget, WidgetContext};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Hearth core initialized");
    Ok(())
}
