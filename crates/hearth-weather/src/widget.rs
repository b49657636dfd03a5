//! The weather panel widget and its update loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use hearth_core::{
    DisplayNode, Notification, PanelHost, WeatherSettings, Widget, WidgetContext,
};

use crate::api::OpenWeatherClient;
use crate::cycle::{reconcile, FetchCycle};
use crate::render::render_panel;
use crate::schedule::UpdateScheduler;
use crate::types::{PanelState, WeatherError};

pub const WIDGET_ID: &str = "weather";

/// Weather panel widget.
///
/// Rendering reads a shared `PanelState`; a background task owns the
/// fetch cycles and replaces that state wholesale on each successful
/// reconciliation.
pub struct WeatherWidget {
    state: Arc<Mutex<PanelState>>,
    task: Option<JoinHandle<()>>,
}

impl WeatherWidget {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PanelState::default())),
            task: None,
        }
    }

    /// Shared handle to the displayed state.
    pub fn state_handle(&self) -> Arc<Mutex<PanelState>> {
        self.state.clone()
    }
}

impl Default for WeatherWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for WeatherWidget {
    fn id(&self) -> &str {
        WIDGET_ID
    }

    fn name(&self) -> &str {
        "Weather panel"
    }

    fn start(&mut self, ctx: &WidgetContext) -> Result<()> {
        let settings = ctx.config.weather.clone();

        if !settings.has_api_key() {
            // The panel renders setup instructions instead of weather data.
            tracing::error!("Weather: api_key not set");
        }

        let handle = tokio::runtime::Handle::try_current()
            .context("weather widget requires a running Tokio runtime")?;

        let client = OpenWeatherClient::new(&settings)
            .map_err(|e| anyhow::anyhow!("failed to build weather client: {e}"))?;

        let updater = Updater {
            settings,
            client,
            state: self.state.clone(),
            host: ctx.host.clone(),
            lock: WIDGET_ID.to_string(),
        };

        self.task = Some(handle.spawn(updater.run()));
        Ok(())
    }

    fn render(&self, ctx: &WidgetContext) -> DisplayNode {
        let state = self.state.lock();
        render_panel(&ctx.config.weather, &state, ctx.host.as_ref())
    }

    fn header(&self, ctx: &WidgetContext) -> Option<String> {
        ctx.config.weather.header.clone()
    }

    fn on_notification(&mut self, ctx: &WidgetContext, notification: &Notification) {
        if *notification == Notification::PanelsMounted && ctx.config.weather.hide_header {
            ctx.host.hide(Duration::ZERO, WIDGET_ID);
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }
}

/// Background task owning the fetch cycles.
struct Updater {
    settings: WeatherSettings,
    client: OpenWeatherClient,
    state: Arc<Mutex<PanelState>>,
    host: Arc<dyn PanelHost>,
    lock: String,
}

impl Updater {
    async fn run(self) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = UpdateScheduler::new(tx);
        scheduler.arm(self.settings.initial_load_delay());

        let mut generation: u64 = 0;

        while rx.recv().await.is_some() {
            generation += 1;
            self.run_cycle(generation).await;

            // Retry cadence until the first successful reconciliation,
            // steady-state afterwards.
            let delay = if self.state.lock().loaded {
                self.settings.update_interval()
            } else {
                self.settings.retry_delay()
            };
            scheduler.arm(delay);
        }
    }

    async fn run_cycle(&self, generation: u64) {
        if !self.settings.has_api_key() {
            tracing::error!("Weather: api_key not set, skipping fetch cycle");
            return;
        }

        let Some(selector) = self.settings.location_selector() else {
            tracing::warn!("Weather: no location configured, hiding panel");
            self.host.hide(self.settings.animation_speed(), &self.lock);
            return;
        };

        let mut cycle = FetchCycle::new(generation);

        let (current, forecast) = tokio::join!(
            self.client.current(&self.settings, &selector),
            self.client.forecast(&self.settings, &selector),
        );

        match current {
            Ok(payload) => {
                if cycle.store_current(generation, payload) {
                    self.try_reconcile(&cycle);
                }
            }
            Err(e) => self.handle_fetch_error("current conditions", e),
        }

        match forecast {
            Ok(payload) => {
                if cycle.store_forecast(generation, payload) {
                    self.try_reconcile(&cycle);
                }
            }
            Err(e) => self.handle_fetch_error("forecast", e),
        }
    }

    fn try_reconcile(&self, cycle: &FetchCycle) {
        let Some((current, days)) = reconcile(cycle, &self.settings) else {
            return;
        };

        {
            let mut state = self.state.lock();
            state.loaded = true;
            state.current = Some(current);
            state.forecast = days;
        }

        tracing::info!("Weather: panel updated");
        self.host.show(self.settings.animation_speed(), &self.lock);
        self.host.request_redraw(self.settings.animation_speed());
    }

    fn handle_fetch_error(&self, what: &str, err: WeatherError) {
        match err {
            WeatherError::Unauthorized => {
                // Redraw with whatever is on screen; loaded stays false.
                tracing::warn!("Weather: provider rejected credential while fetching {what}");
                self.host.request_redraw(self.settings.animation_speed());
            }
            e => tracing::error!("Weather: could not load {what}: {e}"),
        }
    }
}
