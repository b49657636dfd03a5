use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::dom::DisplayNode;
use crate::Config;

/// Capability surface the dashboard host exposes to widgets.
///
/// Widgets never own the screen; they ask the host to show or hide their
/// panel, to repaint it, and to resolve localized strings.
pub trait PanelHost: Send + Sync {
    /// Resolve a localized string for `key`. Unknown keys come back as-is.
    fn translate(&self, key: &str) -> String;

    /// Make the widget's panel visible. `lock` identifies the requester so
    /// paired show/hide calls can be matched up.
    fn show(&self, duration: Duration, lock: &str);

    /// Hide the widget's panel.
    fn hide(&self, duration: Duration, lock: &str);

    /// Ask the host to re-render the widget's display tree.
    fn request_redraw(&self, duration: Duration);
}

/// Host signals delivered to widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// All panels have been mounted by the host.
    PanelsMounted,
}

/// Context provided to widgets during start
pub struct WidgetContext {
    pub config: Arc<Config>,
    pub host: Arc<dyn PanelHost>,
}

impl WidgetContext {
    pub fn new(config: Arc<Config>, host: Arc<dyn PanelHost>) -> Self {
        Self { config, host }
    }
}

/// Widget provider trait for extending the dashboard
pub trait Widget: Send + Sync {
    /// Unique identifier for this widget
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Start the widget with the given context
    fn start(&mut self, ctx: &WidgetContext) -> Result<()>;

    /// Produce the widget's current display tree
    fn render(&self, ctx: &WidgetContext) -> DisplayNode;

    /// Optional panel header shown above the display tree
    fn header(&self, _ctx: &WidgetContext) -> Option<String> {
        None
    }

    /// Handle a host signal
    fn on_notification(&mut self, _ctx: &WidgetContext, _notification: &Notification) {}

    /// Shutdown the widget gracefully
    fn shutdown(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullHost;

    impl PanelHost for NullHost {
        fn translate(&self, key: &str) -> String {
            key.to_string()
        }
        fn show(&self, _duration: Duration, _lock: &str) {}
        fn hide(&self, _duration: Duration, _lock: &str) {}
        fn request_redraw(&self, _duration: Duration) {}
    }

    #[test]
    fn test_context_shares_config() {
        let config = Arc::new(Config::default());
        let ctx = WidgetContext::new(config.clone(), Arc::new(NullHost));
        assert_eq!(
            ctx.config.weather.update_interval_ms,
            config.weather.update_interval_ms
        );
        assert_eq!(ctx.host.translate("LOADING"), "LOADING");
    }
}
