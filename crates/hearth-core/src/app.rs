use std::sync::Arc;

use crate::error::AppError;
use crate::widget::{Notification, PanelHost, Widget, WidgetContext};
use crate::{Config, DisplayNode};

/// One widget's rendered panel.
pub struct PanelView {
    pub id: String,
    pub header: Option<String>,
    pub tree: DisplayNode,
}

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    widgets: Vec<Box<dyn Widget>>,
    context: WidgetContext,
}

impl App {
    /// Create a new application instance around a loaded config and host.
    pub fn new(config: Config, host: Arc<dyn PanelHost>) -> Self {
        let config = Arc::new(config);
        let context = WidgetContext::new(config.clone(), host);

        Self {
            config,
            widgets: Vec::new(),
            context,
        }
    }

    /// Register a widget with the application
    pub fn register_widget(&mut self, widget: Box<dyn Widget>) {
        tracing::info!("Registering widget: {}", widget.name());
        self.widgets.push(widget);
    }

    /// Start all registered widgets
    pub fn start(&mut self) -> Result<(), AppError> {
        tracing::info!("Starting dashboard with {} widgets", self.widgets.len());

        for widget in &mut self.widgets {
            tracing::debug!("Starting widget: {}", widget.name());
            widget
                .start(&self.context)
                .map_err(|e| AppError::Widget(format!("{}: {}", widget.id(), e)))?;
        }

        // Panels exist once every widget has started.
        self.notify(&Notification::PanelsMounted);

        tracing::info!("Dashboard started successfully");
        Ok(())
    }

    /// Broadcast a host signal to every widget
    pub fn notify(&mut self, notification: &Notification) {
        for widget in &mut self.widgets {
            widget.on_notification(&self.context, notification);
        }
    }

    /// Render every widget's display tree, paired with its id and header.
    pub fn render_panels(&self) -> Vec<PanelView> {
        self.widgets
            .iter()
            .map(|w| PanelView {
                id: w.id().to_string(),
                header: w.header(&self.context),
                tree: w.render(&self.context),
            })
            .collect()
    }

    /// Shutdown the application and all widgets
    pub fn shutdown(&mut self) -> Result<(), AppError> {
        tracing::info!("Shutting down dashboard");

        for widget in &mut self.widgets {
            tracing::debug!("Shutting down widget: {}", widget.name());
            if let Err(e) = widget.shutdown() {
                tracing::error!("Error shutting down widget {}: {}", widget.name(), e);
            }
        }

        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get list of all registered widgets
    pub fn widgets(&self) -> &[Box<dyn Widget>] {
        &self.widgets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DisplayNode;
    use anyhow::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct NullHost;

    impl PanelHost for NullHost {
        fn translate(&self, key: &str) -> String {
            key.to_string()
        }
        fn show(&self, _duration: Duration, _lock: &str) {}
        fn hide(&self, _duration: Duration, _lock: &str) {}
        fn request_redraw(&self, _duration: Duration) {}
    }

    struct CountingWidget {
        started: Arc<AtomicUsize>,
        notified: Arc<AtomicUsize>,
    }

    impl Widget for CountingWidget {
        fn id(&self) -> &str {
            "counting"
        }
        fn name(&self) -> &str {
            "Counting widget"
        }
        fn start(&mut self, _ctx: &WidgetContext) -> Result<()> {
            self.started.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn render(&self, _ctx: &WidgetContext) -> DisplayNode {
            DisplayNode::new().class("counting")
        }
        fn on_notification(&mut self, _ctx: &WidgetContext, notification: &Notification) {
            if *notification == Notification::PanelsMounted {
                self.notified.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn shutdown(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_start_runs_widgets_and_broadcasts_mounted() {
        let started = Arc::new(AtomicUsize::new(0));
        let notified = Arc::new(AtomicUsize::new(0));

        let mut app = App::new(Config::default(), Arc::new(NullHost));
        app.register_widget(Box::new(CountingWidget {
            started: started.clone(),
            notified: notified.clone(),
        }));

        app.start().unwrap();
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(notified.load(Ordering::SeqCst), 1);

        let panels = app.render_panels();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].id, "counting");
        assert!(panels[0].tree.has_class("counting"));

        app.shutdown().unwrap();
    }
}
