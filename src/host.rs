//! Terminal host adapter.
//!
//! Implements the panel-host capability surface for a plain terminal:
//! show/hide toggle per-panel visibility, redraw requests are forwarded
//! to the main loop, and translation is a fixed string table.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use hearth_core::PanelHost;

/// Host events the main loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Redraw,
}

pub struct TerminalHost {
    tx: mpsc::UnboundedSender<HostEvent>,
    translations: HashMap<&'static str, &'static str>,
    hidden: Mutex<HashSet<String>>,
}

impl TerminalHost {
    pub fn new(tx: mpsc::UnboundedSender<HostEvent>) -> Self {
        let mut translations = HashMap::new();
        translations.insert("LOADING", "Loading …");

        Self {
            tx,
            translations,
            hidden: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_hidden(&self, lock: &str) -> bool {
        self.hidden.lock().contains(lock)
    }
}

impl PanelHost for TerminalHost {
    fn translate(&self, key: &str) -> String {
        self.translations
            .get(key)
            .map(|s| (*s).to_string())
            .unwrap_or_else(|| key.to_string())
    }

    fn show(&self, _duration: Duration, lock: &str) {
        self.hidden.lock().remove(lock);
        let _ = self.tx.send(HostEvent::Redraw);
    }

    fn hide(&self, _duration: Duration, lock: &str) {
        self.hidden.lock().insert(lock.to_string());
        let _ = self.tx.send(HostEvent::Redraw);
    }

    fn request_redraw(&self, _duration: Duration) {
        let _ = self.tx.send(HostEvent::Redraw);
    }
}
