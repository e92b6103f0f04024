//! Notifications from a search session to presentation layers

use doc_model::TextRange;
use serde::{Deserialize, Serialize};

/// Events a search session raises for the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchEvent {
    /// The UI should highlight and scroll to this range
    HighlightRequested(TextRange),
    /// A replacement was requested
    ReplaceRequested {
        pattern: String,
        replacement: String,
        replace_all: bool,
    },
}

type Subscriber = Box<dyn Fn(&SearchEvent) + Send + Sync>;

/// Fan-out of search events to registered callbacks
#[derive(Default)]
pub struct SearchNotifier {
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for SearchNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl SearchNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every future event
    pub fn subscribe(&mut self, callback: impl Fn(&SearchEvent) + Send + Sync + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Deliver an event to all subscribers in registration order
    pub fn emit(&self, event: SearchEvent) {
        for subscriber in &self.subscribers {
            subscriber(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
