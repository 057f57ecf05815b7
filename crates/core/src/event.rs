//! Turn progress events — decoupled reporting from the loop controller.
//!
//! The loop controller publishes an event per model call and per tool
//! execution; the CLI subscribes to print step markers without the turn
//! logic knowing anything about the console.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Events emitted while a turn is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TurnEvent {
    /// The model is being asked to decide the next action
    ModelCalled {
        step: u32,
        timestamp: DateTime<Utc>,
    },

    /// A tool lookup started
    ToolStarted {
        tool_name: String,
        query: String,
        timestamp: DateTime<Utc>,
    },

    /// A tool lookup finished
    ToolFinished {
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based bus for turn events.
///
/// Uses `tokio::sync::broadcast` so any number of observers can listen;
/// publishing with no subscribers is a no-op, not an error.
pub struct EventBus {
    sender: broadcast::Sender<Arc<TurnEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: TurnEvent) {
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<TurnEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
