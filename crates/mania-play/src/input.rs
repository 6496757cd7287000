use std::sync::mpsc::{SendError, Sender};

use serde::{Deserialize, Serialize};

/// A key press in one column at a given song time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitEvent {
    pub column: usize,
    pub time_ms: i64,
}

impl HitEvent {
    pub const fn new(column: usize, time_ms: i64) -> Self {
        Self { column, time_ms }
    }
}

/// Cloneable handle for submitting presses from an input thread. Events are
/// judged on the controller's next tick.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<HitEvent>,
    key_count: usize,
}

impl InputSender {
    pub(crate) fn new(tx: Sender<HitEvent>, key_count: usize) -> Self {
        Self { tx, key_count }
    }

    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Queue a press. Fails only once the controller has been dropped.
    ///
    /// Panics if `event.column` does not exist.
    pub fn send(&self, event: HitEvent) -> Result<(), SendError<HitEvent>> {
        assert!(
            event.column < self.key_count,
            "column {} out of range for {} keys",
            event.column,
            self.key_count
        );
        self.tx.send(event)
    }
}
