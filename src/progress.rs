// * Progress Reporting
// * Stages push short human-readable status lines into a caller-supplied sink.
// * Reporting is fire-and-forget and never influences control flow.

use std::sync::Mutex;

/// Receives progress messages from a pipeline stage
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Discards every message
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _message: &str) {}
}

/// Forwards messages to `tracing` tagged with the stage name
#[derive(Debug, Clone)]
pub struct TracingSink {
    stage: &'static str,
}

impl TracingSink {
    pub fn new(stage: &'static str) -> Self {
        Self { stage }
    }
}

impl ProgressSink for TracingSink {
    fn report(&self, message: &str) {
        tracing::info!(stage = self.stage, "{}", message);
    }
}

/// Keeps every message in memory, mostly for tests and summaries
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl ProgressSink for CollectingSink {
    fn report(&self, message: &str) {
        // * A poisoned lock only loses a status line
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
