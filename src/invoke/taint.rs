//! Source and sink collaborators.
//!
//! The source supplies the sensitive value injected at the call boundary;
//! the sink receives every call's textual result.

use parking_lot::Mutex;
use smol_str::SmolStr;
use tracing::debug;

/// The value [`FixedSource::default`] supplies.
pub const DEFAULT_SENSITIVE_VALUE: &str = "Secret";

/// Supplies the sensitive value.
///
/// The value may hold any text, but an empty one is never detected at the
/// sink and fails the scenario with `TaintLost`.
pub trait Source {
    fn source(&self) -> SmolStr;
}

/// Consumes call results.
pub trait Sink {
    fn sink(&self, value: &str);
}

/// A source that always returns the same value.
#[derive(Clone, Debug)]
pub struct FixedSource(SmolStr);

impl FixedSource {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(SmolStr::new(value.as_ref()))
    }
}

impl Default for FixedSource {
    fn default() -> Self {
        Self(SmolStr::new_static(DEFAULT_SENSITIVE_VALUE))
    }
}

impl Source for FixedSource {
    fn source(&self) -> SmolStr {
        self.0.clone()
    }
}

/// Logs each received value at debug level.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn sink(&self, value: &str) {
        debug!(value, "sink received");
    }
}

/// Keeps every received value, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.received.lock().last().cloned()
    }

    /// Whether any received value contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.received.lock().iter().any(|value| value.contains(needle))
    }

    pub fn clear(&self) {
        self.received.lock().clear();
    }
}

impl Sink for RecordingSink {
    fn sink(&self, value: &str) {
        debug!(value, "sink received");
        self.received.lock().push(value.to_owned());
    }
}
