//! Error values delivered by a monitor.

use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Capabilities a monitoring failure exposes to consumers and event-bus
/// routing.
pub trait Fault: Send {
    /// Human-readable message combining the cause and its context.
    fn describe(&self) -> String;

    /// The wrapped failure, for programmatic inspection.
    fn cause(&self) -> &(dyn StdError + Send + Sync);

    /// When the failure occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// A failure observed by a watcher backend while monitoring a directory.
///
/// Pairs the underlying failure with a description of what the backend was
/// doing when it surfaced. Immutable once constructed; the timestamp is
/// fixed at construction time. There is one kind of monitoring failure:
/// backends distinguish situations through the context string, not through
/// structured sub-kinds.
#[derive(Debug, Error)]
#[error("An error occurred while handling monitoring events: {source}, {context}")]
pub struct MonitorError {
    /// The wrapped failure.
    source: Box<dyn StdError + Send + Sync>,

    /// What the backend was doing when the failure surfaced.
    context: String,

    /// When the failure occurred.
    timestamp: DateTime<Utc>,
}

impl MonitorError {
    /// Wrap a failure together with the context it surfaced in.
    pub fn new(
        source: impl Into<Box<dyn StdError + Send + Sync>>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            context: context.into(),
            timestamp: Utc::now(),
        }
    }
}

impl Fault for MonitorError {
    fn describe(&self) -> String {
        self.to_string()
    }

    fn cause(&self) -> &(dyn StdError + Send + Sync) {
        self.source.as_ref()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
