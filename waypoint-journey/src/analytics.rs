//! Best-effort analytics collaborator and the navigation event it observes.

use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

use crate::graph::ScreenId;
use crate::session::SessionId;

/// Ephemeral record of one forward transition. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationEvent {
    pub from: ScreenId,
    pub to: ScreenId,
    pub payload: Option<Value>,
    pub timestamp_ms: u64,
}

/// What the analytics backend receives for each submitted step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsRecord {
    pub session_id: SessionId,
    pub screen_id: ScreenId,
    pub payload: Value,
}

#[derive(Debug, thiserror::Error)]
#[error("analytics emission failed: {0}")]
pub struct AnalyticsError(pub String);

/// Fire-and-forget sink. Failures are logged by the caller and never affect navigation.
pub trait AnalyticsSink {
    /// # Errors
    ///
    /// Returns an error if the record could not be handed to the backend.
    fn emit(&self, record: &AnalyticsRecord) -> Result<(), AnalyticsError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn emit(&self, _record: &AnalyticsRecord) -> Result<(), AnalyticsError> {
        Ok(())
    }
}

/// Keeps every record in memory; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    records: Rc<RefCell<Vec<AnalyticsRecord>>>,
    failing: bool,
}

impl RecordingAnalytics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose backend is down: every emission errors and nothing is kept.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            records: Rc::default(),
            failing: true,
        }
    }

    #[must_use]
    pub fn records(&self) -> Vec<AnalyticsRecord> {
        self.records.borrow().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn emit(&self, record: &AnalyticsRecord) -> Result<(), AnalyticsError> {
        if self.failing {
            return Err(AnalyticsError("backend unreachable".to_string()));
        }
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

/// Millisecond wall clock used to stamp navigation events.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default()
    }
}
