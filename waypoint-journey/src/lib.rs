//! Waypoint Journey Engine
//!
//! Platform-agnostic orchestration for multi-screen survey journeys: session identity,
//! the accumulating journey record, the flow graph and its branch functions, and the
//! navigator that ties them together. No UI or browser dependencies live here.

pub mod analytics;
pub mod composer;
pub mod config;
pub mod graph;
pub mod journey;
pub mod navigator;
pub mod prefetch;
pub mod progress;
pub mod selection;
pub mod session;
pub mod storage;
pub mod survey;

use std::sync::Arc;

// Re-export commonly used types
pub use analytics::{
    AnalyticsError, AnalyticsRecord, AnalyticsSink, Clock, FixedClock, NavigationEvent,
    NoopAnalytics, RecordingAnalytics,
};
#[cfg(not(target_arch = "wasm32"))]
pub use analytics::SystemClock;
pub use composer::{Composer, ComposerBack, ComposerError, ComposerStep};
pub use config::{ConfigError, JourneyConfig};
pub use graph::{
    BranchFn, Edge, EdgeError, FlowGraph, FlowGraphBuilder, GraphError, GraphSummary, ScreenId,
    ScreenNode,
};
pub use journey::JourneyData;
pub use navigator::{NavigationError, NavigationIntent, Navigator, Transition, TransitionKind};
pub use prefetch::{BestEffortTask, LoadError, LoadFuture, ModuleLoader, Prefetcher, Spawner};
pub use progress::{Progress, StepDot, resolve_progress};
pub use selection::{BoundedSelection, SelectionChange, SelectionError};
pub use session::{SessionId, SessionStore};
pub use storage::{DraftError, DraftStore, FlakyStore, MemoryStore, StorageUnavailable};

/// Durable string key-value storage (browser `localStorage`, a file, memory).
pub trait KeyValueStore {
    type Error: std::error::Error + 'static;

    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be stored (quota, disabled storage).
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete a value. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be modified.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Open the shipped survey on top of `storage`, resuming any saved session.
///
/// # Errors
///
/// Returns an error if the survey graph fails validation.
pub fn open_survey<S: KeyValueStore>(
    storage: S,
    config: JourneyConfig,
    entropy: u64,
) -> Result<Navigator<S>, GraphError> {
    let graph = Arc::new(survey::survey_graph()?);
    let store = SessionStore::open(storage, config, entropy);
    Ok(Navigator::new(graph, store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fresh_survey_starts_on_welcome() {
        let nav = open_survey(MemoryStore::new(), JourneyConfig::default(), 1).unwrap();
        assert_eq!(nav.current_screen(), survey::WELCOME);
        assert!(nav.journey_data().is_empty());
        assert!(nav.progress().is_none());
    }

    #[test]
    fn survey_resumes_from_shared_storage() {
        let storage = MemoryStore::new();
        let nav = open_survey(storage.clone(), JourneyConfig::default(), 1).unwrap();
        let id = nav.session_id();
        nav.navigate(NavigationIntent::on(&nav.current_screen()).with_payload(json!({})))
            .unwrap();
        drop(nav);

        let resumed = open_survey(storage, JourneyConfig::default(), 2).unwrap();
        assert_eq!(resumed.session_id(), id);
        assert_eq!(resumed.current_screen(), survey::BUDGET_PRIORITIES);
        assert_eq!(resumed.progress(), Some(Progress { position: 1, total: 5 }));
    }

    #[test]
    fn prefix_isolates_sessions_in_one_store() {
        let storage = MemoryStore::new();
        let config = |prefix: &str| JourneyConfig {
            storage_prefix: prefix.to_string(),
            ..JourneyConfig::default()
        };
        let a = open_survey(storage.clone(), config("pilot"), 1).unwrap();
        let b = open_survey(storage, config("main"), 2).unwrap();
        assert_ne!(a.session_id(), b.session_id());
    }
}
