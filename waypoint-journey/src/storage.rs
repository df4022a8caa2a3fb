//! Durable key-value storage collaborators.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::KeyValueStore;
use crate::config::JourneyConfig;

/// In-memory storage, shared between clones.
///
/// Used for tests, the headless tester, and as the model of a tab-lifetime session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("storage unavailable: {0}")]
pub struct StorageUnavailable(pub String);

/// Storage that starts failing after a configurable number of successful writes.
///
/// Models quota exhaustion and disabled storage for the degradation paths.
#[derive(Debug, Clone)]
pub struct FlakyStore {
    inner: MemoryStore,
    writes_left: Rc<Cell<usize>>,
    reads_fail: bool,
}

impl FlakyStore {
    /// Every operation fails.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            inner: MemoryStore::new(),
            writes_left: Rc::new(Cell::new(0)),
            reads_fail: true,
        }
    }

    /// Reads succeed; writes succeed `writes` times and then fail with a quota error.
    #[must_use]
    pub fn with_quota(writes: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            writes_left: Rc::new(Cell::new(writes)),
            reads_fail: false,
        }
    }

    #[must_use]
    pub const fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl KeyValueStore for FlakyStore {
    type Error = StorageUnavailable;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        if self.reads_fail {
            return Err(StorageUnavailable("storage disabled".to_string()));
        }
        Ok(self.inner.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let left = self.writes_left.get();
        if left == 0 {
            return Err(StorageUnavailable("quota exceeded".to_string()));
        }
        self.writes_left.set(left - 1);
        self.inner
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        if self.reads_fail {
            return Err(StorageUnavailable("storage disabled".to_string()));
        }
        self.inner.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Per-feature draft state written by leaf screens directly, outside the navigator's merge path.
#[derive(Debug, Clone)]
pub struct DraftStore<S> {
    storage: S,
    config: JourneyConfig,
}

impl<S: KeyValueStore> DraftStore<S> {
    pub const fn new(storage: S, config: JourneyConfig) -> Self {
        Self { storage, config }
    }

    /// Load a draft, treating a missing or unreadable entry as "no draft yet".
    #[must_use]
    pub fn load<T: DeserializeOwned>(&self, feature: &str) -> Option<T> {
        let key = self.config.draft_key(feature);
        let raw = match self.storage.get(&key) {
            Ok(raw) => raw?,
            Err(err) => {
                log::debug!("draft '{feature}' unreadable: {err}");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|err| log::warn!("discarding corrupt draft '{feature}': {err}"))
            .ok()
    }

    /// # Errors
    ///
    /// Returns an error if the draft cannot be serialized or storage rejects the write.
    pub fn save<T: Serialize>(&self, feature: &str, draft: &T) -> Result<(), DraftError> {
        let json = serde_json::to_string(draft)?;
        self.storage
            .set(&self.config.draft_key(feature), &json)
            .map_err(|e| DraftError::Storage(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns an error if storage rejects the removal.
    pub fn clear(&self, feature: &str) -> Result<(), DraftError> {
        self.storage
            .remove(&self.config.draft_key(feature))
            .map_err(|e| DraftError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct DesignDraft {
        color: String,
        motto: String,
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
        other.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn flaky_store_runs_out_of_quota() {
        let store = FlakyStore::with_quota(1);
        assert!(store.set("a", "1").is_ok());
        assert!(store.set("b", "2").is_err());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert!(FlakyStore::disabled().get("a").is_err());
    }

    #[test]
    fn drafts_roundtrip_and_clear() {
        let store = MemoryStore::new();
        let drafts = DraftStore::new(store.clone(), JourneyConfig::default());
        let draft = DesignDraft {
            color: "teal".to_string(),
            motto: "Build it together".to_string(),
        };
        drafts.save("design", &draft).unwrap();
        assert!(store.get("waypoint.draft.design").unwrap().is_some());
        assert_eq!(drafts.load::<DesignDraft>("design"), Some(draft));

        drafts.clear("design").unwrap();
        assert_eq!(drafts.load::<DesignDraft>("design"), None);
    }

    #[test]
    fn corrupt_or_unreadable_drafts_load_as_none() {
        let store = MemoryStore::new();
        store.set("waypoint.draft.design", "{not json").unwrap();
        let drafts = DraftStore::new(store, JourneyConfig::default());
        assert_eq!(drafts.load::<DesignDraft>("design"), None);

        let disabled = DraftStore::new(FlakyStore::disabled(), JourneyConfig::default());
        assert_eq!(disabled.load::<DesignDraft>("design"), None);
        assert!(matches!(
            disabled.save("design", &"x"),
            Err(DraftError::Storage(_))
        ));
    }
}
