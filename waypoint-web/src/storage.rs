//! `localStorage`-backed durable store.

use waypoint_journey::KeyValueStore;

use crate::dom;

#[derive(Debug, thiserror::Error)]
pub enum BrowserStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("localStorage rejected '{key}': {reason}")]
    Rejected { key: String, reason: String },
}

/// Handle to the browser's `localStorage`, resolved on every call.
///
/// Private browsing modes may refuse access or throw on writes; both surface as errors and
/// the session store falls back to memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    fn storage() -> Result<web_sys::Storage, BrowserStorageError> {
        dom::local_storage()
            .map_err(|err| BrowserStorageError::Unavailable(dom::js_error_message(&err)))
    }
}

impl KeyValueStore for BrowserStore {
    type Error = BrowserStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Self::storage()?
            .get_item(key)
            .map_err(|err| BrowserStorageError::Rejected {
                key: key.to_string(),
                reason: dom::js_error_message(&err),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| BrowserStorageError::Rejected {
                key: key.to_string(),
                reason: dom::js_error_message(&err),
            })
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        Self::storage()?
            .remove_item(key)
            .map_err(|err| BrowserStorageError::Rejected {
                key: key.to_string(),
                reason: dom::js_error_message(&err),
            })
    }
}
