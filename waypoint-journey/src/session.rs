//! Session identity and the accumulating journey record.
//!
//! The store is the single writer of [`JourneyData`]; readers receive `Arc` snapshots.
//! The bounded back-history is persisted next to it so a reload can still go back.
//! Durable storage is best-effort: the first failed operation flips the store into
//! memory-only mode for the rest of its lifetime.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::KeyValueStore;
use crate::config::JourneyConfig;
use crate::graph::ScreenId;
use crate::journey::JourneyData;

const SESSION_PREFIX: &str = "wp-";

/// Opaque, stable per-tab identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn generate(rng: &mut ChaCha20Rng) -> Self {
        let mut bytes = [0_u8; 16];
        rng.fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("{SESSION_PREFIX}{hex}"))
    }

    fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        trimmed
            .starts_with(SESSION_PREFIX)
            .then(|| Self(trimmed.to_string()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct SessionStore<S> {
    storage: S,
    config: JourneyConfig,
    rng: ChaCha20Rng,
    session: Option<SessionId>,
    journey: Arc<JourneyData>,
    current_screen: Option<ScreenId>,
    history: Vec<ScreenId>,
    degraded: bool,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Restore whatever the durable store holds. No session id is created here.
    ///
    /// `entropy` seeds id generation; platforms supply it (clock bits, `Math.random`).
    pub fn open(storage: S, config: JourneyConfig, entropy: u64) -> Self {
        let mut store = Self {
            storage,
            config,
            rng: ChaCha20Rng::seed_from_u64(entropy),
            session: None,
            journey: Arc::new(JourneyData::new()),
            current_screen: None,
            history: Vec::new(),
            degraded: false,
        };
        store.restore();
        store
    }

    fn restore(&mut self) {
        self.session = self
            .read(&self.config.session_key())
            .and_then(|raw| SessionId::parse(&raw));
        if let Some(raw) = self.read(&self.config.journey_key()) {
            match JourneyData::from_json(&raw) {
                Ok(journey) => self.journey = Arc::new(journey),
                Err(err) => log::warn!("discarding corrupt journey record: {err}"),
            }
        }
        self.current_screen = self.read(&self.config.screen_key()).map(ScreenId::new);
        if let Some(raw) = self.read(&self.config.history_key()) {
            match serde_json::from_str::<Vec<ScreenId>>(&raw) {
                Ok(mut history) => {
                    let limit = self.config.history_limit;
                    if history.len() > limit {
                        history.drain(..history.len() - limit);
                    }
                    self.history = history;
                }
                Err(err) => log::warn!("discarding corrupt back-history: {err}"),
            }
        }
    }

    /// Return the session id, creating and persisting one on first use.
    pub fn get_or_create_session(&mut self) -> SessionId {
        if let Some(id) = &self.session {
            return id.clone();
        }
        let id = SessionId::generate(&mut self.rng);
        log::info!("starting session {id}");
        self.write(&self.config.session_key(), id.as_str());
        self.session = Some(id.clone());
        id
    }

    /// Current id without creating one.
    #[must_use]
    pub const fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// Immutable snapshot of the accumulated record.
    #[must_use]
    pub fn journey_data(&self) -> Arc<JourneyData> {
        Arc::clone(&self.journey)
    }

    /// Write `payload` under `step_key`; other keys are untouched.
    pub fn merge_step(&mut self, step_key: &str, payload: Value) {
        Arc::make_mut(&mut self.journey).merge_step(step_key, payload);
        self.persist_journey();
    }

    /// Clear the record and the screen pointer, and issue a fresh session id.
    pub fn reset(&mut self) -> SessionId {
        self.journey = Arc::new(JourneyData::new());
        self.current_screen = None;
        self.history.clear();
        self.session = None;
        self.delete(&self.config.journey_key());
        self.delete(&self.config.screen_key());
        self.delete(&self.config.history_key());
        self.get_or_create_session()
    }

    #[must_use]
    pub const fn current_screen(&self) -> Option<&ScreenId> {
        self.current_screen.as_ref()
    }

    pub fn set_current_screen(&mut self, screen: &ScreenId) {
        self.current_screen = Some(screen.clone());
        self.write(&self.config.screen_key(), screen.as_str());
    }

    /// Screens visited before the current one, oldest first.
    #[must_use]
    pub fn history(&self) -> &[ScreenId] {
        &self.history
    }

    /// Record `screen` as the way back, dropping the oldest entries past `history_limit`.
    pub fn push_history(&mut self, screen: ScreenId) {
        self.history.push(screen);
        let limit = self.config.history_limit;
        if self.history.len() > limit {
            let overflow = self.history.len() - limit;
            self.history.drain(..overflow);
        }
        self.persist_history();
    }

    pub fn pop_history(&mut self) -> Option<ScreenId> {
        let previous = self.history.pop()?;
        self.persist_history();
        Some(previous)
    }

    /// Drop history entries that fail `keep`, e.g. screens removed from the graph.
    pub fn retain_history(&mut self, keep: impl Fn(&ScreenId) -> bool) {
        let before = self.history.len();
        self.history.retain(|id| keep(id));
        if self.history.len() != before {
            log::warn!(
                "dropped {} unknown screen(s) from the back-history",
                before - self.history.len()
            );
            self.persist_history();
        }
    }

    /// True once durable storage failed and the session lives in memory only.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub const fn config(&self) -> &JourneyConfig {
        &self.config
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn persist_journey(&mut self) {
        match self.journey.to_json() {
            Ok(json) => self.write(&self.config.journey_key(), &json),
            Err(err) => log::warn!("journey record not serializable, keeping it in memory: {err}"),
        }
    }

    fn persist_history(&mut self) {
        match serde_json::to_string(&self.history) {
            Ok(json) => self.write(&self.config.history_key(), &json),
            Err(err) => log::warn!("back-history not serializable, keeping it in memory: {err}"),
        }
    }

    fn read(&mut self, key: &str) -> Option<String> {
        if self.degraded {
            return None;
        }
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                self.degrade(&err);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if self.degraded {
            return;
        }
        if let Err(err) = self.storage.set(key, value) {
            self.degrade(&err);
        }
    }

    fn delete(&mut self, key: &str) {
        if self.degraded {
            return;
        }
        if let Err(err) = self.storage.remove(key) {
            self.degrade(&err);
        }
    }

    fn degrade(&mut self, err: &dyn std::error::Error) {
        log::warn!("durable storage unavailable, continuing in memory: {err}");
        self.degraded = true;
    }
}

impl<S> fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session)
            .field("steps", &self.journey.len())
            .field("current_screen", &self.current_screen)
            .field("history", &self.history.len())
            .field("degraded", &self.degraded)
            .finish_non_exhaustive()
    }
}
