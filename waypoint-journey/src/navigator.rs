//! The navigator: merges submitted step data, resolves the next screen, and commits the
//! transition.
//!
//! All state lives behind `Cell`/`RefCell`, so a navigator is shared by reference among UI
//! callbacks on one thread. An explicit in-flight flag rejects intents that arrive while a
//! transition is being committed, and intents carry the screen that issued them so a
//! duplicate trigger from an already-departed screen is rejected as stale.

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::KeyValueStore;
use crate::analytics::{
    AnalyticsRecord, AnalyticsSink, Clock, FixedClock, NavigationEvent, NoopAnalytics,
};
use crate::graph::{FlowGraph, ScreenId};
use crate::journey::JourneyData;
use crate::progress::Progress;
use crate::session::{SessionId, SessionStore};

/// A screen's request to move on.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationIntent {
    /// Screen that issued the intent.
    pub from: ScreenId,
    /// Explicit next screen; overrides the graph edge when present.
    pub target: Option<ScreenId>,
    pub payload: Option<Value>,
}

impl NavigationIntent {
    #[must_use]
    pub fn on(screen: &ScreenId) -> Self {
        Self {
            from: screen.clone(),
            target: None,
            payload: None,
        }
    }

    #[must_use]
    pub fn to(mut self, target: &str) -> Self {
        self.target = Some(ScreenId::new(target));
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Forward,
    Back,
    Jump,
    Restart,
}

/// A committed screen change, as seen by listeners and callers.
#[derive(Debug, Clone)]
pub struct Transition {
    pub kind: TransitionKind,
    pub from: ScreenId,
    pub to: ScreenId,
    /// Record after the merge; the new screen renders from this.
    pub journey: Arc<JourneyData>,
    /// Present for forward transitions only.
    pub event: Option<NavigationEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("intent from '{0}' rejected: a transition is already in flight")]
    InFlight(ScreenId),
    #[error("stale intent from '{from}': current screen is '{current}'")]
    Stale { from: ScreenId, current: ScreenId },
}

pub type Listener = Rc<dyn Fn(&Transition)>;

struct InFlightGuard<'a>(&'a Cell<bool>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct Navigator<S> {
    graph: Arc<FlowGraph>,
    store: RefCell<SessionStore<S>>,
    current: RefCell<ScreenId>,
    in_flight: Cell<bool>,
    analytics: Box<dyn AnalyticsSink>,
    clock: Box<dyn Clock>,
    listeners: RefCell<Vec<Listener>>,
}

impl<S: KeyValueStore> Navigator<S> {
    /// Position the navigator on the screen the store remembers, or the entry screen.
    /// Restored back-history is pruned to screens the graph still declares.
    pub fn new(graph: Arc<FlowGraph>, mut store: SessionStore<S>) -> Self {
        store.retain_history(|id| graph.contains(id.as_str()));
        let current = match store.current_screen() {
            Some(saved) if graph.contains(saved.as_str()) => saved.clone(),
            Some(saved) => {
                log::warn!("saved screen '{saved}' no longer exists; starting at entry");
                graph.entry().clone()
            }
            None => graph.entry().clone(),
        };
        Self {
            graph,
            store: RefCell::new(store),
            current: RefCell::new(current),
            in_flight: Cell::new(false),
            analytics: Box::new(NoopAnalytics),
            clock: Box::new(FixedClock(0)),
            listeners: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_analytics(mut self, sink: impl AnalyticsSink + 'static) -> Self {
        self.analytics = Box::new(sink);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Register a callback run after every committed transition, inside the in-flight window.
    pub fn subscribe(&self, listener: impl Fn(&Transition) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Merge the intent's payload under the current screen, then move to the resolved target.
    ///
    /// An explicit target that is not in the graph, and any unresolvable edge, lands on the
    /// not-found screen. Analytics emission is best-effort.
    ///
    /// # Errors
    ///
    /// Returns an error, without touching any state, if another transition is in flight or
    /// the intent was issued by a screen that is no longer current.
    pub fn navigate(&self, intent: NavigationIntent) -> Result<Transition, NavigationError> {
        let NavigationIntent {
            from,
            target,
            payload,
        } = intent;
        let _guard = self.enter(&from)?;
        let current = self.current_screen();
        if from != current {
            log::debug!("ignoring stale intent from '{from}' (now on '{current}')");
            return Err(NavigationError::Stale { from, current });
        }

        let resolved = self.resolve_target(&current, target, payload.as_ref());
        let journey = {
            let mut store = self.store.borrow_mut();
            if let Some(payload) = &payload {
                store.merge_step(current.as_str(), payload.clone());
            }
            store.set_current_screen(&resolved);
            store.journey_data()
        };
        self.store.borrow_mut().push_history(current.clone());
        self.current.replace(resolved.clone());
        log::info!("navigated {current} -> {resolved}");

        self.emit_analytics(&current, payload.as_ref());
        let transition = Transition {
            kind: TransitionKind::Forward,
            from: current.clone(),
            to: resolved.clone(),
            journey,
            event: Some(NavigationEvent {
                from: current,
                to: resolved,
                payload,
                timestamp_ms: self.clock.now_ms(),
            }),
        };
        self.notify(&transition);
        Ok(transition)
    }

    /// Return to the previously visited screen. Nothing is merged.
    ///
    /// # Errors
    ///
    /// Returns an error if a transition is in flight.
    pub fn back(&self) -> Result<Option<Transition>, NavigationError> {
        let current = self.current_screen();
        let _guard = self.enter(&current)?;
        let Some(previous) = self.store.borrow_mut().pop_history() else {
            return Ok(None);
        };
        Ok(Some(self.commit_without_merge(
            TransitionKind::Back,
            current,
            previous,
        )))
    }

    /// Show a screen addressed directly (deep link). Unknown screens land on not-found.
    ///
    /// # Errors
    ///
    /// Returns an error if a transition is in flight.
    pub fn jump_to(&self, screen: &str) -> Result<Transition, NavigationError> {
        let current = self.current_screen();
        let _guard = self.enter(&current)?;
        let target = if self.graph.contains(screen) {
            ScreenId::new(screen)
        } else {
            log::warn!("deep link to unknown screen '{screen}'");
            self.graph.not_found().clone()
        };
        Ok(self.commit_without_merge(TransitionKind::Jump, current, target))
    }

    /// Clear the session (new id, empty record) and return to the entry screen.
    ///
    /// # Errors
    ///
    /// Returns an error if a transition is in flight.
    pub fn restart(&self) -> Result<Transition, NavigationError> {
        let current = self.current_screen();
        let _guard = self.enter(&current)?;
        let session = self.store.borrow_mut().reset();
        log::info!("restarted journey as session {session}");
        let entry = self.graph.entry().clone();
        Ok(self.commit_without_merge(TransitionKind::Restart, current, entry))
    }

    #[must_use]
    pub fn current_screen(&self) -> ScreenId {
        self.current.borrow().clone()
    }

    pub fn session_id(&self) -> SessionId {
        self.store.borrow_mut().get_or_create_session()
    }

    #[must_use]
    pub fn journey_data(&self) -> Arc<JourneyData> {
        self.store.borrow().journey_data()
    }

    #[must_use]
    pub fn progress(&self) -> Option<Progress> {
        self.graph.progress(self.current.borrow().as_str())
    }

    #[must_use]
    pub const fn graph(&self) -> &Arc<FlowGraph> {
        &self.graph
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.store.borrow().history().is_empty()
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.store.borrow().is_degraded()
    }

    fn enter(&self, from: &ScreenId) -> Result<InFlightGuard<'_>, NavigationError> {
        if self.in_flight.replace(true) {
            log::debug!("rejecting intent from '{from}' while a transition is in flight");
            return Err(NavigationError::InFlight(from.clone()));
        }
        Ok(InFlightGuard(&self.in_flight))
    }

    fn resolve_target(
        &self,
        current: &ScreenId,
        hint: Option<ScreenId>,
        payload: Option<&Value>,
    ) -> ScreenId {
        match hint {
            Some(hint) if self.graph.contains(hint.as_str()) => hint,
            Some(hint) => {
                log::error!(
                    "'{current}' asked for unknown screen '{hint}'; routing to '{}'",
                    self.graph.not_found()
                );
                self.graph.not_found().clone()
            }
            None => {
                let journey = self.journey_data();
                self.graph
                    .resolve_edge(current.as_str(), payload.unwrap_or(&Value::Null), &journey)
            }
        }
    }

    fn commit_without_merge(
        &self,
        kind: TransitionKind,
        from: ScreenId,
        to: ScreenId,
    ) -> Transition {
        let journey = {
            let mut store = self.store.borrow_mut();
            store.set_current_screen(&to);
            store.journey_data()
        };
        self.current.replace(to.clone());
        log::info!("{kind:?} {from} -> {to}");
        let transition = Transition {
            kind,
            from,
            to,
            journey,
            event: None,
        };
        self.notify(&transition);
        transition
    }

    fn emit_analytics(&self, screen: &ScreenId, payload: Option<&Value>) {
        if !self.store.borrow().config().analytics_enabled {
            return;
        }
        let record = AnalyticsRecord {
            session_id: self.session_id(),
            screen_id: screen.clone(),
            payload: payload.cloned().unwrap_or(Value::Null),
        };
        if let Err(err) = self.analytics.emit(&record) {
            log::warn!("dropping analytics for '{screen}': {err}");
        }
    }

    fn notify(&self, transition: &Transition) {
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(transition);
        }
    }
}
