//! The running journey: navigator, drafts and prefetching behind one cloneable handle.

use serde_json::Value;
use std::rc::Rc;
use waypoint_journey::survey::{DESIGN_CUSTOMIZATION, DESIGN_DRAFT};
use waypoint_journey::{
    DraftStore, JourneyConfig, KeyValueStore, ModuleLoader, NavigationIntent, Navigator,
    Prefetcher, ScreenId, Spawner,
};

use crate::pages::design::DesignDraft;

pub struct Engine<S, L> {
    navigator: Rc<Navigator<S>>,
    drafts: Rc<DraftStore<S>>,
    prefetcher: Prefetcher<L>,
    spawner: Rc<dyn Spawner>,
    prefetch_enabled: bool,
}

impl<S, L> Clone for Engine<S, L> {
    fn clone(&self) -> Self {
        Self {
            navigator: Rc::clone(&self.navigator),
            drafts: Rc::clone(&self.drafts),
            prefetcher: self.prefetcher.clone(),
            spawner: Rc::clone(&self.spawner),
            prefetch_enabled: self.prefetch_enabled,
        }
    }
}

impl<S, L> PartialEq for Engine<S, L> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.navigator, &other.navigator)
    }
}

impl<S, L> Engine<S, L>
where
    S: KeyValueStore + Clone + 'static,
    L: ModuleLoader + 'static,
{
    /// Wrap an opened navigator and start warming the modules around its current screen.
    pub fn new(
        navigator: Navigator<S>,
        storage: S,
        config: &JourneyConfig,
        loader: L,
        spawner: Rc<dyn Spawner>,
    ) -> Self {
        let engine = Self {
            navigator: Rc::new(navigator),
            drafts: Rc::new(DraftStore::new(storage, config.clone())),
            prefetcher: Prefetcher::new(loader),
            spawner,
            prefetch_enabled: config.prefetch_enabled,
        };
        if engine.prefetch_enabled {
            let prefetcher = engine.prefetcher.clone();
            let spawner = Rc::clone(&engine.spawner);
            let weak_nav = Rc::downgrade(&engine.navigator);
            engine.navigator.subscribe(move |transition| {
                if let Some(nav) = weak_nav.upgrade() {
                    prefetcher.on_screen_active(nav.graph(), transition.to.as_str(), spawner.as_ref());
                }
            });
            engine.warm(&engine.navigator.current_screen());
        }
        engine
    }

    #[must_use]
    pub const fn navigator(&self) -> &Rc<Navigator<S>> {
        &self.navigator
    }

    #[must_use]
    pub const fn prefetcher(&self) -> &Prefetcher<L> {
        &self.prefetcher
    }

    /// Submit `payload` on behalf of the screen that rendered the control.
    ///
    /// Returns whether the journey moved. Rejected intents (in flight, stale) are dropped.
    pub fn submit(&self, from: &ScreenId, payload: Value) -> bool {
        match self
            .navigator
            .navigate(NavigationIntent::on(from).with_payload(payload))
        {
            Ok(transition) => {
                if transition.from == DESIGN_CUSTOMIZATION {
                    self.clear_design_draft();
                }
                true
            }
            Err(err) => {
                log::debug!("submit dropped: {err}");
                false
            }
        }
    }

    pub fn back(&self) {
        if let Err(err) = self.navigator.back() {
            log::debug!("back dropped: {err}");
        }
    }

    pub fn jump_to(&self, screen: &ScreenId) {
        if let Err(err) = self.navigator.jump_to(screen.as_str()) {
            log::debug!("jump dropped: {err}");
        }
    }

    pub fn go_home(&self) {
        let entry = self.navigator.graph().entry().clone();
        self.jump_to(&entry);
    }

    pub fn restart(&self) {
        self.clear_design_draft();
        if let Err(err) = self.navigator.restart() {
            log::debug!("restart dropped: {err}");
        }
    }

    fn warm(&self, screen: &ScreenId) {
        let spawned =
            self.prefetcher
                .on_screen_active(self.navigator.graph(), screen.as_str(), self.spawner.as_ref());
        log::debug!("warming {spawned} module(s) after '{screen}'");
    }

    #[must_use]
    pub fn design_draft(&self) -> DesignDraft {
        self.drafts.load(DESIGN_DRAFT).unwrap_or_default()
    }

    pub fn save_design_draft(&self, draft: &DesignDraft) {
        if let Err(err) = self.drafts.save(DESIGN_DRAFT, draft) {
            log::warn!("design draft not saved: {err}");
        }
    }

    fn clear_design_draft(&self) {
        if let Err(err) = self.drafts.clear(DESIGN_DRAFT) {
            log::warn!("design draft not cleared: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;
    use std::cell::RefCell;
    use waypoint_journey::survey;
    use waypoint_journey::{BestEffortTask, LoadFuture, MemoryStore, open_survey};

    #[derive(Default)]
    struct CollectingSpawner(RefCell<Vec<String>>);

    impl Spawner for CollectingSpawner {
        fn spawn(&self, task: BestEffortTask) {
            self.0.borrow_mut().push(task.label().to_string());
        }
    }

    struct InstantLoader;

    impl ModuleLoader for InstantLoader {
        fn load(&self, _module: &str) -> LoadFuture {
            async { Ok(()) }.boxed_local()
        }
    }

    fn open_engine(
        storage: MemoryStore,
        config: &JourneyConfig,
    ) -> (Engine<MemoryStore, InstantLoader>, Rc<CollectingSpawner>) {
        let spawner = Rc::new(CollectingSpawner::default());
        let navigator = open_survey(storage.clone(), config.clone(), 42).unwrap();
        let engine = Engine::new(navigator, storage, config, InstantLoader, spawner.clone());
        (engine, spawner)
    }

    #[test]
    fn opening_warms_the_next_screen() {
        let (_engine, spawner) = open_engine(MemoryStore::new(), &JourneyConfig::default());
        assert_eq!(*spawner.0.borrow(), vec!["prefetch:budget".to_string()]);
    }

    #[test]
    fn transitions_warm_branch_targets() {
        let (engine, spawner) = open_engine(MemoryStore::new(), &JourneyConfig::default());
        engine.jump_to(&ScreenId::new(survey::BUDGET_TRADEOFFS));
        let labels = spawner.0.borrow().clone();
        assert!(labels.contains(&"prefetch:community".to_string()));
    }

    #[test]
    fn prefetch_can_be_disabled() {
        let config = JourneyConfig {
            prefetch_enabled: false,
            ..JourneyConfig::default()
        };
        let (engine, spawner) = open_engine(MemoryStore::new(), &config);
        engine.jump_to(&ScreenId::new(survey::MINI_GAME));
        assert!(spawner.0.borrow().is_empty());
    }

    #[test]
    fn second_submit_from_same_render_is_dropped() {
        let (engine, _) = open_engine(MemoryStore::new(), &JourneyConfig::default());
        let welcome = engine.navigator().current_screen();
        assert!(engine.submit(&welcome, json!({ "started": true })));
        assert!(!engine.submit(&welcome, json!({ "started": true })));
        assert_eq!(engine.navigator().current_screen(), survey::BUDGET_PRIORITIES);
    }

    #[test]
    fn design_draft_survives_reload_and_clears_on_submit() {
        let storage = MemoryStore::new();
        let (engine, _) = open_engine(storage.clone(), &JourneyConfig::default());
        engine.jump_to(&ScreenId::new(survey::DESIGN_CUSTOMIZATION));
        let draft = DesignDraft {
            palette: Some("harbour".to_string()),
            motto: "Walk more".to_string(),
        };
        engine.save_design_draft(&draft);

        let (reloaded, _) = open_engine(storage, &JourneyConfig::default());
        assert_eq!(reloaded.design_draft(), draft);

        let from = reloaded.navigator().current_screen();
        assert!(reloaded.submit(&from, draft.to_payload()));
        assert_eq!(reloaded.design_draft(), DesignDraft::default());
        assert_eq!(reloaded.navigator().current_screen(), survey::MINI_GAME);
    }

    #[test]
    fn restart_clears_drafts_and_returns_home() {
        let (engine, _) = open_engine(MemoryStore::new(), &JourneyConfig::default());
        engine.jump_to(&ScreenId::new(survey::DESIGN_CUSTOMIZATION));
        engine.save_design_draft(&DesignDraft {
            palette: None,
            motto: "x".to_string(),
        });
        engine.restart();
        assert_eq!(engine.design_draft(), DesignDraft::default());
        assert_eq!(engine.navigator().current_screen(), survey::WELCOME);
    }
}
