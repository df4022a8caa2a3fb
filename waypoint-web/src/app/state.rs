use std::sync::Arc;
use waypoint_journey::{JourneyData, KeyValueStore, Navigator, Progress, ScreenId};
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

/// Everything the shell renders from, captured after each transition.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneySnapshot {
    pub screen: ScreenId,
    pub journey: Arc<JourneyData>,
    pub progress: Option<Progress>,
    pub can_go_back: bool,
    pub degraded: bool,
}

impl JourneySnapshot {
    #[must_use]
    pub fn capture<S: KeyValueStore>(navigator: &Navigator<S>) -> Self {
        Self {
            screen: navigator.current_screen(),
            journey: navigator.journey_data(),
            progress: navigator.progress(),
            can_go_back: navigator.can_go_back(),
            degraded: navigator.is_degraded(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_journey_snapshot(
    engine: &crate::app::bootstrap::AppEngine,
) -> UseStateHandle<JourneySnapshot> {
    let snapshot = {
        let navigator = std::rc::Rc::clone(engine.navigator());
        use_state(move || JourneySnapshot::capture(&navigator))
    };
    {
        let snapshot = snapshot.clone();
        let engine = engine.clone();
        use_effect_with((), move |()| {
            let weak = std::rc::Rc::downgrade(engine.navigator());
            engine.navigator().subscribe(move |_| {
                if let Some(navigator) = weak.upgrade() {
                    snapshot.set(JourneySnapshot::capture(&navigator));
                }
            });
        });
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use waypoint_journey::survey;
    use waypoint_journey::{JourneyConfig, MemoryStore, NavigationIntent, open_survey};

    #[test]
    fn listener_capture_sees_the_committed_transition() {
        let navigator = Rc::new(open_survey(MemoryStore::new(), JourneyConfig::default(), 4).unwrap());
        let seen: Rc<RefCell<Option<JourneySnapshot>>> = Rc::default();
        {
            let seen = Rc::clone(&seen);
            let weak = Rc::downgrade(&navigator);
            navigator.subscribe(move |_| {
                if let Some(nav) = weak.upgrade() {
                    seen.replace(Some(JourneySnapshot::capture(&nav)));
                }
            });
        }

        navigator
            .navigate(
                NavigationIntent::on(&navigator.current_screen()).with_payload(json!({ "started": true })),
            )
            .unwrap();

        let snapshot = seen.borrow().clone().unwrap();
        assert_eq!(snapshot.screen, survey::BUDGET_PRIORITIES);
        assert!(snapshot.journey.contains(survey::WELCOME));
        assert_eq!(snapshot.progress.map(|p| p.position), Some(1));
        assert!(snapshot.can_go_back);
        assert!(!snapshot.degraded);
    }
}
