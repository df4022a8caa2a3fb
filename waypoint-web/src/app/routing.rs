//! Keeps the browser address and the navigator's current screen in step.

use waypoint_journey::{FlowGraph, ScreenId};
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

use crate::router::Route;

/// What the shell must do to reconcile the address bar with the journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSync {
    Idle,
    /// The journey moved; reflect the new screen in the address bar.
    Push(Route),
    /// The address changed (deep link, browser back/forward); move the journey.
    Jump(ScreenId),
}

/// Decide how to reconcile `screen` with `route`.
///
/// `last_screen` is the screen seen on the previous pass; `None` on first mount, where the
/// address wins so deep links land where they point.
#[must_use]
pub fn sync_decision(
    graph: &FlowGraph,
    last_screen: Option<&ScreenId>,
    screen: &ScreenId,
    route: Option<&Route>,
) -> RouteSync {
    let Some(route) = route else {
        return RouteSync::Push(Route::for_screen(graph, screen));
    };
    let addressed = route.to_screen(graph);
    if addressed == *screen {
        return RouteSync::Idle;
    }
    match last_screen {
        Some(last) if last != screen => RouteSync::Push(Route::for_screen(graph, screen)),
        _ => RouteSync::Jump(addressed),
    }
}

#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_route_sync(
    engine: &crate::app::bootstrap::AppEngine,
    screen: &ScreenId,
    navigator: Option<yew_router::prelude::Navigator>,
    route: Option<Route>,
) {
    let last_screen = use_mut_ref(|| None::<ScreenId>);
    let engine = engine.clone();
    use_effect_with((screen.clone(), route), move |(screen, route)| {
        let graph = engine.navigator().graph();
        let previous = last_screen.borrow().clone();
        match sync_decision(graph, previous.as_ref(), screen, route.as_ref()) {
            RouteSync::Idle => {}
            RouteSync::Push(next) => {
                if let Some(nav) = navigator.as_ref() {
                    nav.push(&next);
                }
            }
            RouteSync::Jump(target) => engine.jump_to(&target),
        }
        last_screen.replace(Some(screen.clone()));
    });
}
