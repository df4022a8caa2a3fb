use waypoint_journey::{FlowGraph, ScreenId};
use yew_router::prelude::*;

/// Browser address of a screen. Every screen id doubles as its path slug.
#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/404")]
    #[not_found]
    NotFound,
    #[at("/:screen")]
    Screen { screen: String },
}

impl Route {
    /// Entry screen lives at the root; the not-found screen at `/404`.
    #[must_use]
    pub fn for_screen(graph: &FlowGraph, screen: &ScreenId) -> Self {
        if screen == graph.entry() {
            Self::Home
        } else if screen == graph.not_found() {
            Self::NotFound
        } else {
            Self::Screen {
                screen: screen.to_string(),
            }
        }
    }

    #[must_use]
    pub fn to_screen(&self, graph: &FlowGraph) -> ScreenId {
        match self {
            Self::Home => graph.entry().clone(),
            Self::NotFound => graph.not_found().clone(),
            Self::Screen { screen } => graph.route_for(screen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_journey::survey::{self, survey_graph};

    #[test]
    fn screens_round_trip_through_routes() {
        let graph = survey_graph().unwrap();
        for node in graph.screens() {
            let route = Route::for_screen(&graph, &node.id);
            assert_eq!(route.to_screen(&graph), node.id);
        }
    }

    #[test]
    fn entry_and_not_found_use_fixed_paths() {
        let graph = survey_graph().unwrap();
        assert_eq!(Route::for_screen(&graph, graph.entry()).to_path(), "/");
        assert_eq!(Route::for_screen(&graph, graph.not_found()).to_path(), "/404");
        assert_eq!(
            Route::for_screen(&graph, &ScreenId::new(survey::REWARD_FORM)).to_path(),
            "/rewardForm"
        );
    }

    #[test]
    fn unknown_slug_maps_to_not_found() {
        let graph = survey_graph().unwrap();
        let route = Route::Screen {
            screen: "admin".to_string(),
        };
        assert_eq!(route.to_screen(&graph), survey::NOT_FOUND);
    }
}
