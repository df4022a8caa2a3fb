#[cfg(target_arch = "wasm32")]
use waypoint_web::dom;
use waypoint_journey::survey::{self, survey_graph};
use waypoint_journey::ScreenId;
use waypoint_web::router::Route;
use waypoint_web::storage::BrowserStorageError;
use waypoint_web::{config, paths};
use yew_router::Routable;

#[cfg(target_arch = "wasm32")]
#[test]
fn dom_helpers_handle_missing_window() {
    assert!(dom::window().is_some());
    assert!(dom::document().is_some());
}

#[test]
fn routes_recognize_screen_paths() {
    assert_eq!(Route::recognize("/"), Some(Route::Home));
    assert_eq!(
        Route::recognize("/budgetTradeoffs"),
        Some(Route::Screen {
            screen: survey::BUDGET_TRADEOFFS.to_string()
        })
    );
    assert_eq!(Route::recognize("/a/b/c"), Some(Route::NotFound));
    assert_eq!(Route::Home.to_path(), "/");
    assert_eq!(Route::NotFound.to_path(), "/404");
}

#[test]
fn recognized_paths_resolve_to_graph_screens() {
    let graph = survey_graph().unwrap();
    let resolve = |path: &str| Route::recognize(path).map(|route| route.to_screen(&graph));
    assert_eq!(resolve("/"), Some(ScreenId::new(survey::WELCOME)));
    assert_eq!(resolve("/rewardForm"), Some(ScreenId::new(survey::REWARD_FORM)));
    assert_eq!(resolve("/unknown"), Some(ScreenId::new(survey::NOT_FOUND)));
}

#[test]
fn module_paths_point_at_screen_bundles() {
    assert!(paths::module_path("budget").ends_with("/static/screens/budget.json"));
    assert!(paths::asset_path("favicon.ico").ends_with("/favicon.ico"));
}

#[test]
fn shipped_config_enables_prefetch_and_analytics() {
    let config = config::journey_config();
    assert!(config.prefetch_enabled);
    assert!(config.analytics_enabled);
    assert!(!config.storage_prefix.is_empty());
}

#[test]
fn storage_errors_name_the_key() {
    let err = BrowserStorageError::Rejected {
        key: "waypoint.session".to_string(),
        reason: "QuotaExceededError".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "localStorage rejected 'waypoint.session': QuotaExceededError"
    );
}
