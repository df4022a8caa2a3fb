//! Opens the browser-backed engine the app runs on.

use std::rc::Rc;
use waypoint_journey::{GraphError, open_survey};

use crate::app::engine::Engine;
use crate::config::journey_config;
use crate::platform::{self, BrowserClock, ConsoleAnalytics, FetchModuleLoader, LocalSpawner};
use crate::storage::BrowserStore;

pub type AppEngine = Engine<BrowserStore, FetchModuleLoader>;

/// Resume (or start) the survey session stored in `localStorage`.
///
/// # Errors
///
/// Returns an error if the shipped survey graph fails validation.
pub fn open_engine() -> Result<AppEngine, GraphError> {
    let config = journey_config();
    let navigator = open_survey(BrowserStore, config.clone(), platform::entropy())?
        .with_analytics(ConsoleAnalytics)
        .with_clock(BrowserClock);
    log::info!(
        "journey opened: session {} on '{}'",
        navigator.session_id(),
        navigator.current_screen()
    );
    Ok(Engine::new(
        navigator,
        BrowserStore,
        config,
        FetchModuleLoader,
        Rc::new(LocalSpawner),
    ))
}
