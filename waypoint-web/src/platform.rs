//! Browser implementations of the journey engine's collaborators.

use futures::FutureExt;
use waypoint_journey::{
    AnalyticsError, AnalyticsRecord, AnalyticsSink, BestEffortTask, Clock, LoadError, LoadFuture,
    ModuleLoader, Spawner,
};

use crate::{dom, paths};

/// Writes every analytics record to the console as a structured object.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleAnalytics;

impl AnalyticsSink for ConsoleAnalytics {
    fn emit(&self, record: &AnalyticsRecord) -> Result<(), AnalyticsError> {
        let value = serde_wasm_bindgen::to_value(record)
            .map_err(|err| AnalyticsError(err.to_string()))?;
        web_sys::console::info_2(&wasm_bindgen::JsValue::from_str("analytics"), &value);
        Ok(())
    }
}

/// Warms a screen bundle by fetching it into the HTTP cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchModuleLoader;

impl ModuleLoader for FetchModuleLoader {
    fn load(&self, module: &str) -> LoadFuture {
        let url = paths::module_path(module);
        let module = module.to_string();
        async move {
            let response = dom::fetch_response(&url).await.map_err(|err| LoadError {
                module: module.clone(),
                reason: dom::js_error_message(&err),
            })?;
            if response.ok() {
                Ok(())
            } else {
                Err(LoadError {
                    module,
                    reason: format!("HTTP {}", response.status()),
                })
            }
        }
        .boxed_local()
    }
}

/// Hands best-effort work to the browser's microtask queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSpawner;

impl Spawner for LocalSpawner {
    fn spawn(&self, task: BestEffortTask) {
        log::debug!("spawning {}", task.label());
        wasm_bindgen_futures::spawn_local(task.into_future());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now().max(0.0) as u64
    }
}

/// Seed material for session ids.
#[must_use]
pub fn entropy() -> u64 {
    js_sys::Date::now().to_bits() ^ js_sys::Math::random().to_bits().rotate_left(17)
}
