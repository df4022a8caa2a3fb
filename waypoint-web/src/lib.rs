#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod config;
pub mod dom;
pub mod pages;
pub mod paths;
pub mod platform;
pub mod router;
pub mod storage;

/// Route `log` records to the browser console; later calls keep the first logger.
#[cfg(target_arch = "wasm32")]
pub fn install_logging(level: log::Level) {
    if console_log::init_with_level(level).is_err() {
        log::debug!("console logger already installed");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    install_logging(log::Level::Info);
    yew::Renderer::<app::App>::new().render();
}
