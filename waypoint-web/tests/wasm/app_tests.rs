use std::time::Duration;
use wasm_bindgen_test::*;
use waypoint_journey::KeyValueStore;
use yew::Renderer;

use waypoint_web::app::App;
use waypoint_web::dom;
use waypoint_web::storage::BrowserStore;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn console_logger_installs_once() {
    waypoint_web::install_logging(log::Level::Info);
    assert_eq!(log::max_level(), log::LevelFilter::Info);
    waypoint_web::install_logging(log::Level::Debug);
    assert_eq!(log::max_level(), log::LevelFilter::Info);
    log::info!("console logger ready");
}

fn ensure_app_root() -> web_sys::Element {
    let doc = dom::document().expect("document");
    if let Some(root) = doc.get_element_by_id("app") {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create app root");
    root.set_id("app");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append app root");
    root
}

fn clear_storage() {
    if let Ok(storage) = dom::local_storage() {
        storage.clear().expect("clear localStorage");
    }
}

#[wasm_bindgen_test]
fn browser_store_round_trips_values() {
    clear_storage();
    let store = BrowserStore;
    store.set("waypoint.test", "value").expect("set");
    assert_eq!(store.get("waypoint.test").expect("get").as_deref(), Some("value"));
    store.remove("waypoint.test").expect("remove");
    assert_eq!(store.get("waypoint.test").expect("get"), None);
}

#[wasm_bindgen_test]
async fn fresh_visit_lands_on_welcome() {
    clear_storage();
    Renderer::<App>::with_root(ensure_app_root()).render();
    yew::platform::time::sleep(Duration::from_millis(50)).await;

    let doc = dom::document().expect("document");
    let heading = doc
        .query_selector("main h1")
        .expect("query heading")
        .expect("heading exists");
    assert_eq!(heading.text_content().as_deref(), Some("Shape your neighbourhood"));
    let session = dom::local_storage()
        .expect("storage")
        .get_item("waypoint.session")
        .expect("read session");
    assert!(session.is_some());
}
