#[cfg(target_arch = "wasm32")]
use crate::router::Route;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

#[cfg(target_arch = "wasm32")]
pub mod bootstrap;
pub mod engine;
pub mod routing;
pub mod state;
pub mod view;

pub use engine::Engine;
pub use state::JourneySnapshot;

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::paths::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <AppInner />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(AppInner)]
pub fn app_inner() -> Html {
    let opened = use_memo((), |()| bootstrap::open_engine());
    match &*opened {
        Ok(engine) => html! { <JourneyApp engine={engine.clone()} /> },
        Err(err) => {
            log::error!("survey could not start: {err}");
            html! {
                <crate::pages::error::RecoverableError
                    message="The survey could not be started."
                    on_reload={Callback::from(|()| crate::dom::reload_page())}
                    on_back={Callback::from(|()| crate::dom::history_back())}
                />
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Properties, PartialEq)]
pub struct JourneyAppProps {
    pub engine: bootstrap::AppEngine,
}

#[cfg(target_arch = "wasm32")]
#[function_component(JourneyApp)]
pub fn journey_app(props: &JourneyAppProps) -> Html {
    let engine = &props.engine;
    let snapshot = state::use_journey_snapshot(engine);
    let navigator = use_navigator();
    let route = use_route::<Route>();
    routing::use_route_sync(engine, &snapshot.screen, navigator, route);

    if snapshot.degraded {
        log::debug!("rendering with memory-only session storage");
    }

    let on_submit = {
        let engine = engine.clone();
        let from = snapshot.screen.clone();
        Callback::from(move |payload| {
            engine.submit(&from, payload);
        })
    };
    let on_back = {
        let engine = engine.clone();
        Callback::from(move |()| engine.back())
    };
    let on_restart = {
        let engine = engine.clone();
        Callback::from(move |()| engine.restart())
    };
    let on_go_home = {
        let engine = engine.clone();
        Callback::from(move |()| engine.go_home())
    };
    let on_design_draft = {
        let engine = engine.clone();
        Callback::from(move |draft| engine.save_design_draft(&draft))
    };

    html! {
        <view::ScreenView
            screen={snapshot.screen.clone()}
            journey={snapshot.journey.clone()}
            progress={snapshot.progress}
            can_go_back={snapshot.can_go_back}
            design_draft={engine.design_draft()}
            {on_submit}
            {on_back}
            {on_restart}
            {on_go_home}
            {on_design_draft}
            on_reload={Callback::from(|()| crate::dom::reload_page())}
        />
    }
}
