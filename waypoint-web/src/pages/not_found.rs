use yew::prelude::*;

/// Shown for unknown addresses and for any transition the flow graph cannot resolve.
#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_go_home: Callback<()>,
}

#[function_component(NotFound)]
pub fn not_found(props: &Props) -> Html {
    let go_home = {
        let cb = props.on_go_home.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <section class="panel not-found" aria-live="assertive">
            <h1>{ "Page not found" }</h1>
            <p>{ "This step does not exist. Your answers so far are still saved." }</p>
            <button type="button" onclick={go_home}>{ "Back to the start" }</button>
        </section>
    }
}
