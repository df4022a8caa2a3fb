use serde_json::json;
use serde_json::Value;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct WelcomePageProps {
    pub on_submit: Callback<Value>,
}

#[function_component(WelcomePage)]
pub fn welcome_page(props: &WelcomePageProps) -> Html {
    let on_start = {
        let cb = props.on_submit.clone();
        Callback::from(move |_| cb.emit(json!({ "started": true })))
    };
    html! {
        <main id="main" role="main" class="screen welcome">
            <h1>{ "Shape your neighbourhood" }</h1>
            <p>{ "Five short steps and a quick game. Your answers are saved as you go." }</p>
            <button type="button" class="btn btn-primary" onclick={on_start}>{ "Start" }</button>
        </main>
    }
}
