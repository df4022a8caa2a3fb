use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ThankYouPageProps {
    pub entered_draw: bool,
    pub on_restart: Callback<()>,
}

#[function_component(ThankYouPage)]
pub fn thank_you_page(props: &ThankYouPageProps) -> Html {
    let restart = {
        let cb = props.on_restart.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <main id="main" role="main" class="screen thanks">
            <h1>{ "Thank you!" }</h1>
            if props.entered_draw {
                <p>{ "You're in the prize draw. We'll be in touch if you win." }</p>
            } else {
                <p>{ "Your answers have been recorded." }</p>
            }
            <button type="button" class="btn" onclick={restart}>{ "Start over" }</button>
        </main>
    }
}
