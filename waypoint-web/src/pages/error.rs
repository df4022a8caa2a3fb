use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RecoverableErrorProps {
    pub message: AttrValue,
    pub on_reload: Callback<()>,
    pub on_back: Callback<()>,
}

/// Contained failure screen offering a reload and a way back.
#[function_component(RecoverableError)]
pub fn recoverable_error(props: &RecoverableErrorProps) -> Html {
    let reload = {
        let cb = props.on_reload.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let back = {
        let cb = props.on_back.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <section class="panel error" role="alert">
            <h1>{ "Something went wrong" }</h1>
            <p class="error-detail">{ props.message.clone() }</p>
            <div class="actions">
                <button type="button" class="btn btn-primary" onclick={reload}>{ "Reload" }</button>
                <button type="button" class="btn" onclick={back}>{ "Go back" }</button>
            </div>
        </section>
    }
}
