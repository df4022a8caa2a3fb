use waypoint_journey::Progress;
use yew::prelude::*;

use super::progress::ProgressDots;

#[derive(Properties, PartialEq)]
pub struct ScreenShellProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub progress: Option<Progress>,
    #[prop_or_default]
    pub can_go_back: bool,
    #[prop_or_default]
    pub on_back: Callback<()>,
    #[prop_or_default]
    pub children: Children,
}

/// Common frame: progress indicator, heading, content and an optional back action.
#[function_component(ScreenShell)]
pub fn screen_shell(props: &ScreenShellProps) -> Html {
    let on_back = {
        let cb = props.on_back.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <main id="main" role="main" class="screen">
            <ProgressDots progress={props.progress} />
            <h1>{ props.title.clone() }</h1>
            { for props.children.iter() }
            if props.can_go_back {
                <button type="button" class="btn btn-ghost back" onclick={on_back}>{ "Back" }</button>
            }
        </main>
    }
}
