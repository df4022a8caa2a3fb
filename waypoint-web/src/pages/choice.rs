use serde_json::{Value, json};
use waypoint_journey::Progress;
use yew::prelude::*;

use super::shell::ScreenShell;

#[derive(Clone, PartialEq)]
pub struct ChoiceOption {
    pub value: AttrValue,
    pub label: AttrValue,
}

impl ChoiceOption {
    #[must_use]
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self {
            value: AttrValue::Static(value),
            label: AttrValue::Static(label),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ChoicePageProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub prompt: Option<AttrValue>,
    /// Payload field the chosen value is written to.
    pub field: AttrValue,
    pub options: Vec<ChoiceOption>,
    /// Value chosen on an earlier visit.
    #[prop_or_default]
    pub selected: Option<String>,
    #[prop_or_default]
    pub progress: Option<Progress>,
    #[prop_or_default]
    pub can_go_back: bool,
    pub on_submit: Callback<Value>,
    #[prop_or_default]
    pub on_back: Callback<()>,
}

/// Single-answer question that submits as soon as an option is picked.
#[function_component(ChoicePage)]
pub fn choice_page(props: &ChoicePageProps) -> Html {
    let pick = |value: AttrValue| {
        let cb = props.on_submit.clone();
        let field = props.field.to_string();
        Callback::from(move |_| cb.emit(json!({ field.as_str(): value.as_str() })))
    };
    html! {
        <ScreenShell
            title={props.title.clone()}
            progress={props.progress}
            can_go_back={props.can_go_back}
            on_back={props.on_back.clone()}
        >
            if let Some(prompt) = props.prompt.clone() {
                <p class="prompt">{ prompt }</p>
            }
            <ul class="options" role="group">
                { for props.options.iter().map(|option| {
                    let chosen = props.selected.as_deref() == Some(option.value.as_str());
                    html! {
                        <li key={option.value.to_string()}>
                            <button
                                type="button"
                                class={classes!("option", chosen.then_some("selected"))}
                                aria-pressed={chosen.to_string()}
                                onclick={pick(option.value.clone())}
                            >
                                { option.label.clone() }
                            </button>
                        </li>
                    }
                }) }
            </ul>
        </ScreenShell>
    }
}
