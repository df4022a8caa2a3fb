use serde::{Deserialize, Serialize};
use serde_json::Value;
use waypoint_journey::Progress;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::shell::ScreenShell;

pub const PALETTES: &[&str] = &["forest", "harbour", "sunset"];

/// Work-in-progress answers for the design screen, kept outside the journey record
/// until the screen is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignDraft {
    pub palette: Option<String>,
    pub motto: String,
}

impl DesignDraft {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.palette.is_some() && !self.motto.trim().is_empty()
    }

    #[must_use]
    pub fn to_payload(&self) -> Value {
        serde_json::json!({
            "palette": self.palette,
            "motto": self.motto.trim(),
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct DesignPageProps {
    #[prop_or_default]
    pub draft: DesignDraft,
    #[prop_or_default]
    pub progress: Option<Progress>,
    #[prop_or_default]
    pub can_go_back: bool,
    /// Fired on every edit so the draft survives a reload.
    #[prop_or_default]
    pub on_draft: Callback<DesignDraft>,
    pub on_submit: Callback<Value>,
    #[prop_or_default]
    pub on_back: Callback<()>,
}

#[function_component(DesignPage)]
pub fn design_page(props: &DesignPageProps) -> Html {
    let draft = {
        let initial = props.draft.clone();
        use_state(move || initial)
    };

    let update = {
        let draft = draft.clone();
        let on_draft = props.on_draft.clone();
        move |next: DesignDraft| {
            on_draft.emit(next.clone());
            draft.set(next);
        }
    };

    let pick_palette = |palette: &'static str| {
        let draft = draft.clone();
        let update = update.clone();
        Callback::from(move |_| {
            update(DesignDraft {
                palette: Some(palette.to_string()),
                ..(*draft).clone()
            });
        })
    };

    let on_motto = {
        let draft = draft.clone();
        let update = update.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            update(DesignDraft {
                motto: input.value(),
                ..(*draft).clone()
            });
        })
    };

    let on_continue = {
        let draft = draft.clone();
        let cb = props.on_submit.clone();
        Callback::from(move |_| {
            if draft.is_complete() {
                cb.emit(draft.to_payload());
            }
        })
    };

    html! {
        <ScreenShell
            title="Design your street"
            progress={props.progress}
            can_go_back={props.can_go_back}
            on_back={props.on_back.clone()}
        >
            <fieldset class="palettes">
                <legend>{ "Colour palette" }</legend>
                { for PALETTES.iter().map(|palette| {
                    let chosen = draft.palette.as_deref() == Some(*palette);
                    html! {
                        <button
                            key={*palette}
                            type="button"
                            class={classes!("swatch", *palette, chosen.then_some("selected"))}
                            aria-pressed={chosen.to_string()}
                            onclick={pick_palette(*palette)}
                        >
                            { *palette }
                        </button>
                    }
                }) }
            </fieldset>
            <label for="motto">{ "Street motto" }</label>
            <input id="motto" type="text" maxlength="60" value={draft.motto.clone()} oninput={on_motto} />
            <button
                type="button"
                class="btn btn-primary"
                disabled={!draft.is_complete()}
                onclick={on_continue}
            >
                { "Continue" }
            </button>
        </ScreenShell>
    }
}
