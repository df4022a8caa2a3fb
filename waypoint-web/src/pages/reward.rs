use regex::Regex;
use serde_json::{Value, json};
use std::sync::OnceLock;
use waypoint_journey::survey::{CHOICE_KEY, DECLINE, PARTICIPATE};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::shell::ScreenShell;

#[derive(Properties, PartialEq)]
pub struct RewardDecisionPageProps {
    #[prop_or_default]
    pub can_go_back: bool,
    pub on_submit: Callback<Value>,
    #[prop_or_default]
    pub on_back: Callback<()>,
}

#[function_component(RewardDecisionPage)]
pub fn reward_decision_page(props: &RewardDecisionPageProps) -> Html {
    let choose = |choice: &'static str| {
        let cb = props.on_submit.clone();
        Callback::from(move |_| cb.emit(json!({ CHOICE_KEY: choice })))
    };
    html! {
        <ScreenShell
            title="Enter the prize draw?"
            can_go_back={props.can_go_back}
            on_back={props.on_back.clone()}
        >
            <p>{ "Leave an email address and you could win a local gift card." }</p>
            <div class="actions">
                <button type="button" class="btn btn-primary" onclick={choose(PARTICIPATE)}>
                    { "Yes, enter me" }
                </button>
                <button type="button" class="btn" onclick={choose(DECLINE)}>
                    { "No thanks" }
                </button>
            </div>
        </ScreenShell>
    }
}

static EMAIL_SHAPE: OnceLock<Option<Regex>> = OnceLock::new();

/// Loose shape check; the backend does the real validation.
#[must_use]
pub fn looks_like_email(candidate: &str) -> bool {
    EMAIL_SHAPE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(candidate.trim()))
}

#[derive(Properties, PartialEq)]
pub struct RewardFormPageProps {
    #[prop_or_default]
    pub can_go_back: bool,
    pub on_submit: Callback<Value>,
    #[prop_or_default]
    pub on_back: Callback<()>,
}

#[function_component(RewardFormPage)]
pub fn reward_form_page(props: &RewardFormPageProps) -> Html {
    let email = use_state(String::new);
    let on_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };
    let valid = looks_like_email(&email);
    let on_send = {
        let email = email.clone();
        let cb = props.on_submit.clone();
        Callback::from(move |_| {
            if looks_like_email(&email) {
                cb.emit(json!({ "email": email.trim() }));
            }
        })
    };
    html! {
        <ScreenShell
            title="Your details"
            can_go_back={props.can_go_back}
            on_back={props.on_back.clone()}
        >
            <label for="email">{ "Email address" }</label>
            <input id="email" type="email" autocomplete="email" value={(*email).clone()} oninput={on_input} />
            if !email.is_empty() && !valid {
                <p class="notice" role="status">{ "That doesn't look like an email address." }</p>
            }
            <button type="button" class="btn btn-primary" disabled={!valid} onclick={on_send}>
                { "Enter the draw" }
            </button>
        </ScreenShell>
    }
}

#[cfg(test)]
mod tests {
    use super::looks_like_email;

    #[test]
    fn email_shape_check() {
        assert!(looks_like_email("someone@example.org"));
        assert!(looks_like_email("  a@b.co "));
        assert!(!looks_like_email("someone"));
        assert!(!looks_like_email("@example.org"));
        assert!(!looks_like_email("someone@localhost"));
        assert!(!looks_like_email("someone@example."));
        assert!(!looks_like_email("someone@.org"));
        assert!(!looks_like_email("some one@example.org"));
    }
}
