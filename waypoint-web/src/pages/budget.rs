use serde_json::Value;
use waypoint_journey::survey::{TOP3_KEY, budget_selection};
use waypoint_journey::{Progress, SelectionError};
use yew::prelude::*;

use super::shell::ScreenShell;

#[derive(Properties, PartialEq)]
pub struct BudgetPageProps {
    /// Picks restored from an earlier visit.
    #[prop_or_default]
    pub initial: Vec<String>,
    #[prop_or_default]
    pub progress: Option<Progress>,
    #[prop_or_default]
    pub can_go_back: bool,
    pub on_submit: Callback<Value>,
    #[prop_or_default]
    pub on_back: Callback<()>,
}

#[must_use]
pub fn option_label(option: &str) -> String {
    let mut chars = option.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[function_component(BudgetPage)]
pub fn budget_page(props: &BudgetPageProps) -> Html {
    let selection = {
        let initial = props.initial.clone();
        use_state(move || budget_selection().with_selected(initial.iter().map(String::as_str)))
    };
    let notice = use_state(|| None::<AttrValue>);

    let toggle = |option: String| {
        let selection = selection.clone();
        let notice = notice.clone();
        Callback::from(move |_| {
            let mut next = (*selection).clone();
            match next.toggle(&option) {
                Ok(_) => {
                    notice.set(None);
                    selection.set(next);
                }
                Err(SelectionError::Full { required }) => {
                    notice.set(Some(format!("You can only pick {required}.").into()));
                }
                Err(err) => log::warn!("budget toggle rejected: {err}"),
            }
        })
    };

    let on_continue = {
        let selection = selection.clone();
        let cb = props.on_submit.clone();
        Callback::from(move |_| {
            if selection.can_advance() {
                cb.emit(selection.to_payload(TOP3_KEY));
            }
        })
    };

    let remaining = selection.remaining();
    html! {
        <ScreenShell
            title="Pick your top three budget priorities"
            progress={props.progress}
            can_go_back={props.can_go_back}
            on_back={props.on_back.clone()}
        >
            <ul class="options budget-options" role="group">
                { for selection.options().iter().map(|option| {
                    let pressed = selection.is_selected(option);
                    html! {
                        <li key={option.clone()}>
                            <button
                                type="button"
                                class={classes!("option", pressed.then_some("selected"))}
                                aria-pressed={pressed.to_string()}
                                onclick={toggle(option.clone())}
                            >
                                { option_label(option) }
                            </button>
                        </li>
                    }
                }) }
            </ul>
            <p class="hint" aria-live="polite">
                { if remaining == 0 { "Ready to continue".to_string() } else { format!("Pick {remaining} more") } }
            </p>
            if let Some(message) = (*notice).clone() {
                <p class="notice" role="status">{ message }</p>
            }
            <button
                type="button"
                class="btn btn-primary"
                disabled={!selection.can_advance()}
                onclick={on_continue}
            >
                { "Continue" }
            </button>
        </ScreenShell>
    }
}

#[cfg(test)]
mod tests {
    use super::option_label;

    #[test]
    fn labels_capitalize_first_letter() {
        assert_eq!(option_label("healthcare"), "Healthcare");
        assert_eq!(option_label(""), "");
    }
}
