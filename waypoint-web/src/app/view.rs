//! Maps the current screen to its page.

use serde_json::Value;
use std::sync::Arc;
use waypoint_journey::survey::{
    BUDGET_PRIORITIES, BUDGET_TRADEOFFS, CHOICE_KEY, COMMUNITY_VALUES, DESIGN_CUSTOMIZATION,
    FINAL_THANK_YOU, HOUSING_FOLLOW_UP, MINI_GAME, NOT_FOUND, PARTICIPATE, REWARD_DECISION,
    REWARD_FORM, TOP3_KEY, WELCOME,
};
use waypoint_journey::{JourneyData, Progress, ScreenId};
use yew::prelude::*;

use crate::pages::budget::BudgetPage;
use crate::pages::choice::{ChoiceOption, ChoicePage};
use crate::pages::design::{DesignDraft, DesignPage};
use crate::pages::error::RecoverableError;
use crate::pages::mini_game::MiniGamePage;
use crate::pages::not_found::NotFound;
use crate::pages::reward::{RewardDecisionPage, RewardFormPage};
use crate::pages::thanks::ThankYouPage;
use crate::pages::welcome::WelcomePage;

pub const TRADEOFF_FIELD: &str = "tradeoff";
pub const VALUES_FIELD: &str = "values";
pub const TENURE_FIELD: &str = "tenure";

fn tradeoff_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::new("raise-taxes", "Raise local taxes"),
        ChoiceOption::new("cut-services", "Trim other services"),
        ChoiceOption::new("delay-projects", "Delay new projects"),
    ]
}

fn value_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::new("belonging", "A sense of belonging"),
        ChoiceOption::new("opportunity", "Access to opportunity"),
        ChoiceOption::new("sustainability", "A greener city"),
        ChoiceOption::new("safety", "Feeling safe"),
    ]
}

fn tenure_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::new("rent", "I rent"),
        ChoiceOption::new("own", "I own"),
        ChoiceOption::new("other", "Something else"),
    ]
}

#[derive(Properties, PartialEq)]
pub struct ScreenViewProps {
    pub screen: ScreenId,
    pub journey: Arc<JourneyData>,
    #[prop_or_default]
    pub progress: Option<Progress>,
    #[prop_or_default]
    pub can_go_back: bool,
    #[prop_or_default]
    pub design_draft: DesignDraft,
    pub on_submit: Callback<Value>,
    #[prop_or_default]
    pub on_back: Callback<()>,
    #[prop_or_default]
    pub on_restart: Callback<()>,
    #[prop_or_default]
    pub on_go_home: Callback<()>,
    #[prop_or_default]
    pub on_design_draft: Callback<DesignDraft>,
    #[prop_or_default]
    pub on_reload: Callback<()>,
}

fn answered(journey: &JourneyData, screen: &str, field: &str) -> Option<String> {
    journey
        .field(screen, field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Picks saved for `budgetPriorities`, in the order they were made.
#[must_use]
pub fn saved_budget_picks(journey: &JourneyData) -> Vec<String> {
    journey
        .field(BUDGET_PRIORITIES, TOP3_KEY)
        .and_then(Value::as_array)
        .map(|picks| {
            picks
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Whether the participant left an email for the prize draw.
#[must_use]
pub fn entered_draw(journey: &JourneyData) -> bool {
    answered(journey, REWARD_DECISION, CHOICE_KEY).as_deref() == Some(PARTICIPATE)
        && journey.contains(REWARD_FORM)
}

fn choice_screen(
    props: &ScreenViewProps,
    title: &'static str,
    prompt: &'static str,
    field: &'static str,
    options: Vec<ChoiceOption>,
) -> Html {
    html! {
        <ChoicePage
            key={props.screen.as_str().to_string()}
            title={title}
            prompt={Some(AttrValue::Static(prompt))}
            field={field}
            options={options}
            selected={answered(&props.journey, props.screen.as_str(), field)}
            progress={props.progress}
            can_go_back={props.can_go_back}
            on_submit={props.on_submit.clone()}
            on_back={props.on_back.clone()}
        />
    }
}

#[function_component(ScreenView)]
pub fn screen_view(props: &ScreenViewProps) -> Html {
    let on_submit = props.on_submit.clone();
    let on_back = props.on_back.clone();

    match props.screen.as_str() {
        WELCOME => html! { <WelcomePage on_submit={on_submit} /> },
        BUDGET_PRIORITIES => html! {
            <BudgetPage
                initial={saved_budget_picks(&props.journey)}
                progress={props.progress}
                can_go_back={props.can_go_back}
                on_submit={on_submit}
                on_back={on_back}
            />
        },
        BUDGET_TRADEOFFS => choice_screen(
            props,
            "Paying for it",
            "If the budget falls short, what should give?",
            TRADEOFF_FIELD,
            tradeoff_options(),
        ),
        COMMUNITY_VALUES => choice_screen(
            props,
            "What matters most",
            "Which of these best describes what you want from your neighbourhood?",
            VALUES_FIELD,
            value_options(),
        ),
        HOUSING_FOLLOW_UP => choice_screen(
            props,
            "About your home",
            "You picked housing. Which fits your situation?",
            TENURE_FIELD,
            tenure_options(),
        ),
        DESIGN_CUSTOMIZATION => html! {
            <DesignPage
                draft={props.design_draft.clone()}
                progress={props.progress}
                can_go_back={props.can_go_back}
                on_draft={props.on_design_draft.clone()}
                on_submit={on_submit}
                on_back={on_back}
            />
        },
        MINI_GAME => html! {
            <MiniGamePage progress={props.progress} on_complete={on_submit} on_back={on_back} />
        },
        REWARD_DECISION => html! {
            <RewardDecisionPage can_go_back={props.can_go_back} on_submit={on_submit} on_back={on_back} />
        },
        REWARD_FORM => html! {
            <RewardFormPage can_go_back={props.can_go_back} on_submit={on_submit} on_back={on_back} />
        },
        FINAL_THANK_YOU => html! {
            <ThankYouPage
                entered_draw={entered_draw(&props.journey)}
                on_restart={props.on_restart.clone()}
            />
        },
        NOT_FOUND => html! { <NotFound on_go_home={props.on_go_home.clone()} /> },
        other => {
            log::error!("no page registered for screen '{other}'");
            html! {
                <RecoverableError
                    message="This part of the survey could not be shown."
                    on_reload={props.on_reload.clone()}
                    on_back={on_back}
                />
            }
        }
    }
}
