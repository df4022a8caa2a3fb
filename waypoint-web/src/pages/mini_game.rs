use serde_json::{Value, json};
use waypoint_journey::survey::mini_game_composer;
use waypoint_journey::{ComposerBack, ComposerStep, Progress};
use yew::prelude::*;

use super::shell::ScreenShell;

struct GameStep {
    key: &'static str,
    question: &'static str,
    field: &'static str,
    options: &'static [&'static str],
}

const GAME_STEPS: &[GameStep] = &[
    GameStep {
        key: "sort",
        question: "Which project should be built first?",
        field: "first",
        options: &["Bike lanes", "Tree planting", "Bus shelters"],
    },
    GameStep {
        key: "match",
        question: "Which feature belongs in the riverside park?",
        field: "pair",
        options: &["Splash pad", "Dog run", "Community garden"],
    },
    GameStep {
        key: "guess",
        question: "How many street trees were planted last year?",
        field: "guess",
        options: &["120", "450", "900"],
    },
];

fn game_step(key: &str) -> Option<&'static GameStep> {
    GAME_STEPS.iter().find(|step| step.key == key)
}

#[derive(Properties, PartialEq)]
pub struct MiniGamePageProps {
    #[prop_or_default]
    pub progress: Option<Progress>,
    /// Receives the merged answers of every round, once.
    pub on_complete: Callback<Value>,
    /// Back from the first round leaves the game.
    #[prop_or_default]
    pub on_back: Callback<()>,
}

#[function_component(MiniGamePage)]
pub fn mini_game_page(props: &MiniGamePageProps) -> Html {
    let composer = use_state(mini_game_composer);

    let answer = |field: &'static str, value: &'static str| {
        let composer = composer.clone();
        let on_complete = props.on_complete.clone();
        Callback::from(move |_| {
            let mut next = (*composer).clone();
            match next.submit(json!({ field: value })) {
                Ok(ComposerStep::Next(step)) => {
                    log::debug!("mini game advanced to {step}");
                    composer.set(next);
                }
                Ok(ComposerStep::Complete(merged)) => {
                    composer.set(next);
                    on_complete.emit(merged);
                }
                Err(err) => log::debug!("{err}"),
            }
        })
    };

    let on_back = {
        let composer = composer.clone();
        let outer = props.on_back.clone();
        Callback::from(move |()| {
            let mut next = (*composer).clone();
            match next.back() {
                ComposerBack::Stepped(_) => composer.set(next),
                ComposerBack::Exit => outer.emit(()),
            }
        })
    };

    let (round, rounds) = composer.position();
    let body = game_step(composer.current_step()).map_or_else(Html::default, |step| {
        html! {
            <>
                <p class="round">{ format!("Round {round} of {rounds}") }</p>
                <p class="question">{ step.question }</p>
                <ul class="options" role="group">
                    { for step.options.iter().map(|option| html! {
                        <li key={*option}>
                            <button
                                type="button"
                                class="option"
                                disabled={composer.is_complete()}
                                onclick={answer(step.field, *option)}
                            >
                                { *option }
                            </button>
                        </li>
                    }) }
                </ul>
            </>
        }
    });

    html! {
        <ScreenShell title="Mini game" progress={props.progress} can_go_back=true on_back={on_back}>
            { body }
        </ScreenShell>
    }
}
