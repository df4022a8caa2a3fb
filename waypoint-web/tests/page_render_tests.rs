use futures::executor::block_on;
use serde_json::json;
use std::sync::Arc;
use waypoint_journey::survey;
use waypoint_journey::{JourneyData, Progress, ScreenId};
use waypoint_web::app::view::{ScreenView, ScreenViewProps};
use waypoint_web::pages::{
    budget::{BudgetPage, BudgetPageProps},
    choice::{ChoiceOption, ChoicePage, ChoicePageProps},
    design::{DesignDraft, DesignPage, DesignPageProps},
    error::{RecoverableError, RecoverableErrorProps},
    mini_game::{MiniGamePage, MiniGamePageProps},
    not_found::{NotFound, Props as NotFoundProps},
    progress::{ProgressDots, ProgressDotsProps},
    reward::{RewardDecisionPage, RewardDecisionPageProps},
    thanks::{ThankYouPage, ThankYouPageProps},
    welcome::{WelcomePage, WelcomePageProps},
};
use yew::{Callback, LocalServerRenderer};

fn view_props(screen: &str, journey: JourneyData) -> ScreenViewProps {
    ScreenViewProps {
        screen: ScreenId::new(screen),
        journey: Arc::new(journey),
        progress: None,
        can_go_back: true,
        design_draft: DesignDraft::default(),
        on_submit: Callback::noop(),
        on_back: Callback::noop(),
        on_restart: Callback::noop(),
        on_go_home: Callback::noop(),
        on_design_draft: Callback::noop(),
        on_reload: Callback::noop(),
    }
}

fn render_view(props: ScreenViewProps) -> String {
    block_on(LocalServerRenderer::<ScreenView>::with_props(props).render())
}

#[test]
fn welcome_page_offers_start() {
    let props = WelcomePageProps {
        on_submit: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<WelcomePage>::with_props(props).render());
    assert!(html.contains("Shape your neighbourhood"));
    assert!(html.contains("Start"));
}

#[test]
fn progress_dots_mark_current_step() {
    let props = ProgressDotsProps {
        progress: Some(Progress {
            position: 2,
            total: 5,
        }),
    };
    let html = block_on(LocalServerRenderer::<ProgressDots>::with_props(props).render());
    assert!(html.contains("Step 2 of 5"));
    assert_eq!(html.matches("dot done").count(), 1);
    assert_eq!(html.matches("dot current").count(), 1);
    assert_eq!(html.matches("dot upcoming").count(), 3);
}

#[test]
fn progress_dots_render_nothing_outside_segment() {
    let html = block_on(
        LocalServerRenderer::<ProgressDots>::with_props(ProgressDotsProps { progress: None })
            .render(),
    );
    assert!(!html.contains("progress-dots"));
}

#[test]
fn budget_page_blocks_continue_until_three_picks() {
    let props = BudgetPageProps {
        initial: vec!["parks".to_string()],
        progress: Some(Progress {
            position: 1,
            total: 5,
        }),
        can_go_back: true,
        on_submit: Callback::noop(),
        on_back: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<BudgetPage>::with_props(props).render());
    assert!(html.contains("Pick 2 more"));
    assert!(html.contains("disabled"));
    assert!(html.contains("Healthcare"));
    assert!(html.contains("Back"));
}

#[test]
fn budget_page_restores_full_selection() {
    let props = BudgetPageProps {
        initial: vec!["parks".into(), "arts".into(), "housing".into()],
        progress: None,
        can_go_back: false,
        on_submit: Callback::noop(),
        on_back: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<BudgetPage>::with_props(props).render());
    assert!(html.contains("Ready to continue"));
    assert_eq!(html.matches("aria-pressed=\"true\"").count(), 3);
    assert!(!html.contains(">Back<"));
}

#[test]
fn choice_page_highlights_previous_answer() {
    let props = ChoicePageProps {
        title: "About your home".into(),
        prompt: Some("Which fits?".into()),
        field: "tenure".into(),
        options: vec![
            ChoiceOption::new("rent", "I rent"),
            ChoiceOption::new("own", "I own"),
        ],
        selected: Some("own".to_string()),
        progress: None,
        can_go_back: true,
        on_submit: Callback::noop(),
        on_back: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<ChoicePage>::with_props(props).render());
    assert!(html.contains("Which fits?"));
    assert!(html.contains("I rent"));
    assert_eq!(html.matches("aria-pressed=\"true\"").count(), 1);
}

#[test]
fn design_page_renders_saved_draft() {
    let props = DesignPageProps {
        draft: DesignDraft {
            palette: Some("harbour".to_string()),
            motto: "Walk more".to_string(),
        },
        progress: None,
        can_go_back: true,
        on_draft: Callback::noop(),
        on_submit: Callback::noop(),
        on_back: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<DesignPage>::with_props(props).render());
    assert!(html.contains("Design your street"));
    assert!(html.contains("Walk more"));
}

#[test]
fn mini_game_starts_on_first_round() {
    let props = MiniGamePageProps {
        progress: Some(Progress {
            position: 5,
            total: 5,
        }),
        on_complete: Callback::noop(),
        on_back: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<MiniGamePage>::with_props(props).render());
    assert!(html.contains("Round 1 of 3"));
    assert!(html.contains("Which project should be built first?"));
}

#[test]
fn reward_decision_offers_both_choices() {
    let props = RewardDecisionPageProps {
        can_go_back: true,
        on_submit: Callback::noop(),
        on_back: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<RewardDecisionPage>::with_props(props).render());
    assert!(html.contains("Yes, enter me"));
    assert!(html.contains("No thanks"));
}

#[test]
fn thank_you_mentions_draw_only_when_entered() {
    let entered = block_on(
        LocalServerRenderer::<ThankYouPage>::with_props(ThankYouPageProps {
            entered_draw: true,
            on_restart: Callback::noop(),
        })
        .render(),
    );
    assert!(entered.contains("prize draw"));

    let declined = block_on(
        LocalServerRenderer::<ThankYouPage>::with_props(ThankYouPageProps {
            entered_draw: false,
            on_restart: Callback::noop(),
        })
        .render(),
    );
    assert!(declined.contains("Your answers have been recorded."));
}

#[test]
fn not_found_and_error_pages_offer_a_way_out() {
    let html = block_on(
        LocalServerRenderer::<NotFound>::with_props(NotFoundProps {
            on_go_home: Callback::noop(),
        })
        .render(),
    );
    assert!(html.contains("Back to the start"));

    let html = block_on(
        LocalServerRenderer::<RecoverableError>::with_props(RecoverableErrorProps {
            message: "Module failed".into(),
            on_reload: Callback::noop(),
            on_back: Callback::noop(),
        })
        .render(),
    );
    assert!(html.contains("Module failed"));
    assert!(html.contains("Reload"));
}

#[test]
fn screen_view_routes_each_screen_to_its_page() {
    let cases = [
        (survey::WELCOME, "Shape your neighbourhood"),
        (survey::BUDGET_PRIORITIES, "Pick your top three budget priorities"),
        (survey::BUDGET_TRADEOFFS, "Paying for it"),
        (survey::COMMUNITY_VALUES, "What matters most"),
        (survey::HOUSING_FOLLOW_UP, "About your home"),
        (survey::DESIGN_CUSTOMIZATION, "Design your street"),
        (survey::MINI_GAME, "Mini game"),
        (survey::REWARD_DECISION, "Enter the prize draw?"),
        (survey::REWARD_FORM, "Your details"),
        (survey::FINAL_THANK_YOU, "Thank you!"),
        (survey::NOT_FOUND, "Page not found"),
    ];
    for (screen, heading) in cases {
        let html = render_view(view_props(screen, JourneyData::new()));
        assert!(html.contains(heading), "{screen} should render '{heading}'");
    }
}

#[test]
fn screen_view_contains_unregistered_screens() {
    let html = render_view(view_props("mystery", JourneyData::new()));
    assert!(html.contains("Something went wrong"));
}

#[test]
fn screen_view_restores_answers_from_the_journey() {
    let mut journey = JourneyData::new();
    journey.merge_step(
        survey::BUDGET_PRIORITIES,
        json!({ survey::TOP3_KEY: ["schools", "parks", "arts"] }),
    );
    journey.merge_step(survey::BUDGET_TRADEOFFS, json!({ "tradeoff": "delay-projects" }));

    let budget = render_view(view_props(survey::BUDGET_PRIORITIES, journey.clone()));
    assert!(budget.contains("Ready to continue"));

    let tradeoffs = render_view(view_props(survey::BUDGET_TRADEOFFS, journey));
    assert_eq!(tradeoffs.matches("aria-pressed=\"true\"").count(), 1);
}

#[test]
fn thanks_screen_reflects_draw_entry() {
    let mut journey = JourneyData::new();
    journey.merge_step(survey::REWARD_DECISION, json!({ "choice": "participate" }));
    journey.merge_step(survey::REWARD_FORM, json!({ "email": "someone@example.org" }));
    let html = render_view(view_props(survey::FINAL_THANK_YOU, journey));
    assert!(html.contains("prize draw"));
}
