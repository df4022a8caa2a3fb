use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use waypoint_journey::survey::{self, budget_selection, mini_game_composer};
use waypoint_journey::{
    ComposerStep, FlakyStore, JourneyConfig, KeyValueStore, MemoryStore, NavigationIntent,
    Navigator, RecordingAnalytics, SelectionError, open_survey,
};

fn fresh() -> Navigator<MemoryStore> {
    open_survey(MemoryStore::new(), JourneyConfig::default(), 0x5EED).unwrap()
}

fn submit<S: KeyValueStore>(nav: &Navigator<S>, payload: Value) {
    nav.navigate(NavigationIntent::on(&nav.current_screen()).with_payload(payload))
        .unwrap();
}

fn play_mini_game<S: KeyValueStore>(nav: &Navigator<S>) {
    let mut composer = mini_game_composer();
    let mut completions = 0;
    for payload in [json!({ "order": [2, 1, 3] }), json!({ "pairs": 3 }), json!({ "guess": 7 })] {
        if let ComposerStep::Complete(merged) = composer.submit(payload).unwrap() {
            completions += 1;
            submit(nav, merged);
        }
    }
    assert_eq!(completions, 1);
}

fn walk_to_reward<S: KeyValueStore>(nav: &Navigator<S>, top3: &[&str]) {
    submit(nav, json!({ "started": true }));
    let mut selection = budget_selection();
    for pick in top3 {
        selection.toggle(pick).unwrap();
    }
    submit(nav, selection.to_payload(survey::TOP3_KEY));
    submit(nav, json!({ "tradeoff": "parks-over-parking" }));
    submit(nav, json!({ "values": ["equity"] }));
    if nav.current_screen() == survey::HOUSING_FOLLOW_UP {
        submit(nav, json!({ "tenure": "renter" }));
    }
    submit(nav, json!({ "palette": "forest" }));
    play_mini_game(nav);
    assert_eq!(nav.current_screen(), survey::REWARD_DECISION);
}

#[test]
fn participate_leads_to_reward_form_with_choice_recorded() {
    let nav = fresh();
    walk_to_reward(&nav, &["parks", "transit", "arts"]);
    submit(&nav, json!({ "choice": "participate" }));
    assert_eq!(nav.current_screen(), survey::REWARD_FORM);
    assert_eq!(
        nav.journey_data().get(survey::REWARD_DECISION),
        Some(&json!({ "choice": "participate" }))
    );
    submit(&nav, json!({ "email": "someone@example.org" }));
    assert_eq!(nav.current_screen(), survey::FINAL_THANK_YOU);
}

#[test]
fn decline_skips_the_form() {
    let nav = fresh();
    walk_to_reward(&nav, &["parks", "transit", "arts"]);
    submit(&nav, json!({ "choice": "decline" }));
    assert_eq!(nav.current_screen(), survey::FINAL_THANK_YOU);
    assert!(!nav.journey_data().contains(survey::REWARD_FORM));
}

#[test]
fn housing_pick_takes_the_follow_up_detour() {
    let nav = fresh();
    walk_to_reward(&nav, &["housing", "transit", "arts"]);
    assert!(nav.journey_data().contains(survey::HOUSING_FOLLOW_UP));

    let other = fresh();
    walk_to_reward(&other, &["schools", "transit", "arts"]);
    assert!(!other.journey_data().contains(survey::HOUSING_FOLLOW_UP));
}

#[test]
fn budget_screen_needs_exactly_three() {
    let mut selection = budget_selection();
    for pick in ["housing", "parks", "safety"] {
        selection.toggle(pick).unwrap();
    }
    assert!(selection.can_advance());
    assert_eq!(
        selection.toggle("schools").unwrap_err(),
        SelectionError::Full { required: 3 }
    );
    assert_eq!(selection.selected(), ["housing", "parks", "safety"]);

    let nav = fresh();
    submit(&nav, json!({}));
    submit(&nav, selection.to_payload(survey::TOP3_KEY));
    assert_eq!(
        nav.journey_data()
            .field(survey::BUDGET_PRIORITIES, survey::TOP3_KEY),
        Some(&json!(["housing", "parks", "safety"]))
    );
}

#[test]
fn mini_game_merges_once_under_its_own_key() {
    let nav = fresh();
    nav.jump_to(survey::MINI_GAME).unwrap();
    let transitions = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&transitions);
    nav.subscribe(move |_| *counter.borrow_mut() += 1);

    play_mini_game(&nav);

    assert_eq!(*transitions.borrow(), 1);
    assert_eq!(nav.current_screen(), survey::REWARD_DECISION);
    let game = nav.journey_data().get(survey::MINI_GAME).cloned().unwrap();
    let keys: BTreeSet<&str> = game.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, BTreeSet::from(["guess", "match", "sort"]));
}

#[test]
fn progress_tracks_the_survey_segment() {
    let nav = fresh();
    assert!(nav.progress().is_none());
    submit(&nav, json!({}));
    submit(&nav, json!({ "top3BudgetChoices": ["parks", "arts", "schools"] }));
    submit(&nav, json!({}));
    let progress = nav.progress().unwrap();
    assert_eq!((progress.position, progress.total), (3, 5));
}

#[test]
fn full_run_emits_one_analytics_record_per_step() {
    let sink = RecordingAnalytics::new();
    let nav = fresh().with_analytics(sink.clone());
    walk_to_reward(&nav, &["parks", "transit", "arts"]);
    submit(&nav, json!({ "choice": "decline" }));

    let screens: Vec<String> = sink
        .records()
        .iter()
        .map(|r| r.screen_id.to_string())
        .collect();
    assert_eq!(screens.first().map(String::as_str), Some(survey::WELCOME));
    assert_eq!(screens.last().map(String::as_str), Some(survey::REWARD_DECISION));
    assert!(sink.records().iter().all(|r| r.session_id == nav.session_id()));
}

#[test]
fn disabled_storage_still_completes_the_survey() {
    let nav = open_survey(FlakyStore::disabled(), JourneyConfig::default(), 9).unwrap();
    assert!(nav.is_degraded());
    walk_to_reward(&nav, &["housing", "parks", "arts"]);
    submit(&nav, json!({ "choice": "decline" }));
    assert_eq!(nav.current_screen(), survey::FINAL_THANK_YOU);
}

#[test]
fn analytics_can_be_switched_off() {
    let config = JourneyConfig {
        analytics_enabled: false,
        ..JourneyConfig::default()
    };
    let sink = RecordingAnalytics::new();
    let nav = open_survey(MemoryStore::new(), config, 3)
        .unwrap()
        .with_analytics(sink.clone());
    submit(&nav, json!({}));
    assert!(sink.records().is_empty());
}
