//! Scripted journeys driven through the core engine against in-memory storage.

use anyhow::{Context, Result, bail, ensure};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde_json::{Value, json};
use std::collections::BTreeSet;

use waypoint_journey::survey::{self, budget_selection, mini_game_composer};
use waypoint_journey::{
    ComposerStep, FlakyStore, JourneyConfig, KeyValueStore, MemoryStore, NavigationError,
    NavigationIntent, Navigator, Progress, RecordingAnalytics, Transition, open_survey,
};

/// Upper bound on intents a single walk may issue before it counts as stuck.
const MAX_WALK_STEPS: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx {
    pub seed: u64,
    pub verbose: bool,
}

pub type ScenarioFn = fn(&ScenarioCtx) -> Result<()>;

pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    pub run: ScenarioFn,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        key: "smoke",
        description: "Happy path from welcome to the thank-you screen",
        run: smoke,
    },
    Scenario {
        key: "reward-participate",
        description: "Opt into the prize draw and leave an email",
        run: reward_participate,
    },
    Scenario {
        key: "reward-decline",
        description: "Decline the prize draw and skip the form",
        run: reward_decline,
    },
    Scenario {
        key: "housing-detour",
        description: "Housing in the top three inserts the follow-up screen",
        run: housing_detour,
    },
    Scenario {
        key: "double-submit",
        description: "A second submit from the same render is dropped",
        run: double_submit,
    },
    Scenario {
        key: "deep-link",
        description: "Direct addresses land on their screen or on not-found",
        run: deep_link,
    },
    Scenario {
        key: "storage-outage",
        description: "Quota exhaustion and disabled storage degrade to memory",
        run: storage_outage,
    },
    Scenario {
        key: "restart",
        description: "Restart issues a new session with an empty record",
        run: restart,
    },
    Scenario {
        key: "random-walk",
        description: "Seeded random answers and back presses always finish",
        run: random_walk,
    },
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.description))
}

pub fn scenario_keys() -> Vec<String> {
    SCENARIOS.iter().map(|s| s.key.to_string()).collect()
}

pub fn get_scenario(name: &str) -> Option<&'static Scenario> {
    let name = name.to_lowercase();
    SCENARIOS.iter().find(|s| s.key == name)
}

fn open(ctx: &ScenarioCtx) -> Result<Navigator<MemoryStore>> {
    open_survey(MemoryStore::new(), JourneyConfig::default(), ctx.seed)
        .context("survey graph rejected")
}

fn submit<S: KeyValueStore>(nav: &Navigator<S>, payload: Value) -> Result<Transition> {
    let from = nav.current_screen();
    nav.navigate(NavigationIntent::on(&from).with_payload(payload))
        .with_context(|| format!("submit on '{from}'"))
}

fn expect_screen<S: KeyValueStore>(nav: &Navigator<S>, screen: &str) -> Result<()> {
    let current = nav.current_screen();
    ensure!(current == screen, "expected '{screen}', journey is on '{current}'");
    Ok(())
}

fn expect_progress<S: KeyValueStore>(nav: &Navigator<S>, position: u8) -> Result<()> {
    let expected = Some(Progress {
        position,
        total: survey::SURVEY_STEPS,
    });
    let actual = nav.progress();
    ensure!(
        actual == expected,
        "progress on '{}' was {actual:?}, expected {expected:?}",
        nav.current_screen()
    );
    Ok(())
}

fn pick_budget<S: KeyValueStore>(nav: &Navigator<S>, top3: &[&str]) -> Result<()> {
    let mut selection = budget_selection();
    for pick in top3 {
        selection.toggle(pick)?;
    }
    ensure!(selection.can_advance(), "selection {top3:?} cannot advance");
    submit(nav, selection.to_payload(survey::TOP3_KEY))?;
    Ok(())
}

fn play_mini_game<S: KeyValueStore>(nav: &Navigator<S>) -> Result<()> {
    let mut composer = mini_game_composer();
    let mut completions = 0;
    for (field, value) in [("first", "Bike lanes"), ("pair", "Dog run"), ("guess", "450")] {
        if let ComposerStep::Complete(merged) = composer.submit(json!({ field: value }))? {
            completions += 1;
            submit(nav, merged)?;
        }
    }
    ensure!(completions == 1, "mini game completed {completions} times");
    Ok(())
}

/// Answer every screen from welcome up to the reward decision.
fn walk_to_reward<S: KeyValueStore>(nav: &Navigator<S>, top3: &[&str]) -> Result<()> {
    expect_screen(nav, survey::WELCOME)?;
    submit(nav, json!({ "started": true }))?;
    expect_progress(nav, 1)?;
    pick_budget(nav, top3)?;
    expect_progress(nav, 2)?;
    submit(nav, json!({ "tradeoff": "delay-projects" }))?;
    expect_progress(nav, 3)?;
    submit(nav, json!({ "values": "belonging" }))?;
    if nav.current_screen() == survey::HOUSING_FOLLOW_UP {
        ensure!(nav.progress().is_none(), "housing follow-up shows progress");
        submit(nav, json!({ "tenure": "rent" }))?;
    }
    expect_progress(nav, 4)?;
    submit(nav, json!({ "palette": "harbour", "motto": "Walk more" }))?;
    expect_progress(nav, 5)?;
    play_mini_game(nav)?;
    expect_screen(nav, survey::REWARD_DECISION)
}

fn smoke(ctx: &ScenarioCtx) -> Result<()> {
    let nav = open(ctx)?;
    ensure!(nav.progress().is_none(), "welcome shows progress");
    walk_to_reward(&nav, &["parks", "transit", "arts"])?;
    submit(&nav, json!({ survey::CHOICE_KEY: survey::DECLINE }))?;
    expect_screen(&nav, survey::FINAL_THANK_YOU)?;
    ensure!(nav.progress().is_none(), "thank-you shows progress");
    let journey = nav.journey_data();
    for step in [
        survey::WELCOME,
        survey::BUDGET_PRIORITIES,
        survey::BUDGET_TRADEOFFS,
        survey::COMMUNITY_VALUES,
        survey::DESIGN_CUSTOMIZATION,
        survey::MINI_GAME,
        survey::REWARD_DECISION,
    ] {
        ensure!(journey.contains(step), "journey is missing '{step}'");
    }
    Ok(())
}

fn reward_participate(ctx: &ScenarioCtx) -> Result<()> {
    let nav = open(ctx)?;
    walk_to_reward(&nav, &["schools", "parks", "safety"])?;
    submit(&nav, json!({ survey::CHOICE_KEY: survey::PARTICIPATE }))?;
    expect_screen(&nav, survey::REWARD_FORM)?;
    submit(&nav, json!({ "email": "someone@example.org" }))?;
    expect_screen(&nav, survey::FINAL_THANK_YOU)?;
    let journey = nav.journey_data();
    ensure!(
        journey.field(survey::REWARD_FORM, "email") == Some(&json!("someone@example.org")),
        "email not recorded"
    );
    Ok(())
}

fn reward_decline(ctx: &ScenarioCtx) -> Result<()> {
    let nav = open(ctx)?;
    walk_to_reward(&nav, &["schools", "parks", "safety"])?;
    submit(&nav, json!({ survey::CHOICE_KEY: survey::DECLINE }))?;
    expect_screen(&nav, survey::FINAL_THANK_YOU)?;
    ensure!(
        !nav.journey_data().contains(survey::REWARD_FORM),
        "declined journey visited the reward form"
    );
    Ok(())
}

fn housing_detour(ctx: &ScenarioCtx) -> Result<()> {
    let nav = open(ctx)?;
    walk_to_reward(&nav, &["housing", "transit", "arts"])?;
    ensure!(
        nav.journey_data().contains(survey::HOUSING_FOLLOW_UP),
        "housing pick skipped the follow-up"
    );

    let other = open(&ScenarioCtx {
        seed: ctx.seed.wrapping_add(1),
        ..*ctx
    })?;
    walk_to_reward(&other, &["libraries", "transit", "arts"])?;
    ensure!(
        !other.journey_data().contains(survey::HOUSING_FOLLOW_UP),
        "follow-up shown without a housing pick"
    );
    Ok(())
}

fn double_submit(ctx: &ScenarioCtx) -> Result<()> {
    let nav = open(ctx)?;
    let rendered = nav.current_screen();
    let intent = || NavigationIntent::on(&rendered).with_payload(json!({ "started": true }));
    nav.navigate(intent()).context("first submit")?;
    match nav.navigate(intent()) {
        Err(NavigationError::Stale { .. }) => {}
        Err(other) => bail!("second submit failed with {other}"),
        Ok(transition) => bail!("second submit moved the journey to '{}'", transition.to),
    }
    expect_screen(&nav, survey::BUDGET_PRIORITIES)?;
    ensure!(nav.journey_data().len() == 1, "duplicate submit merged twice");
    Ok(())
}

fn deep_link(ctx: &ScenarioCtx) -> Result<()> {
    let nav = open(ctx)?;
    nav.jump_to(survey::REWARD_FORM)?;
    expect_screen(&nav, survey::REWARD_FORM)?;
    nav.jump_to("nowhere")?;
    expect_screen(&nav, survey::NOT_FOUND)?;
    ensure!(nav.journey_data().is_empty(), "jumps merged answers");

    let graph = nav.graph();
    ensure!(
        graph.route_for("/budgetTradeoffs") == survey::BUDGET_TRADEOFFS,
        "path did not resolve to its screen"
    );
    ensure!(graph.route_for("/") == survey::WELCOME, "root is not the entry");
    Ok(())
}

fn storage_outage(ctx: &ScenarioCtx) -> Result<()> {
    let flaky = FlakyStore::with_quota(2);
    let analytics = RecordingAnalytics::new();
    let nav = open_survey(flaky, JourneyConfig::default(), ctx.seed)
        .context("survey graph rejected")?
        .with_analytics(analytics.clone());
    walk_to_reward(&nav, &["parks", "transit", "arts"])?;
    submit(&nav, json!({ survey::CHOICE_KEY: survey::DECLINE }))?;
    expect_screen(&nav, survey::FINAL_THANK_YOU)?;
    ensure!(nav.is_degraded(), "quota exhaustion did not degrade the store");
    ensure!(
        analytics.records().len() == nav.journey_data().len(),
        "analytics recorded {} submits for {} steps",
        analytics.records().len(),
        nav.journey_data().len()
    );

    let disabled = open_survey(FlakyStore::disabled(), JourneyConfig::default(), ctx.seed)
        .context("survey graph rejected")?;
    expect_screen(&disabled, survey::WELCOME)?;
    submit(&disabled, json!({ "started": true }))?;
    expect_screen(&disabled, survey::BUDGET_PRIORITIES)?;
    ensure!(disabled.is_degraded(), "disabled storage not reported");
    Ok(())
}

fn restart(ctx: &ScenarioCtx) -> Result<()> {
    let nav = open(ctx)?;
    let before = nav.session_id();
    walk_to_reward(&nav, &["parks", "transit", "arts"])?;
    nav.restart()?;
    expect_screen(&nav, survey::WELCOME)?;
    ensure!(nav.journey_data().is_empty(), "restart kept answers");
    ensure!(nav.session_id() != before, "restart kept the session id");
    ensure!(!nav.can_go_back(), "restart kept history");
    Ok(())
}

/// Answer whatever screen is current with seeded random choices.
fn random_answer<S: KeyValueStore>(nav: &Navigator<S>, rng: &mut ChaCha20Rng) -> Result<()> {
    let screen = nav.current_screen();
    match screen.as_str() {
        survey::BUDGET_PRIORITIES => {
            let picks: Vec<&str> = survey::BUDGET_OPTIONS
                .choose_multiple(rng, survey::TOP3_REQUIRED)
                .copied()
                .collect();
            pick_budget(nav, &picks)
        }
        survey::MINI_GAME => play_mini_game(nav),
        survey::REWARD_DECISION => {
            let choice = if rng.gen_bool(0.5) {
                survey::PARTICIPATE
            } else {
                survey::DECLINE
            };
            submit(nav, json!({ survey::CHOICE_KEY: choice })).map(drop)
        }
        survey::REWARD_FORM => submit(nav, json!({ "email": "walker@example.org" })).map(drop),
        _ => submit(nav, json!({ "answer": rng.gen_range(0..10) })).map(drop),
    }
}

fn random_walk(ctx: &ScenarioCtx) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(ctx.seed);
    let nav = open(ctx)?;
    let mut visited = BTreeSet::from([nav.current_screen().to_string()]);

    for step in 0..MAX_WALK_STEPS {
        let current = nav.current_screen();
        if current == survey::FINAL_THANK_YOU {
            if ctx.verbose {
                log::info!("random walk finished after {step} intents");
            }
            let journey = nav.journey_data();
            for key in journey.keys() {
                ensure!(visited.contains(key), "answer recorded for unvisited '{key}'");
            }
            return Ok(());
        }
        ensure!(current != survey::NOT_FOUND, "random walk hit not-found");
        if nav.can_go_back() && rng.gen_ratio(1, 6) {
            nav.back()?;
        } else {
            random_answer(&nav, &mut rng)?;
        }
        visited.insert(nav.current_screen().to_string());
    }
    bail!(
        "random walk did not finish within {MAX_WALK_STEPS} intents (on '{}')",
        nav.current_screen()
    )
}
