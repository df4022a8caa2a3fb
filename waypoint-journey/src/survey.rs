//! The survey journey shipped with Waypoint.

use serde_json::Value;

use crate::composer::Composer;
use crate::graph::{Edge, FlowGraph, GraphError, ScreenId, ScreenNode};
use crate::journey::JourneyData;
use crate::selection::BoundedSelection;

pub const WELCOME: &str = "welcome";
pub const BUDGET_PRIORITIES: &str = "budgetPriorities";
pub const BUDGET_TRADEOFFS: &str = "budgetTradeoffs";
pub const COMMUNITY_VALUES: &str = "communityValues";
pub const HOUSING_FOLLOW_UP: &str = "housingFollowUp";
pub const DESIGN_CUSTOMIZATION: &str = "designCustomization";
pub const MINI_GAME: &str = "miniGame";
pub const REWARD_DECISION: &str = "rewardDecision";
pub const REWARD_FORM: &str = "rewardForm";
pub const FINAL_THANK_YOU: &str = "finalThankYou";
pub const NOT_FOUND: &str = "notFound";

pub const SURVEY_SEGMENT: &str = "survey";
pub const SURVEY_STEPS: u8 = 5;

pub const TOP3_KEY: &str = "top3BudgetChoices";
pub const TOP3_REQUIRED: usize = 3;
pub const BUDGET_OPTIONS: &[&str] = &[
    "housing",
    "transit",
    "parks",
    "schools",
    "safety",
    "libraries",
    "healthcare",
    "arts",
];

pub const CHOICE_KEY: &str = "choice";
pub const PARTICIPATE: &str = "participate";
pub const DECLINE: &str = "decline";

pub const MINI_GAME_STEPS: &[&str] = &["sort", "match", "guess"];

/// Feature name used for design-customization drafts.
pub const DESIGN_DRAFT: &str = "design";

/// `rewardDecision`: `{ "choice": "participate" | "decline" }`.
pub fn reward_branch(payload: &Value, _journey: &JourneyData) -> Option<ScreenId> {
    match payload.get(CHOICE_KEY).and_then(Value::as_str)? {
        PARTICIPATE => Some(ScreenId::new(REWARD_FORM)),
        DECLINE => Some(ScreenId::new(FINAL_THANK_YOU)),
        _ => None,
    }
}

/// `communityValues`: detour through the housing follow-up when housing was a top pick.
pub fn community_branch(_payload: &Value, journey: &JourneyData) -> Option<ScreenId> {
    let picked_housing = journey
        .field(BUDGET_PRIORITIES, TOP3_KEY)
        .and_then(Value::as_array)
        .is_some_and(|picks| picks.iter().any(|p| p.as_str() == Some("housing")));
    let next = if picked_housing {
        HOUSING_FOLLOW_UP
    } else {
        DESIGN_CUSTOMIZATION
    };
    Some(ScreenId::new(next))
}

/// Build and validate the survey graph.
///
/// # Errors
///
/// Returns an error if the declared graph is inconsistent.
pub fn survey_graph() -> Result<FlowGraph, GraphError> {
    FlowGraph::builder()
        .segment(SURVEY_SEGMENT, SURVEY_STEPS)
        .screen(ScreenNode::new(WELCOME, Edge::next(BUDGET_PRIORITIES)).with_module("welcome"))
        .screen(
            ScreenNode::new(BUDGET_PRIORITIES, Edge::next(BUDGET_TRADEOFFS))
                .in_segment(SURVEY_SEGMENT, 1)
                .with_module("budget"),
        )
        .screen(
            ScreenNode::new(BUDGET_TRADEOFFS, Edge::next(COMMUNITY_VALUES))
                .in_segment(SURVEY_SEGMENT, 2)
                .with_module("budget"),
        )
        .screen(
            ScreenNode::new(
                COMMUNITY_VALUES,
                Edge::branch(&[HOUSING_FOLLOW_UP, DESIGN_CUSTOMIZATION], community_branch),
            )
            .in_segment(SURVEY_SEGMENT, 3)
            .with_module("community"),
        )
        .screen(
            ScreenNode::new(HOUSING_FOLLOW_UP, Edge::next(DESIGN_CUSTOMIZATION))
                .with_module("community"),
        )
        .screen(
            ScreenNode::new(DESIGN_CUSTOMIZATION, Edge::next(MINI_GAME))
                .in_segment(SURVEY_SEGMENT, 4)
                .with_module("design"),
        )
        .screen(
            ScreenNode::new(MINI_GAME, Edge::next(REWARD_DECISION))
                .in_segment(SURVEY_SEGMENT, 5)
                .with_module("minigame"),
        )
        .screen(
            ScreenNode::new(
                REWARD_DECISION,
                Edge::branch(&[REWARD_FORM, FINAL_THANK_YOU], reward_branch),
            )
            .with_module("reward"),
        )
        .screen(ScreenNode::new(REWARD_FORM, Edge::next(FINAL_THANK_YOU)).with_module("reward"))
        .screen(ScreenNode::new(FINAL_THANK_YOU, Edge::Terminal).with_module("thanks"))
        .screen(ScreenNode::new(NOT_FOUND, Edge::Terminal))
        .entry(WELCOME)
        .not_found(NOT_FOUND)
        .build()
}

#[must_use]
pub fn budget_selection() -> BoundedSelection {
    BoundedSelection::new(BUDGET_OPTIONS, TOP3_REQUIRED)
}

/// Selection restored from whatever `budgetPriorities` already holds.
#[must_use]
pub fn budget_selection_from(journey: &JourneyData) -> BoundedSelection {
    let previous = journey
        .field(BUDGET_PRIORITIES, TOP3_KEY)
        .and_then(Value::as_array)
        .map(|picks| picks.iter().filter_map(Value::as_str).collect::<Vec<_>>())
        .unwrap_or_default();
    budget_selection().with_selected(previous)
}

#[must_use]
pub fn mini_game_composer() -> Composer {
    Composer::new(MINI_GAME, MINI_GAME_STEPS)
}
