//! Declarative flow graph: screens, their progress segments, and their outgoing edges.
//!
//! The graph is built once, validated, and then only read. Edge resolution is pure and
//! synchronous so it can be evaluated speculatively (prefetch) and in tests without a UI.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::journey::JourneyData;
use crate::progress::Progress;

/// Identifier of a screen; also its externally addressable route slug.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(String);

impl ScreenId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Route path for this screen, relative to the router base.
    #[must_use]
    pub fn route_path(&self) -> String {
        format!("/{}", self.0)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScreenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for ScreenId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ScreenId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ScreenId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Pure branch function: `(submitted payload, journey so far) -> next screen`.
///
/// `None` means the payload fell outside the branch's domain.
pub type BranchFn = fn(&Value, &JourneyData) -> Option<ScreenId>;

pub type Targets = SmallVec<[ScreenId; 4]>;

/// Conditional edge with its complete, statically declared outcome set.
#[derive(Debug, Clone)]
pub struct Branch {
    outcomes: Targets,
    resolve: BranchFn,
}

impl Branch {
    #[must_use]
    pub fn outcomes(&self) -> &[ScreenId] {
        &self.outcomes
    }

    #[must_use]
    pub fn evaluate(&self, payload: &Value, journey: &JourneyData) -> Option<ScreenId> {
        (self.resolve)(payload, journey)
    }
}

#[derive(Debug, Clone)]
pub enum Edge {
    Next(ScreenId),
    Branch(Branch),
    Terminal,
}

impl Edge {
    #[must_use]
    pub fn next(target: &str) -> Self {
        Self::Next(ScreenId::new(target))
    }

    #[must_use]
    pub fn branch(outcomes: &[&str], resolve: BranchFn) -> Self {
        Self::Branch(Branch {
            outcomes: outcomes.iter().map(|id| ScreenId::new(*id)).collect(),
            resolve,
        })
    }

    /// Every screen this edge can lead to.
    #[must_use]
    pub fn targets(&self) -> Targets {
        match self {
            Self::Next(target) => smallvec::smallvec![target.clone()],
            Self::Branch(branch) => branch.outcomes.clone(),
            Self::Terminal => Targets::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSlot {
    pub segment: String,
    /// 1-based position within the segment.
    pub position: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub total: u8,
}

#[derive(Debug, Clone)]
pub struct ScreenNode {
    pub id: ScreenId,
    pub segment: Option<SegmentSlot>,
    pub edge: Edge,
    /// Code/asset bundle warmed by the prefetcher before this screen is visited.
    pub module: Option<String>,
}

impl ScreenNode {
    #[must_use]
    pub fn new(id: &str, edge: Edge) -> Self {
        Self {
            id: ScreenId::new(id),
            segment: None,
            edge,
            module: None,
        }
    }

    #[must_use]
    pub fn in_segment(mut self, segment: &str, position: u8) -> Self {
        self.segment = Some(SegmentSlot {
            segment: segment.to_string(),
            position,
        });
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: &str) -> Self {
        self.module = Some(module.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("screen '{0}' is declared more than once")]
    DuplicateScreen(ScreenId),
    #[error("segment '{0}' is declared more than once")]
    DuplicateSegment(String),
    #[error("screen '{from}' has an edge to unknown screen '{to}'")]
    DanglingEdge { from: ScreenId, to: ScreenId },
    #[error("branch on screen '{0}' declares no outcomes")]
    EmptyBranch(ScreenId),
    #[error("screen '{screen}' references unknown segment '{segment}'")]
    UnknownSegment { screen: ScreenId, segment: String },
    #[error("screen '{screen}' sits at position {position} of segment '{segment}' (total {total})")]
    PositionOutOfRange {
        screen: ScreenId,
        segment: String,
        position: u8,
        total: u8,
    },
    #[error("segment '{segment}' position {position} is claimed by more than one screen")]
    DuplicatePosition { segment: String, position: u8 },
    #[error("segment '{segment}' has no screen at position {position}")]
    IncompleteSegment { segment: String, position: u8 },
    #[error("graph has no entry screen")]
    MissingEntry,
    #[error("graph has no not-found screen")]
    MissingNotFound,
    #[error("designated screen '{0}' is not in the graph")]
    UnknownDesignated(ScreenId),
}

/// Why an edge could not be resolved from a given screen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EdgeError {
    #[error("screen '{0}' is not in the graph")]
    UnknownScreen(ScreenId),
    #[error("screen '{0}' is terminal")]
    Terminal(ScreenId),
    #[error("branch on '{0}' has no outcome for the submitted payload")]
    Undefined(ScreenId),
    #[error("branch on '{screen}' returned undeclared outcome '{target}'")]
    Undeclared { screen: ScreenId, target: ScreenId },
}

#[derive(Debug, Default)]
pub struct FlowGraphBuilder {
    nodes: Vec<ScreenNode>,
    segments: Vec<Segment>,
    entry: Option<ScreenId>,
    not_found: Option<ScreenId>,
}

impl FlowGraphBuilder {
    #[must_use]
    pub fn segment(mut self, name: &str, total: u8) -> Self {
        self.segments.push(Segment {
            name: name.to_string(),
            total,
        });
        self
    }

    #[must_use]
    pub fn screen(mut self, node: ScreenNode) -> Self {
        self.nodes.push(node);
        self
    }

    #[must_use]
    pub fn entry(mut self, id: &str) -> Self {
        self.entry = Some(ScreenId::new(id));
        self
    }

    #[must_use]
    pub fn not_found(mut self, id: &str) -> Self {
        self.not_found = Some(ScreenId::new(id));
        self
    }

    /// Validate the table and freeze it.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found: duplicates, dangling edges, malformed
    /// segments, or missing designated screens.
    pub fn build(self) -> Result<FlowGraph, GraphError> {
        let mut segments = BTreeMap::new();
        for segment in self.segments {
            if segments.contains_key(&segment.name) {
                return Err(GraphError::DuplicateSegment(segment.name));
            }
            segments.insert(segment.name.clone(), segment);
        }

        let mut nodes = BTreeMap::new();
        for node in self.nodes {
            if nodes.contains_key(&node.id) {
                return Err(GraphError::DuplicateScreen(node.id));
            }
            nodes.insert(node.id.clone(), node);
        }

        let entry = self.entry.ok_or(GraphError::MissingEntry)?;
        let not_found = self.not_found.ok_or(GraphError::MissingNotFound)?;
        for designated in [&entry, &not_found] {
            if !nodes.contains_key(designated) {
                return Err(GraphError::UnknownDesignated(designated.clone()));
            }
        }

        validate_edges(&nodes)?;
        validate_segments(&nodes, &segments)?;

        Ok(FlowGraph {
            nodes,
            segments,
            entry,
            not_found,
        })
    }
}

fn validate_edges(nodes: &BTreeMap<ScreenId, ScreenNode>) -> Result<(), GraphError> {
    for node in nodes.values() {
        if let Edge::Branch(branch) = &node.edge
            && branch.outcomes.is_empty()
        {
            return Err(GraphError::EmptyBranch(node.id.clone()));
        }
        for target in node.edge.targets() {
            if !nodes.contains_key(&target) {
                return Err(GraphError::DanglingEdge {
                    from: node.id.clone(),
                    to: target,
                });
            }
        }
    }
    Ok(())
}

fn validate_segments(
    nodes: &BTreeMap<ScreenId, ScreenNode>,
    segments: &BTreeMap<String, Segment>,
) -> Result<(), GraphError> {
    let mut claimed: BTreeMap<&str, BTreeSet<u8>> = BTreeMap::new();
    for node in nodes.values() {
        let Some(slot) = &node.segment else {
            continue;
        };
        let segment = segments
            .get(&slot.segment)
            .ok_or_else(|| GraphError::UnknownSegment {
                screen: node.id.clone(),
                segment: slot.segment.clone(),
            })?;
        if slot.position == 0 || slot.position > segment.total {
            return Err(GraphError::PositionOutOfRange {
                screen: node.id.clone(),
                segment: slot.segment.clone(),
                position: slot.position,
                total: segment.total,
            });
        }
        if !claimed
            .entry(segment.name.as_str())
            .or_default()
            .insert(slot.position)
        {
            return Err(GraphError::DuplicatePosition {
                segment: slot.segment.clone(),
                position: slot.position,
            });
        }
    }

    for segment in segments.values() {
        let positions = claimed.get(segment.name.as_str());
        for position in 1..=segment.total {
            if !positions.is_some_and(|set| set.contains(&position)) {
                return Err(GraphError::IncompleteSegment {
                    segment: segment.name.clone(),
                    position,
                });
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FlowGraph {
    nodes: BTreeMap<ScreenId, ScreenNode>,
    segments: BTreeMap<String, Segment>,
    entry: ScreenId,
    not_found: ScreenId,
}

impl FlowGraph {
    #[must_use]
    pub fn builder() -> FlowGraphBuilder {
        FlowGraphBuilder::default()
    }

    #[must_use]
    pub const fn entry(&self) -> &ScreenId {
        &self.entry
    }

    #[must_use]
    pub const fn not_found(&self) -> &ScreenId {
        &self.not_found
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&ScreenNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn screens(&self) -> impl Iterator<Item = &ScreenNode> {
        self.nodes.values()
    }

    #[must_use]
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.get(name)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// Resolve the next screen, reporting why resolution failed.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown or terminal screens, and for branch results that are
    /// undefined or outside the branch's declared outcomes.
    pub fn try_resolve_edge(
        &self,
        current: &str,
        payload: &Value,
        journey: &JourneyData,
    ) -> Result<ScreenId, EdgeError> {
        let node = self
            .nodes
            .get(current)
            .ok_or_else(|| EdgeError::UnknownScreen(ScreenId::new(current)))?;
        match &node.edge {
            Edge::Next(target) => Ok(target.clone()),
            Edge::Terminal => Err(EdgeError::Terminal(node.id.clone())),
            Edge::Branch(branch) => {
                let target = branch
                    .evaluate(payload, journey)
                    .ok_or_else(|| EdgeError::Undefined(node.id.clone()))?;
                if branch.outcomes.contains(&target) {
                    Ok(target)
                } else {
                    Err(EdgeError::Undeclared {
                        screen: node.id.clone(),
                        target,
                    })
                }
            }
        }
    }

    /// Resolve the next screen; any contract violation lands on the not-found screen.
    #[must_use]
    pub fn resolve_edge(&self, current: &str, payload: &Value, journey: &JourneyData) -> ScreenId {
        self.try_resolve_edge(current, payload, journey)
            .unwrap_or_else(|err| {
                log::error!("unresolvable edge: {err}; routing to '{}'", self.not_found);
                self.not_found.clone()
            })
    }

    /// Screens that may follow `current`: the static target or every branch outcome.
    #[must_use]
    pub fn likely_next(&self, current: &str) -> Targets {
        self.nodes
            .get(current)
            .map(|node| node.edge.targets())
            .unwrap_or_default()
    }

    /// Map an external path (`/rewardForm`, `rewardForm/`) back to a screen.
    ///
    /// The root path maps to the entry screen; unknown paths map to not-found.
    #[must_use]
    pub fn route_for(&self, path: &str) -> ScreenId {
        let slug = path.trim().trim_matches('/');
        if slug.is_empty() {
            return self.entry.clone();
        }
        if self.nodes.contains_key(slug) {
            ScreenId::new(slug)
        } else {
            self.not_found.clone()
        }
    }

    #[must_use]
    pub fn progress(&self, id: &str) -> Option<Progress> {
        crate::progress::resolve_progress(self, id)
    }

    /// Stable, serializable description of the graph.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            entry: self.entry.clone(),
            not_found: self.not_found.clone(),
            segments: self.segments.values().cloned().collect(),
            screens: self
                .nodes
                .values()
                .map(|node| ScreenSummary {
                    id: node.id.clone(),
                    segment: node.segment.clone(),
                    kind: match node.edge {
                        Edge::Next(_) => EdgeKind::Next,
                        Edge::Branch(_) => EdgeKind::Branch,
                        Edge::Terminal => EdgeKind::Terminal,
                    },
                    targets: node.edge.targets().into_vec(),
                    module: node.module.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Next,
    Branch,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSummary {
    pub id: ScreenId,
    pub segment: Option<SegmentSlot>,
    pub kind: EdgeKind,
    pub targets: Vec<ScreenId>,
    pub module: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub entry: ScreenId,
    pub not_found: ScreenId,
    pub segments: Vec<Segment>,
    pub screens: Vec<ScreenSummary>,
}
