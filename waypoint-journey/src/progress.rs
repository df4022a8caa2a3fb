use serde::{Deserialize, Serialize};

use crate::graph::FlowGraph;

/// Position of a screen within its progress segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-based.
    pub position: u8,
    pub total: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDot {
    Done,
    Current,
    Upcoming,
}

impl Progress {
    /// One indicator per step in the segment.
    #[must_use]
    pub fn dots(self) -> Vec<StepDot> {
        (1..=self.total)
            .map(|step| match step.cmp(&self.position) {
                std::cmp::Ordering::Less => StepDot::Done,
                std::cmp::Ordering::Equal => StepDot::Current,
                std::cmp::Ordering::Greater => StepDot::Upcoming,
            })
            .collect()
    }

    #[must_use]
    pub const fn is_last(self) -> bool {
        self.position == self.total
    }
}

/// Look up the progress indicator for a screen.
///
/// Screens outside any segment (and unknown screens) have no indicator. The total is
/// the declared segment length, never derived from journey content.
#[must_use]
pub fn resolve_progress(graph: &FlowGraph, screen: &str) -> Option<Progress> {
    let slot = graph.node(screen)?.segment.as_ref()?;
    let segment = graph.segment(&slot.segment)?;
    Some(Progress {
        position: slot.position,
        total: segment.total,
    })
}
