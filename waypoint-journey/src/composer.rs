//! Sub-flows that own a private sequence of steps inside one outer screen.
//!
//! A composer accumulates its own slice of data and reports completion exactly once; the
//! hosting screen turns that completion into a single outer navigation intent.

use serde_json::{Map, Value};

use crate::journey::JourneyData;

#[derive(Debug, Clone, PartialEq)]
pub enum ComposerStep {
    /// Advanced to the named internal step.
    Next(String),
    /// Final step submitted; carries the merged slice for the outer screen.
    Complete(Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerBack {
    Stepped(String),
    /// Already on the first step; the host should run its outer back action.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposerError {
    #[error("composer '{0}' already completed")]
    AlreadyComplete(String),
}

#[derive(Debug, Clone)]
pub struct Composer {
    key: String,
    steps: Vec<String>,
    index: usize,
    slice: JourneyData,
    completed: bool,
}

impl Composer {
    /// An empty step list behaves as a single step named after the composer.
    #[must_use]
    pub fn new(key: &str, steps: &[&str]) -> Self {
        let mut steps: Vec<String> = steps.iter().map(|s| (*s).to_string()).collect();
        if steps.is_empty() {
            steps.push(key.to_string());
        }
        Self {
            key: key.to_string(),
            steps,
            index: 0,
            slice: JourneyData::new(),
            completed: false,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn current_step(&self) -> &str {
        &self.steps[self.index]
    }

    /// 1-based position and step count.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.steps.len())
    }

    #[must_use]
    pub const fn slice(&self) -> &JourneyData {
        &self.slice
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed
    }

    /// Record `payload` for the current step and advance.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::AlreadyComplete`] once the final step has been submitted.
    pub fn submit(&mut self, payload: Value) -> Result<ComposerStep, ComposerError> {
        if self.completed {
            log::debug!("ignoring submit on completed composer '{}'", self.key);
            return Err(ComposerError::AlreadyComplete(self.key.clone()));
        }
        let step = self.steps[self.index].clone();
        self.slice.merge_step(step, payload);
        if self.index + 1 < self.steps.len() {
            self.index += 1;
            return Ok(ComposerStep::Next(self.current_step().to_string()));
        }
        self.completed = true;
        let merged: Map<String, Value> = self
            .slice
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Ok(ComposerStep::Complete(Value::Object(merged)))
    }

    /// Step back inside the composer; never crosses into the outer history.
    pub fn back(&mut self) -> ComposerBack {
        if self.index == 0 {
            return ComposerBack::Exit;
        }
        self.index -= 1;
        self.completed = false;
        ComposerBack::Stepped(self.current_step().to_string())
    }
}
