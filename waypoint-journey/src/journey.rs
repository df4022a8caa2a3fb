use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Accumulated answers for one session, keyed by the step that submitted them.
///
/// Merges are shallow: writing a key replaces that key's payload and never touches
/// any other entry. Keys are only dropped by an explicit session reset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JourneyData {
    steps: BTreeMap<String, Value>,
}

impl JourneyData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an object of step payloads.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize for durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if a payload cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Write `payload` under `step_key`, replacing any earlier submission for that step.
    pub fn merge_step(&mut self, step_key: impl Into<String>, payload: Value) {
        self.steps.insert(step_key.into(), payload);
    }

    #[must_use]
    pub fn get(&self, step_key: &str) -> Option<&Value> {
        self.steps.get(step_key)
    }

    /// Look up one field of a step payload, treating a missing step or field as unanswered.
    #[must_use]
    pub fn field(&self, step_key: &str, field: &str) -> Option<&Value> {
        self.get(step_key).and_then(|payload| payload.get(field))
    }

    #[must_use]
    pub fn contains(&self, step_key: &str) -> bool {
        self.steps.contains_key(step_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.steps.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render the record as a single JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.steps
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
