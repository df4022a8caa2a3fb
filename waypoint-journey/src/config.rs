use serde::{Deserialize, Serialize};

const DEFAULT_PREFIX: &str = "waypoint";
const DEFAULT_HISTORY_LIMIT: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid storage prefix '{0}': use lowercase letters, digits, '-' or '_'")]
    InvalidPrefix(String),
    #[error("history limit must be at least 1")]
    ZeroHistory,
}

/// Runtime knobs for the journey engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyConfig {
    /// Namespace for every durable storage key the engine writes.
    pub storage_prefix: String,
    pub prefetch_enabled: bool,
    pub analytics_enabled: bool,
    /// Maximum screens remembered for back navigation.
    pub history_limit: usize,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_PREFIX.to_string(),
            prefetch_enabled: true,
            analytics_enabled: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl JourneyConfig {
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Parse and validate a configuration document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the storage prefix is not a plain slug or the history limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_prefix_valid(&self.storage_prefix) {
            return Err(ConfigError::InvalidPrefix(self.storage_prefix.clone()));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        Ok(())
    }

    #[must_use]
    pub fn session_key(&self) -> String {
        format!("{}.session", self.storage_prefix)
    }

    #[must_use]
    pub fn journey_key(&self) -> String {
        format!("{}.journey", self.storage_prefix)
    }

    #[must_use]
    pub fn screen_key(&self) -> String {
        format!("{}.screen", self.storage_prefix)
    }

    #[must_use]
    pub fn history_key(&self) -> String {
        format!("{}.history", self.storage_prefix)
    }

    #[must_use]
    pub fn draft_key(&self, feature: &str) -> String {
        format!("{}.draft.{feature}", self.storage_prefix)
    }
}

#[must_use]
pub fn is_prefix_valid(prefix: &str) -> bool {
    regex::Regex::new(r"^[a-z][a-z0-9_-]*$")
        .map(|re| re.is_match(prefix))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config = JourneyConfig::from_json(r#"{ "prefetch_enabled": false }"#).unwrap();
        assert!(!config.prefetch_enabled);
        assert!(config.analytics_enabled);
        assert_eq!(config.storage_prefix, "waypoint");
        assert_eq!(config.history_limit, 64);
    }

    #[test]
    fn rejects_bad_prefix_and_zero_history() {
        assert!(matches!(
            JourneyConfig::from_json(r#"{ "storage_prefix": "Bad Prefix" }"#),
            Err(ConfigError::InvalidPrefix(_))
        ));
        assert!(matches!(
            JourneyConfig::from_json(r#"{ "history_limit": 0 }"#),
            Err(ConfigError::ZeroHistory)
        ));
        assert!(matches!(
            JourneyConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn keys_are_namespaced() {
        let config = JourneyConfig {
            storage_prefix: "civic-survey".to_string(),
            ..JourneyConfig::default()
        };
        assert_eq!(config.session_key(), "civic-survey.session");
        assert_eq!(config.journey_key(), "civic-survey.journey");
        assert_eq!(config.screen_key(), "civic-survey.screen");
        assert_eq!(config.draft_key("design"), "civic-survey.draft.design");
    }
}
