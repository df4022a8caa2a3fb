use std::sync::OnceLock;
use waypoint_journey::JourneyConfig;

const EMBEDDED: &str = include_str!("../static/config/journey.json");

static CONFIG: OnceLock<JourneyConfig> = OnceLock::new();

/// Deployment configuration, parsed once from the embedded JSON.
pub fn journey_config() -> &'static JourneyConfig {
    CONFIG.get_or_init(|| parse_or_default(EMBEDDED))
}

fn parse_or_default(json: &str) -> JourneyConfig {
    JourneyConfig::from_json(json).unwrap_or_else(|err| {
        log::error!("invalid journey config, using defaults: {err}");
        JourneyConfig::default_config()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        assert_eq!(
            JourneyConfig::from_json(EMBEDDED).unwrap(),
            *journey_config()
        );
    }

    #[test]
    fn broken_config_falls_back_to_defaults() {
        assert_eq!(parse_or_default("{ nope"), JourneyConfig::default_config());
        assert_eq!(
            parse_or_default(r#"{ "storage_prefix": "Bad Prefix" }"#),
            JourneyConfig::default_config()
        );
    }
}
