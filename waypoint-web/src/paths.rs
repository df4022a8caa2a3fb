//! Helpers for constructing URLs to static assets that respect the deployment base path.
///
/// When `PUBLIC_URL` is set at compile time (e.g., `/survey` when hosted under a
/// subdirectory), generated URLs are prefixed accordingly. Local builds without
/// `PUBLIC_URL` fall back to root-anchored paths.
#[must_use]
pub fn asset_path(relative: &str) -> String {
    asset_path_with_base(relative, option_env!("PUBLIC_URL").unwrap_or(""))
}

/// Base path for the router. `None` when no base path is configured.
#[must_use]
pub fn router_base() -> Option<String> {
    router_base_with_base(option_env!("PUBLIC_URL").unwrap_or(""))
}

/// Bundle fetched to warm a screen module before it is shown.
#[must_use]
pub fn module_path(module: &str) -> String {
    asset_path(&format!("static/screens/{module}.json"))
}

fn asset_path_with_base(relative: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');
    let rel = relative.trim_start_matches('/');

    if base.is_empty() {
        format!("/{rel}")
    } else {
        format!("{base}/{rel}")
    }
}

fn router_base_with_base(base: &str) -> Option<String> {
    let base = base.trim_end_matches('/').trim();
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_root_prefixed_path_when_base_missing() {
        assert_eq!(asset_path("static/config/journey.json"), "/static/config/journey.json");
        assert_eq!(asset_path("/static/config/journey.json"), "/static/config/journey.json");
    }

    #[test]
    fn builds_paths_with_public_base() {
        assert_eq!(
            asset_path_with_base("static/screens/budget.json", "/survey/"),
            "/survey/static/screens/budget.json"
        );
    }

    #[test]
    fn module_bundles_live_under_screens() {
        assert_eq!(module_path("minigame"), "/static/screens/minigame.json");
    }

    #[test]
    fn router_base_is_trimmed_or_absent() {
        assert_eq!(router_base(), None);
        assert_eq!(router_base_with_base("/survey/"), Some(String::from("/survey")));
        assert_eq!(router_base_with_base("/"), None);
    }
}
