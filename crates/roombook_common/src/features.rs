//! Runtime feature checks.
//!
//! Optional behaviour is switched on by a `use_*` flag together with its
//! configuration section. Both must be present for the feature to run.

use roombook_config::AppConfig;

/// `true` when the flag is set and the feature's section is configured.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the background release of unchecked meetings should run.
pub fn is_auto_release_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_auto_release, config.auto_release.as_ref())
}
