//! Integrator-facing block settings.
//!
//! Everything a hosting page may want to tune without touching code:
//! where the configuration resource lives, which payload key gates
//! processing, the unmatched-record policy, and the message trust
//! boundary. All fields have serde defaults so a partial TOML file
//! (or an empty one) yields a working configuration.

use crate::config::UnmatchedPolicy;
use serde::{Deserialize, Serialize};

/// Settings for one announcements block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSettings {
    /// Relative path of the configuration resource, joined to the
    /// integrator's base URL at fetch time.
    #[serde(default = "default_config_path")]
    pub config_path: String,

    /// Payload key that must be present for a message to be processed.
    #[serde(default = "default_required_key")]
    pub required_context_key: String,

    /// Policy for announcements with no configuration entry.
    #[serde(default)]
    pub unmatched_policy: UnmatchedPolicy,

    /// Message origins accepted by the session. Empty disables the
    /// check entirely; non-empty drops messages whose origin is absent
    /// or not listed.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Whether the renderer consults the dismissal store and emits a
    /// dismiss control per announcement.
    #[serde(default)]
    pub dismissals_enabled: bool,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            required_context_key: default_required_key(),
            unmatched_policy: UnmatchedPolicy::default(),
            allowed_origins: Vec::new(),
            dismissals_enabled: false,
        }
    }
}

fn default_config_path() -> String {
    "/announcements/config.json".to_string()
}

fn default_required_key() -> String {
    "experienceLink".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let settings: BlockSettings = toml::from_str("").unwrap();
        assert_eq!(settings, BlockSettings::default());
        assert_eq!(settings.config_path, "/announcements/config.json");
        assert_eq!(settings.required_context_key, "experienceLink");
        assert_eq!(settings.unmatched_policy, UnmatchedPolicy::Exclude);
        assert!(settings.allowed_origins.is_empty());
        assert!(!settings.dismissals_enabled);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let settings: BlockSettings = toml::from_str(
            r#"
unmatched_policy = "include"
allowed_origins = ["https://portal.example.com"]
"#,
        )
        .unwrap();

        assert_eq!(settings.unmatched_policy, UnmatchedPolicy::Include);
        assert_eq!(settings.allowed_origins, vec!["https://portal.example.com"]);
        // Untouched fields keep their defaults
        assert_eq!(settings.required_context_key, "experienceLink");
    }
}
