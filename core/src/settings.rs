//! Block settings loading.
//!
//! Settings live in a TOML file supplied by the integrator; every
//! field defaults, so a missing knob never fails the load. See
//! [`placard_types::BlockSettings`] for the fields.

use placard_types::BlockSettings;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<BlockSettings, SettingsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Errors that can occur during settings loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use placard_types::UnmatchedPolicy;

    #[test]
    fn test_load_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placard.toml");
        std::fs::write(
            &path,
            r#"
config_path = "/my/config.json"
unmatched_policy = "include"
dismissals_enabled = true
"#,
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.config_path, "/my/config.json");
        assert_eq!(settings.unmatched_policy, UnmatchedPolicy::Include);
        assert!(settings.dismissals_enabled);
        assert_eq!(settings.required_context_key, "experienceLink");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_settings(Path::new("/nonexistent/placard.toml"));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placard.toml");
        std::fs::write(&path, "config_path = [not toml").unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
