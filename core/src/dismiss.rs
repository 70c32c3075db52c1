//! Dismissal persistence.
//!
//! An earlier page variant let readers dismiss individual
//! announcements and remembered the choice locally. The server-driven
//! configuration supersedes that, but external collaborators may still
//! rely on it, so it survives as an explicit capability: a small
//! get/set interface the renderer consults when (and only when) a
//! store is injected.

use chrono::{DateTime, Utc};
use hashbrown::HashSet;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Read/write interface over dismissed announcement ids.
pub trait DismissalStore: Send + Sync {
    fn is_dismissed(&self, id: i64) -> bool;
    fn dismiss(&mut self, id: i64);
}

/// In-process store, forgotten on drop. Useful for tests and for
/// integrators that handle persistence themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryDismissalStore {
    dismissed: HashSet<i64>,
}

impl MemoryDismissalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DismissalStore for MemoryDismissalStore {
    fn is_dismissed(&self, id: i64) -> bool {
        self.dismissed.contains(&id)
    }

    fn dismiss(&mut self, id: i64) {
        self.dismissed.insert(id);
    }
}

/// File-backed store: a JSON map of announcement id to the UTC time it
/// was dismissed. Dismissals persist immediately; a save failure is
/// logged and the in-memory flag is kept, so the current page still
/// hides the announcement.
#[derive(Debug)]
pub struct FileDismissalStore {
    path: PathBuf,
    // JSON object keys are strings, so ids are stored stringified
    flags: HashMap<String, DateTime<Utc>>,
}

impl FileDismissalStore {
    /// Load the store at `path`; a missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DismissError> {
        let path = path.as_ref().to_path_buf();
        let flags = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| DismissError::Parse {
                path: path.clone(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(DismissError::Io {
                    path,
                    source: e,
                });
            }
        };
        Ok(Self { path, flags })
    }

    /// Load from the default per-user location, if one exists.
    pub fn load_default() -> Result<Self, DismissError> {
        let path = default_store_path().ok_or(DismissError::NoDataDir)?;
        Self::load(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), DismissError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DismissError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let contents = serde_json::to_string_pretty(&self.flags).map_err(|e| {
            DismissError::Serialize {
                path: self.path.clone(),
                source: e,
            }
        })?;
        std::fs::write(&self.path, contents).map_err(|e| DismissError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl DismissalStore for FileDismissalStore {
    fn is_dismissed(&self, id: i64) -> bool {
        self.flags.contains_key(&id.to_string())
    }

    fn dismiss(&mut self, id: i64) {
        self.flags.insert(id.to_string(), Utc::now());
        if let Err(e) = self.persist() {
            tracing::error!(error = %e, "failed to persist dismissal flags");
        }
    }
}

/// Default store location under the per-user data directory.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("placard").join("dismissals.json"))
}

/// Errors from the file-backed store.
#[derive(Debug, Error)]
pub enum DismissError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no per-user data directory available")]
    NoDataDir,
}
