//! Remote configuration document types.
//!
//! The configuration resource is fetched fresh on every runtime message
//! and joins to extracted announcements by numeric identifier. Field
//! names match the upstream document's casing exactly.

use serde::{Deserialize, Serialize};

/// One configuration entry, keyed to an announcement by `ID`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Integer-like identifier matching an announcement's id slot.
    #[serde(rename = "ID")]
    pub id: String,

    /// `"on"` enables the entry; any other value (or absence) disables it.
    #[serde(rename = "Active", default)]
    pub active: String,

    /// Optional three-token condition gating display, e.g. `"plan equals pro"`.
    #[serde(rename = "DisplayCondition", default)]
    pub display_condition: Option<String>,
}

impl ConfigEntry {
    pub fn is_active(&self) -> bool {
        self.active == "on"
    }
}

/// Wire shape of the configuration resource: `{ "data": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub data: Vec<ConfigEntry>,
}

/// What to do with an announcement that has no configuration entry.
///
/// Observed page variants disagree; the strict policy is canonical and
/// the loose one is kept selectable for pages that relied on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Exclude announcements with no matching entry (canonical).
    #[default]
    Exclude,
    /// Include announcements with no matching entry (historical).
    Include,
}
