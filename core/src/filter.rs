//! Active-set filtering: join extracted announcements with the remote
//! configuration document and keep the ones that should display.
//!
//! The join key is the announcement id against the entry's integer
//! `ID`. An active entry with a display condition only passes when the
//! condition evaluates true against the runtime context; the
//! condition's result always gates inclusion.

use crate::condition;
use crate::extract::AnnouncementRecord;
use hashbrown::HashMap;
use placard_types::{ConfigDocument, ConfigEntry, RuntimeContext, UnmatchedPolicy};

/// Filter records against the configuration. Returns an
/// order-preserving subsequence of `records`.
pub fn filter_active(
    records: &[AnnouncementRecord],
    config: &ConfigDocument,
    ctx: &RuntimeContext,
    policy: UnmatchedPolicy,
) -> Vec<AnnouncementRecord> {
    let by_id = index_config(config);

    records
        .iter()
        .filter(|record| should_display(record, &by_id, ctx, policy))
        .cloned()
        .collect()
}

/// Config entries keyed by integer ID; on duplicate IDs the first
/// entry wins.
fn index_config(config: &ConfigDocument) -> HashMap<i64, &ConfigEntry> {
    let mut by_id: HashMap<i64, &ConfigEntry> = HashMap::with_capacity(config.data.len());
    for entry in &config.data {
        match entry.id.trim().parse::<i64>() {
            Ok(id) => {
                by_id.entry(id).or_insert(entry);
            }
            Err(_) => {
                tracing::warn!(id = %entry.id, "skipping config entry with non-integer ID");
            }
        }
    }
    by_id
}

fn should_display(
    record: &AnnouncementRecord,
    by_id: &HashMap<i64, &ConfigEntry>,
    ctx: &RuntimeContext,
    policy: UnmatchedPolicy,
) -> bool {
    let entry = match record.id.and_then(|id| by_id.get(&id)) {
        Some(entry) => entry,
        None => return policy == UnmatchedPolicy::Include,
    };

    if !entry.is_active() {
        return false;
    }

    match &entry.display_condition {
        Some(cond) => condition::evaluate(cond, ctx),
        None => true,
    }
}
