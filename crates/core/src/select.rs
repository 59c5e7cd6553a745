//! Choosing which restore-like task to monitor.

use crate::task::TaskRecord;

/// Actions that always count as restore-like.
pub const RESTORE_ACTIONS: &[&str] = &["qmrestore", "pctrestore"];

/// Keywords that mark a task as restore-like when they appear anywhere in
/// the identifier or the raw index line.
pub const RESTORE_KEYWORDS: &[&str] = &["restore", "restoring", "backup"];

/// Keep the records whose action or identifier text looks restore-like.
pub fn filter_restore_like(records: Vec<TaskRecord>) -> Vec<TaskRecord> {
    records
        .into_iter()
        .filter(|record| {
            let action = record.action.to_lowercase();
            if RESTORE_ACTIONS.contains(&action.as_str()) {
                return true;
            }
            let text = format!("{} {}", record.upid, record.raw).to_lowercase();
            RESTORE_KEYWORDS.iter().any(|kw| text.contains(kw))
        })
        .collect()
}

/// Choose one record to monitor.
///
/// Empty input yields `None`; a single candidate is taken as-is; with
/// several candidates the last listed (most recently appended) wins.
pub fn choose(mut records: Vec<TaskRecord>) -> Option<TaskRecord> {
    records.pop()
}
