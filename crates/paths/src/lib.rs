//! Task-log directory layout and shard-aware log file resolution.
//!
//! Task logs live under a fixed root in 16 single-level shard directories,
//! one per hex digit, keyed by the first character of the hex start-time
//! field embedded in the task identifier: `root/<hexDigit>/<upid>`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default task-log root on a hypervisor node.
pub const DEFAULT_TASKS_ROOT: &str = "/var/log/pve/tasks";

/// File name of the active-task index under the tasks root.
pub const ACTIVE_INDEX_NAME: &str = "active";

/// The 16 shard directory names under the tasks root.
pub const HEX_SHARDS: &str = "0123456789ABCDEF";

/// Colon-field index of the hex start-time used for sharding.
const STARTTIME_FIELD: usize = 4;

/// Minimum number of colon-fields in a well-formed identifier.
const MIN_UPID_FIELDS: usize = 8;

/// Why an identifier cannot be mapped to a shard directory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpidError {
    #[error("identifier has {0} colon-fields, expected at least {MIN_UPID_FIELDS}")]
    WrongFieldCount(usize),
    #[error("identifier does not start with the UPID marker")]
    MissingMarker,
    #[error("start-time field {0:?} is not an 8-digit hex value")]
    BadStartTime(String),
}

/// Path of the active-task index under `root`.
pub fn active_index_path(root: &Path) -> PathBuf {
    root.join(ACTIVE_INDEX_NAME)
}

/// Validate an identifier and return its shard directory name.
///
/// The identifier must split into at least eight colon-fields with `UPID`
/// first, and its fifth field must be an 8-digit hex start-time; the shard
/// is that field's first digit, uppercased.
pub fn shard_for(upid: &str) -> Result<char, UpidError> {
    let fields: Vec<&str> = upid.split(':').collect();
    if fields.len() < MIN_UPID_FIELDS {
        return Err(UpidError::WrongFieldCount(fields.len()));
    }
    if fields[0] != "UPID" {
        return Err(UpidError::MissingMarker);
    }

    let start_time = fields[STARTTIME_FIELD];
    if start_time.len() != 8 || !start_time.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(UpidError::BadStartTime(start_time.to_string()));
    }

    Ok(start_time
        .chars()
        .next()
        .unwrap_or('0')
        .to_ascii_uppercase())
}

/// Resolve the on-disk log file for a task identifier.
///
/// Validation precedes lookup: malformed identifiers resolve to `None`
/// without touching the filesystem, even when a file of that exact name
/// exists. The shard derived from the start-time field is tried first;
/// on a miss every other shard directory is scanned for a file named
/// exactly `upid`, first match wins.
pub fn resolve_task_log(root: &Path, upid: &str) -> Option<PathBuf> {
    let shard = shard_for(upid).ok()?;

    let preferred = root.join(shard.to_string()).join(upid);
    if preferred.exists() {
        return Some(preferred);
    }

    for fallback in HEX_SHARDS.chars().filter(|c| *c != shard) {
        let candidate = root.join(fallback.to_string()).join(upid);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, "task log").expect("write");
    }

    #[test]
    fn resolves_from_the_start_time_shard() {
        let dir = tempfile::tempdir().expect("tempdir");
        let upid = "UPID:node:00000001:00000000:A1234567:qmrestore:101:root@pam:";
        let expected = dir.path().join("A").join(upid);
        touch(&expected);

        assert_eq!(resolve_task_log(dir.path(), upid), Some(expected));
    }

    #[test]
    fn falls_back_to_scanning_other_shards() {
        let dir = tempfile::tempdir().expect("tempdir");
        let upid = "UPID:node:00000001:00000000:B1234567:qmrestore:101:root@pam:";
        let misplaced = dir.path().join("F").join(upid);
        touch(&misplaced);

        assert_eq!(resolve_task_log(dir.path(), upid), Some(misplaced));
    }

    #[test]
    fn malformed_identifier_resolves_to_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(resolve_task_log(dir.path(), "UPID:node:bad"), None);
    }

    #[test]
    fn short_identifier_is_rejected_even_when_the_file_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let short = "UPID:node:1:2:A1234567";
        touch(&dir.path().join("A").join(short));

        assert_eq!(resolve_task_log(dir.path(), short), None);
    }

    #[test]
    fn shard_errors_name_the_offending_field() {
        assert_eq!(
            shard_for("notaupid:a:b:c:d:e:f:g"),
            Err(UpidError::MissingMarker)
        );
        assert_eq!(
            shard_for("UPID:node:1:2:XYZ:qmrestore:101:root@pam:"),
            Err(UpidError::BadStartTime("XYZ".to_string()))
        );
        assert!(matches!(
            shard_for("UPID:node:bad"),
            Err(UpidError::WrongFieldCount(3))
        ));
    }

    #[test]
    fn missing_log_resolves_to_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let upid = "UPID:node:00000001:00000000:C1234567:qmrestore:101:root@pam:";
        assert_eq!(resolve_task_log(dir.path(), upid), None);
    }
}
