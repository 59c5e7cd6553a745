//! Task records parsed from the active-task index.
//!
//! Each index line starts with a UPID-like identifier
//! (`UPID:<node>:<pid>:<pstart>:<starttime>:<action>:<id>:<user>:`),
//! optionally followed by status text. The fifth colon-field is a
//! hex-encoded start time whose first digit selects the log shard
//! directory; the sixth is the task action.

use chrono::{DateTime, TimeZone, Utc};

/// Colon-field index of the hex start-time inside a UPID.
pub const UPID_STARTTIME_FIELD: usize = 4;
/// Colon-field index of the task action inside a UPID.
pub const UPID_ACTION_FIELD: usize = 5;

/// One normalized record from the active-task index. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Full UPID-like identifier (first whitespace token of the line).
    pub upid: String,
    /// Node name embedded in the identifier, empty when absent.
    pub node: String,
    /// Task action embedded in the identifier, empty when absent.
    pub action: String,
    /// First status token of the line, empty for still-running tasks.
    pub status: String,
    /// The raw index line the record was parsed from.
    pub raw: String,
}

impl TaskRecord {
    /// An empty status or `"0"` marks a task that is still running.
    pub fn is_active(&self) -> bool {
        self.status.is_empty() || self.status == "0"
    }

    /// Decode the hex start-time field into a UTC timestamp.
    ///
    /// Returns `None` for identifiers whose start-time field is missing
    /// or not valid hex.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        let field = self.upid.split(':').nth(UPID_STARTTIME_FIELD)?;
        let secs = i64::from_str_radix(field, 16).ok()?;
        Utc.timestamp_opt(secs, 0).single()
    }
}

/// Parse one active-index line into a [`TaskRecord`].
///
/// The first whitespace token is the identifier. Status text follows after
/// a single separating space; a double space (or nothing) after the
/// identifier means the task has not finished and its status is empty.
/// Blank lines yield `None`.
pub fn parse_index_line(line: &str) -> Option<TaskRecord> {
    let raw = line.trim_end_matches('\n');
    if raw.trim().is_empty() {
        return None;
    }

    let upid = raw.split_whitespace().next()?.to_string();
    let trailing = &raw[raw.find(&upid)? + upid.len()..];
    let status = if trailing.starts_with("  ") || trailing.trim().is_empty() {
        String::new()
    } else {
        trailing
            .trim()
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    };

    let mut fields = raw.split(':');
    let node = fields.nth(1).unwrap_or_default();
    let node = node.split_whitespace().next().unwrap_or_default().to_string();
    let action = upid
        .split(':')
        .nth(UPID_ACTION_FIELD)
        .unwrap_or_default()
        .to_string();

    Some(TaskRecord {
        upid,
        node,
        action,
        status,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUNNING: &str = "UPID:pve1:0000A1B2:00000000:68AC01FF:qmrestore:101:root@pam:";

    #[test]
    fn parses_running_task_with_empty_status() {
        let record = parse_index_line(RUNNING).expect("record");
        assert_eq!(record.upid, RUNNING);
        assert_eq!(record.node, "pve1");
        assert_eq!(record.action, "qmrestore");
        assert_eq!(record.status, "");
        assert!(record.is_active());
    }

    #[test]
    fn parses_status_token_after_single_space() {
        let line = format!("{RUNNING} OK");
        let record = parse_index_line(&line).expect("record");
        assert_eq!(record.status, "OK");
        assert!(!record.is_active());
    }

    #[test]
    fn double_space_separator_means_no_status() {
        let line = format!("{RUNNING}  trailing text");
        let record = parse_index_line(&line).expect("record");
        assert_eq!(record.status, "");
        assert!(record.is_active());
    }

    #[test]
    fn zero_status_counts_as_active() {
        let line = format!("{RUNNING} 0");
        let record = parse_index_line(&line).expect("record");
        assert_eq!(record.status, "0");
        assert!(record.is_active());
    }

    #[test]
    fn blank_line_yields_none() {
        assert!(parse_index_line("").is_none());
        assert!(parse_index_line("   \n").is_none());
    }

    #[test]
    fn decodes_hex_start_time() {
        let record = parse_index_line(RUNNING).expect("record");
        let start = record.start_time().expect("start time");
        assert_eq!(start.timestamp(), 0x68AC_01FF);
    }

    #[test]
    fn start_time_is_none_for_non_hex_field() {
        let record = parse_index_line("UPID:pve1:1:2:notahex:qmrestore:101:root@pam:")
            .expect("record");
        assert!(record.start_time().is_none());
    }
}
