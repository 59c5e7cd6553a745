//! Reading the active-task index file.

use crate::task::{parse_index_line, TaskRecord};
use std::path::Path;

/// Read the active-task index and return the records still running.
///
/// A missing index file is the normal "no active tasks" state and yields an
/// empty vec. Malformed or blank lines are skipped, never fatal.
pub fn read_active_tasks(path: &Path) -> Vec<TaskRecord> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Vec::new();
    };

    contents
        .lines()
        .filter_map(parse_index_line)
        .filter(TaskRecord::is_active)
        .collect()
}
