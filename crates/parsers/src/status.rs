//! Terminal-status classification of raw log lines.

use taskwatch_core::TerminalStatus;

/// Substrings that mark a failed task. Checked before the success markers
/// so a line like "aborting... task ok cleanup" still counts as a failure.
const FAILURE_MARKERS: &[&str] = &["task error", "failed", "aborted"];

/// Substrings that mark a successfully finished task.
const SUCCESS_MARKERS: &[&str] = &["task ok", "completed", "success"];

/// Classify one raw log line as a terminal outcome, if it is one.
///
/// Case-insensitive substring match on the whole line; evaluated on every
/// line regardless of whether it parsed as progress. Only `Success` and
/// `Failure` can be produced here.
pub fn detect_terminal_status(line: &str) -> Option<TerminalStatus> {
    let lowered = line.to_lowercase();
    if FAILURE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Some(TerminalStatus::Failure);
    }
    if SUCCESS_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Some(TerminalStatus::Success);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_success_markers() {
        for line in ["TASK OK", "restore completed cleanly", "operation success"] {
            assert_eq!(detect_terminal_status(line), Some(TerminalStatus::Success));
        }
    }

    #[test]
    fn detects_failure_markers() {
        for line in [
            "TASK ERROR: command failed",
            "restore failed: missing archive",
            "restore aborted by admin",
        ] {
            assert_eq!(detect_terminal_status(line), Some(TerminalStatus::Failure));
        }
    }

    #[test]
    fn failure_wins_over_success_on_the_same_line() {
        assert_eq!(
            detect_terminal_status("TASK ERROR: completed with errors"),
            Some(TerminalStatus::Failure)
        );
    }

    #[test]
    fn unrelated_lines_are_not_terminal() {
        assert_eq!(detect_terminal_status("starting VM restore task"), None);
        assert_eq!(detect_terminal_status(""), None);
    }
}
