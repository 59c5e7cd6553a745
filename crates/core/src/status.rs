//! Terminal outcome classification for a monitored task.

use std::fmt;

/// Final, absorbing outcome of one monitoring run. Set at most once; once
/// known, the monitor stops pulling lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStatus {
    /// The task log reported success.
    Success,
    /// The task log reported an error or abort.
    Failure,
    /// The user interrupted monitoring (Ctrl+C).
    Interrupted,
    /// No matching active task was found in the index.
    NoTask,
    /// The task log file could not be resolved on disk.
    LogMissing,
    /// Monitoring ended without a recognizable outcome.
    Unknown,
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Interrupted => "interrupted",
            Self::NoTask => "no-task",
            Self::LogMissing => "log-missing",
            Self::Unknown => "unknown",
        };
        f.write_str(text)
    }
}

impl TerminalStatus {
    /// The single summary line every run prints before exiting.
    pub fn summary_line(self) -> String {
        format!("Final status: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lines_cover_every_status() {
        let cases = [
            (TerminalStatus::Success, "Final status: success"),
            (TerminalStatus::Failure, "Final status: failure"),
            (TerminalStatus::Interrupted, "Final status: interrupted"),
            (TerminalStatus::NoTask, "Final status: no-task"),
            (TerminalStatus::LogMissing, "Final status: log-missing"),
            (TerminalStatus::Unknown, "Final status: unknown"),
        ];
        for (status, expected) in cases {
            assert_eq!(status.summary_line(), expected);
        }
    }
}
