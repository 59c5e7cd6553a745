//! Parsers that turn raw task-log lines into normalized progress samples
//! or terminal-status signals.
//!
//! Most lines in a real task log are neither; both classifiers are cheap
//! and silent on a miss.

pub mod progress;
pub mod status;

pub use progress::parse_progress_line;
pub use status::detect_terminal_status;
