//! Blocking, poll-based tailing of a single task log.
//!
//! The follower is an explicit pull interface: every call returns either
//! one complete line or an [`TailEvent::Idle`] tick after sleeping the poll
//! interval. The sleep is the only suspension point in the whole program,
//! so redraw cadence and interrupt responsiveness stay bounded by it.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

/// One observation from a line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailEvent {
    /// A complete log line, trailing newline stripped.
    Line(String),
    /// No new data was available within one poll interval.
    Idle,
    /// The source is exhausted and will not produce more lines.
    Eof,
}

/// Seam between the monitor loop and whatever produces log lines, so tests
/// can drive the loop with scripted input.
pub trait LineSource {
    fn next_event(&mut self) -> io::Result<TailEvent>;
}

/// Tails a task log from byte 0.
///
/// Restore logs are read from the beginning on purpose: progress already
/// written before the watcher started must not be lost.
pub struct LogFollower {
    reader: BufReader<File>,
    poll_interval: Duration,
}

impl LogFollower {
    pub fn open(path: &Path, poll_interval: Duration) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            poll_interval,
        })
    }
}

impl LineSource for LogFollower {
    fn next_event(&mut self) -> io::Result<TailEvent> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            std::thread::sleep(self.poll_interval);
            return Ok(TailEvent::Idle);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(TailEvent::Line(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_existing_content_from_byte_zero() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("task.log");
        std::fs::write(&path, "first line\nsecond line\n").expect("write");

        let mut follower =
            LogFollower::open(&path, Duration::from_millis(1)).expect("open");
        assert_eq!(
            follower.next_event().expect("event"),
            TailEvent::Line("first line".to_string())
        );
        assert_eq!(
            follower.next_event().expect("event"),
            TailEvent::Line("second line".to_string())
        );
        assert_eq!(follower.next_event().expect("event"), TailEvent::Idle);
    }

    #[test]
    fn picks_up_lines_appended_after_idle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("task.log");
        std::fs::write(&path, "old\n").expect("write");

        let mut follower =
            LogFollower::open(&path, Duration::from_millis(1)).expect("open");
        assert_eq!(
            follower.next_event().expect("event"),
            TailEvent::Line("old".to_string())
        );
        assert_eq!(follower.next_event().expect("event"), TailEvent::Idle);

        let mut handle = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .expect("reopen");
        writeln!(handle, "new").expect("append");
        handle.flush().expect("flush");

        assert_eq!(
            follower.next_event().expect("event"),
            TailEvent::Line("new".to_string())
        );
    }
}
