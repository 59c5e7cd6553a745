//! The monitor loop: pull log events, update the estimator, repaint on a
//! cadence, stop on the first terminal status.

use crate::follow::{LineSource, TailEvent};
use crate::render::{build_dashboard_lines, paint, RendererState, StatusView};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use taskwatch_core::{EstimatorState, TerminalStatus};
use taskwatch_parsers::{detect_terminal_status, parse_progress_line};

/// Knobs for one monitoring run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Minimum delay between idle repaints.
    pub update_interval: Duration,
    /// Capacity of the recent-log ring under the status line.
    pub recent_log_lines: usize,
    /// Whether the dashboard is colorized.
    pub color: bool,
}

/// What one run produced, for the caller's summary and for tests.
#[derive(Debug)]
pub struct MonitorOutcome {
    pub status: TerminalStatus,
    pub estimator: EstimatorState,
}

/// Drive the monitor until a terminal status is observed.
///
/// Every non-empty line lands in the recent-log ring; lines that parse as
/// progress (and keep the elapsed-time ordering) update the estimator and
/// force an immediate repaint; every line is then classified for a
/// terminal status, which stops the loop without pulling further events.
/// Idle ticks repaint with the waiting marker once the update interval has
/// passed. An interrupt observed between ticks maps to
/// [`TerminalStatus::Interrupted`]; an exhausted source maps to
/// [`TerminalStatus::Unknown`].
pub fn run_monitor<S: LineSource, W: Write>(
    source: &mut S,
    out: &mut W,
    is_tty: bool,
    config: &MonitorConfig,
    interrupted: &AtomicBool,
) -> io::Result<MonitorOutcome> {
    let mut estimator = EstimatorState::new();
    let mut recent: VecDeque<String> = VecDeque::with_capacity(config.recent_log_lines);
    let mut renderer = RendererState::default();
    let mut last_paint = Instant::now();

    loop {
        if interrupted.load(Ordering::SeqCst) {
            tracing::debug!("monitoring interrupted by user");
            return Ok(MonitorOutcome {
                status: TerminalStatus::Interrupted,
                estimator,
            });
        }

        match source.next_event()? {
            TailEvent::Line(line) if !line.is_empty() => {
                if recent.len() >= config.recent_log_lines {
                    recent.pop_front();
                }
                recent.push_back(line.clone());

                if let Some(sample) = parse_progress_line(&line) {
                    if estimator.accept(sample) {
                        estimator.update();
                        renderer = repaint(
                            out, is_tty, config, &estimator, &recent, renderer, false,
                        )?;
                        last_paint = Instant::now();
                    } else {
                        tracing::debug!(%line, "rejected out-of-order progress sample");
                    }
                } else {
                    tracing::debug!(%line, "ignored non-progress log line");
                }

                if let Some(status) = detect_terminal_status(&line) {
                    tracing::debug!(%status, "detected terminal status");
                    return Ok(MonitorOutcome { status, estimator });
                }
            }
            TailEvent::Line(_) | TailEvent::Idle => {
                if last_paint.elapsed() >= config.update_interval {
                    renderer = repaint(
                        out, is_tty, config, &estimator, &recent, renderer, true,
                    )?;
                    last_paint = Instant::now();
                }
            }
            TailEvent::Eof => {
                return Ok(MonitorOutcome {
                    status: TerminalStatus::Unknown,
                    estimator,
                });
            }
        }
    }
}

fn repaint<W: Write>(
    out: &mut W,
    is_tty: bool,
    config: &MonitorConfig,
    estimator: &EstimatorState,
    recent: &VecDeque<String>,
    renderer: RendererState,
    waiting: bool,
) -> io::Result<RendererState> {
    let view = StatusView {
        latest: estimator.latest(),
        speed_gib_s: estimator.speed(),
        average_speed_gib_s: estimator.average_speed(),
        eta_secs: estimator.eta_secs(),
        waiting,
    };
    let lines = build_dashboard_lines(&view, recent, config.recent_log_lines, config.color);
    paint(out, &lines, renderer, is_tty)
}
