//! Dashboard rendering: one status line plus a short tail of raw log
//! lines, repainted in place when stdout is a terminal.

use std::collections::VecDeque;
use std::io::{self, Write};
use taskwatch_core::ProgressSample;

/// Width of the progress bar in cells.
pub const BAR_WIDTH: usize = 28;

/// Hard cap on one rendered log line, ellipsis on truncation.
pub const MAX_LINE_WIDTH: usize = 140;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_CYAN: &str = "\x1b[36m";
const COLOR_YELLOW: &str = "\x1b[33m";
const COLOR_DIM: &str = "\x1b[2m";

/// The only render-side state that survives across paints: how many lines
/// the previous paint produced, for the cursor-up math. Owned by the
/// monitor loop, never global.
#[derive(Debug, Default, Clone, Copy)]
pub struct RendererState {
    pub previous_line_count: usize,
}

/// Everything the status line needs for one repaint.
#[derive(Debug, Clone, Copy)]
pub struct StatusView<'a> {
    pub latest: Option<&'a ProgressSample>,
    pub speed_gib_s: f64,
    pub average_speed_gib_s: f64,
    pub eta_secs: f64,
    /// No fresh sample arrived this tick.
    pub waiting: bool,
}

/// Build the fixed-role dashboard block: the status line followed by up to
/// the `recent_limit` most recent raw log lines, oldest first.
pub fn build_dashboard_lines(
    view: &StatusView<'_>,
    recent: &VecDeque<String>,
    recent_limit: usize,
    color: bool,
) -> Vec<String> {
    let mut status = build_status_line(view);
    if color {
        status = colorize_status(&status);
    }

    let mut lines = vec![status];
    let skip = recent.len().saturating_sub(recent_limit);
    for raw in recent.iter().skip(skip) {
        let rendered = truncate(raw, MAX_LINE_WIDTH);
        if color {
            lines.push(format!("  {COLOR_DIM}{rendered}{COLOR_RESET}"));
        } else {
            lines.push(format!("  {rendered}"));
        }
    }
    lines
}

/// One tqdm-style status line: bar, percent, size or percent value, current
/// and whole-run speeds in MiB/s, elapsed, ETA, optional waiting marker.
pub fn build_status_line(view: &StatusView<'_>) -> String {
    let (percent, value, total) = match view.latest {
        Some(sample) => {
            let percent = match sample.total {
                Some(total) if total > 0.0 => (sample.value / total * 100.0).clamp(0.0, 100.0),
                _ => sample.value.clamp(0.0, 100.0),
            };
            (percent, sample.value, sample.total)
        }
        None => (0.0, 0.0, None),
    };

    let filled = ((percent / 100.0) * BAR_WIDTH as f64) as usize;
    let bar = format!("[{}{}]", "=".repeat(filled), ".".repeat(BAR_WIDTH - filled));

    let size_text = match total {
        Some(total) if total > 0.0 => format!("{value:6.2}/{total:6.2} GiB"),
        _ => format!("{value:6.2} %"),
    };

    let speed_mib_s = view.speed_gib_s * 1024.0;
    let average_mib_s = view.average_speed_gib_s * 1024.0;
    let elapsed = view
        .latest
        .map(|sample| format_hms(sample.elapsed_secs as f64))
        .unwrap_or_else(|| "00:00:00".to_string());
    let eta = if view.eta_secs.is_infinite() {
        "n/a".to_string()
    } else {
        format_hms(view.eta_secs)
    };
    let waiting = if view.waiting { " waiting log" } else { "" };

    format!(
        "{bar} {percent:5.1}% | {size_text} | Now {speed_mib_s:6.1} MiB/s | \
         Avg {average_mib_s:6.1} MiB/s | Elapsed {elapsed} | ETA {eta}{waiting}"
    )
}

/// Repaint the dashboard block on `out`.
///
/// On a TTY the cursor moves up over the previous block and each line is
/// cleared before rewriting, so the dashboard stays in place instead of
/// spamming scrollback. On a pipe or file the lines append plainly and the
/// output stays valid. Returns the painted line count for the next call.
pub fn paint<W: Write>(
    out: &mut W,
    lines: &[String],
    state: RendererState,
    is_tty: bool,
) -> io::Result<RendererState> {
    if is_tty && state.previous_line_count > 0 {
        write!(out, "\x1b[{}A", state.previous_line_count)?;
    }
    for line in lines {
        if is_tty {
            out.write_all(b"\x1b[2K")?;
        }
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(RendererState {
        previous_line_count: lines.len(),
    })
}

/// Format whole seconds as `HH:MM:SS`, clamping negatives to zero.
pub fn format_hms(secs: f64) -> String {
    let total = secs.round().max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }
    let kept: String = value.chars().take(width - 3).collect();
    format!("{kept}...")
}

fn colorize_status(line: &str) -> String {
    line.replace('[', &format!("{COLOR_GREEN}["))
        .replace(']', &format!("]{COLOR_RESET}"))
        .replace("MiB/s", &format!("{COLOR_CYAN}MiB/s{COLOR_RESET}"))
        .replace("ETA", &format!("{COLOR_YELLOW}ETA{COLOR_RESET}"))
}
