//! Ordered pattern table for heterogeneous progress-report line formats.

use regex::Regex;
use std::sync::LazyLock;
use taskwatch_core::ProgressSample;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// `transferred 5.5 GiB of 252.0 GiB (2.2%) in 1m 31s`
///
/// The size-bearing form. Checked before the percent-only form so a line
/// carrying both sizes and a percentage is parsed with its totals.
static SIZE_WITH_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)transferred\s+(?P<transferred>\d+(?:\.\d+)?)\s+(?P<unit>GiB|MiB)\s+of\s+(?P<total>\d+(?:\.\d+)?)\s+(?P<total_unit>GiB|MiB).*?\sin\s+(?P<elapsed>(?:\d+m\s+)?\d+s)",
    )
    .expect("size_with_total pattern")
});

/// `progress 12% (read 1073741824 bytes, zeroes = 0% (0 bytes), duration 34 sec)`
static BYTES_PROGRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)progress\s+(?P<percent>\d+(?:\.\d+)?)%\s+\(read\s+(?P<read_bytes>\d+)\s+bytes,.*?duration\s+(?P<duration_secs>\d+)\s+sec\)",
    )
    .expect("bytes_progress pattern")
});

/// `transferred 37.5% in 45s`
static PERCENT_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)transferred\s+(?P<percent>\d+(?:\.\d+)?)%\s+in\s+(?P<elapsed>(?:\d+m\s+)?\d+s)")
        .expect("percent_only pattern")
});

static ELAPSED_MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<minutes>\d+)m").expect("minutes pattern"));
static ELAPSED_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<seconds>\d+)s").expect("seconds pattern"));

/// Parse one raw log line into a normalized progress sample.
///
/// Patterns are tried in order, first match wins; size-bearing forms come
/// before the percent-only form. Lines matching no pattern yield `None`.
pub fn parse_progress_line(line: &str) -> Option<ProgressSample> {
    if let Some(caps) = SIZE_WITH_TOTAL.captures(line) {
        let value = to_gib(parse_f64(&caps, "transferred")?, &caps["unit"]);
        let total = to_gib(parse_f64(&caps, "total")?, &caps["total_unit"]);
        return Some(ProgressSample {
            elapsed_secs: parse_elapsed_secs(&caps["elapsed"]),
            value,
            total: Some(total),
        });
    }

    if let Some(caps) = BYTES_PROGRESS.captures(line) {
        let percent = parse_f64(&caps, "percent")?;
        let read_bytes: f64 = caps["read_bytes"].parse().ok()?;
        let elapsed_secs: u64 = caps["duration_secs"].parse().ok()?;
        let value = read_bytes / BYTES_PER_GIB;
        let total = (percent > 0.0).then(|| value * 100.0 / percent);
        return Some(ProgressSample {
            elapsed_secs,
            value,
            total,
        });
    }

    if let Some(caps) = PERCENT_ONLY.captures(line) {
        return Some(ProgressSample {
            elapsed_secs: parse_elapsed_secs(&caps["elapsed"]),
            value: parse_f64(&caps, "percent")?,
            total: None,
        });
    }

    None
}

/// Convert `"1m 31s"` / `"45s"` elapsed text to whole seconds. The minutes
/// group is optional and defaults to zero.
fn parse_elapsed_secs(elapsed: &str) -> u64 {
    let minutes = ELAPSED_MINUTES
        .captures(elapsed)
        .and_then(|c| c["minutes"].parse::<u64>().ok())
        .unwrap_or(0);
    let seconds = ELAPSED_SECONDS
        .captures(elapsed)
        .and_then(|c| c["seconds"].parse::<u64>().ok())
        .unwrap_or(0);
    minutes * 60 + seconds
}

fn to_gib(value: f64, unit: &str) -> f64 {
    if unit.eq_ignore_ascii_case("mib") {
        value / 1024.0
    } else {
        value
    }
}

fn parse_f64(caps: &regex::Captures<'_>, name: &str) -> Option<f64> {
    caps[name].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gib_sizes_with_total_and_elapsed() {
        let sample = parse_progress_line("transferred 5.5 GiB of 252.0 GiB (2.2%) in 1m 31s")
            .expect("sample");
        assert_eq!(sample.elapsed_secs, 91);
        assert_eq!(sample.value, 5.5);
        assert_eq!(sample.total, Some(252.0));
    }

    #[test]
    fn normalizes_mib_sizes_to_gib() {
        let sample = parse_progress_line("transferred 1024 MiB of 2048 MiB (50%) in 2m 0s")
            .expect("sample");
        assert_eq!(sample.elapsed_secs, 120);
        assert_eq!(sample.value, 1.0);
        assert_eq!(sample.total, Some(2.0));
    }

    #[test]
    fn parses_percent_only_lines_without_a_total() {
        let sample = parse_progress_line("transferred 37.5% in 45s").expect("sample");
        assert_eq!(sample.elapsed_secs, 45);
        assert_eq!(sample.value, 37.5);
        assert_eq!(sample.total, None);
    }

    #[test]
    fn derives_total_from_bytes_progress_percentage() {
        let line = "progress 25% (read 1073741824 bytes, zeroes = 0% (0 bytes), duration 30 sec)";
        let sample = parse_progress_line(line).expect("sample");
        assert_eq!(sample.elapsed_secs, 30);
        assert_eq!(sample.value, 1.0);
        assert_eq!(sample.total, Some(4.0));
    }

    #[test]
    fn zero_percent_bytes_progress_has_unknown_total() {
        let line = "progress 0% (read 0 bytes, zeroes = 0% (0 bytes), duration 1 sec)";
        let sample = parse_progress_line(line).expect("sample");
        assert_eq!(sample.elapsed_secs, 1);
        assert_eq!(sample.value, 0.0);
        assert_eq!(sample.total, None);
    }

    #[test]
    fn non_progress_lines_yield_none() {
        assert!(parse_progress_line("starting VM restore task").is_none());
        assert!(parse_progress_line("").is_none());
    }

    #[test]
    fn drive_prefixed_lines_still_match() {
        let line = "drive-scsi0: transferred 2.0 GiB of 10.0 GiB (20.00%) in 20s";
        let sample = parse_progress_line(line).expect("sample");
        assert_eq!(sample.elapsed_secs, 20);
        assert_eq!(sample.value, 2.0);
        assert_eq!(sample.total, Some(10.0));
    }

    #[test]
    fn elapsed_minutes_group_is_optional() {
        assert_eq!(parse_elapsed_secs("45s"), 45);
        assert_eq!(parse_elapsed_secs("1m 31s"), 91);
        assert_eq!(parse_elapsed_secs("10m 0s"), 600);
    }
}
