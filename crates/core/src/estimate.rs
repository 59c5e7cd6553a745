//! Speed and ETA estimation over a bounded history of progress samples.

/// Number of trailing samples used for the smoothed speed.
pub const SMOOTHING_WINDOW: usize = 6;

/// One normalized progress reading extracted from a log line.
///
/// `value` and `total` share a unit: GiB when the log reports sizes, plain
/// percent when it only reports a percentage (then `total` is `None`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// Task-reported elapsed time in seconds.
    pub elapsed_secs: u64,
    /// Transferred amount (GiB) or completion percentage.
    pub value: f64,
    /// Total amount in the same unit, when the log reports one.
    pub total: Option<f64>,
}

/// Compute the smoothed speed and ETA for a sample history.
///
/// Fewer than two samples never fabricate a rate: the previous speed is
/// returned with an infinite ETA. Otherwise consecutive pairs inside the
/// trailing [`SMOOTHING_WINDOW`] with positive time *and* value deltas are
/// accumulated; pairs with non-positive deltas (log replays, duplicate
/// lines) are excluded. When no pair qualifies the previous speed carries
/// over, so a single stalled sample does not flicker the display to zero.
///
/// ETA is `f64::INFINITY` when the latest total is unknown or the speed is
/// not positive, else `max(total - value, 0) / speed` in seconds.
pub fn estimate(history: &[ProgressSample], previous_speed: f64) -> (f64, f64) {
    if history.len() < 2 {
        return (previous_speed, f64::INFINITY);
    }

    let start = history.len().saturating_sub(SMOOTHING_WINDOW);
    let window = &history[start..];

    let mut delta_secs = 0u64;
    let mut delta_value = 0.0f64;
    for pair in window.windows(2) {
        let dt = pair[1].elapsed_secs.saturating_sub(pair[0].elapsed_secs);
        let dv = pair[1].value - pair[0].value;
        if pair[1].elapsed_secs > pair[0].elapsed_secs && dv > 0.0 {
            delta_secs += dt;
            delta_value += dv;
        }
    }

    let mut speed = previous_speed;
    if delta_secs > 0 && delta_value > 0.0 {
        speed = delta_value / delta_secs as f64;
    }

    let last = history[history.len() - 1];
    let Some(total) = last.total else {
        return (speed, f64::INFINITY);
    };
    if speed <= 0.0 {
        return (speed, f64::INFINITY);
    }

    let remaining = (total - last.value).max(0.0);
    (speed, remaining / speed)
}

/// Whole-run average speed, first sample to last. Display only; independent
/// of the smoothing window. Zero when the run has not moved forward.
pub fn total_average_speed(history: &[ProgressSample]) -> f64 {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return 0.0;
    };
    if history.len() < 2 {
        return 0.0;
    }

    let dt = last.elapsed_secs.saturating_sub(first.elapsed_secs);
    let dv = last.value - first.value;
    if last.elapsed_secs <= first.elapsed_secs || dv <= 0.0 {
        return 0.0;
    }
    dv / dt as f64
}

/// Sample history plus the speed memory that survives stalls.
///
/// Owned exclusively by the monitor loop; the series is append-only and
/// strictly increasing in `elapsed_secs`.
#[derive(Debug)]
pub struct EstimatorState {
    history: Vec<ProgressSample>,
    last_speed: f64,
    last_eta_secs: f64,
}

impl Default for EstimatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatorState {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            last_speed: 0.0,
            last_eta_secs: f64::INFINITY,
        }
    }

    /// Append a sample unless it would break the elapsed-time ordering.
    ///
    /// Returns whether the sample was stored. Out-of-order and duplicate
    /// elapsed times are rejected without mutating the history.
    pub fn accept(&mut self, sample: ProgressSample) -> bool {
        if let Some(last) = self.history.last() {
            if sample.elapsed_secs <= last.elapsed_secs {
                return false;
            }
        }
        self.history.push(sample);
        true
    }

    /// Recompute the smoothed speed and ETA, retaining the last known good
    /// rate across stalls.
    pub fn update(&mut self) -> (f64, f64) {
        let (speed, eta) = estimate(&self.history, self.last_speed);
        self.last_speed = speed;
        self.last_eta_secs = eta;
        (speed, eta)
    }

    pub fn speed(&self) -> f64 {
        self.last_speed
    }

    pub fn eta_secs(&self) -> f64 {
        self.last_eta_secs
    }

    pub fn average_speed(&self) -> f64 {
        total_average_speed(&self.history)
    }

    pub fn latest(&self) -> Option<&ProgressSample> {
        self.history.last()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
