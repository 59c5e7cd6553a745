//! Watcher configuration (`taskwatch.toml`).
//!
//! Every field has a default, so the config file is optional: the path in
//! `TASKWATCH_CONFIG` wins when set, else `/etc/taskwatch.toml` is read
//! when present, else the defaults apply. A file that exists but does not
//! parse is a fatal startup error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "TASKWATCH_CONFIG";

/// System-wide config file consulted when the override is unset.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/taskwatch.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Root of the sharded task-log tree.
    #[serde(default = "default_tasks_root")]
    pub tasks_root: PathBuf,
    /// Sleep between polls of an idle log file.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Minimum delay between idle repaints of the dashboard.
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
    /// Capacity of the recent-log ring shown under the status line.
    #[serde(default = "default_recent_log_lines")]
    pub recent_log_lines: usize,
    #[serde(default)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Colorize only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            tasks_root: default_tasks_root(),
            poll_interval_ms: default_poll_interval_ms(),
            update_interval_secs: default_update_interval_secs(),
            recent_log_lines: default_recent_log_lines(),
            color: ColorMode::default(),
        }
    }
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    /// Collapse the color tri-state at the TTY boundary.
    pub fn effective_color(&self, is_tty: bool) -> bool {
        match self.color {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn default_tasks_root() -> PathBuf {
    PathBuf::from(taskwatch_paths::DEFAULT_TASKS_ROOT)
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_update_interval_secs() -> u64 {
    1
}

fn default_recent_log_lines() -> usize {
    5
}

/// Load the watcher configuration, honoring the env override.
pub fn load() -> Result<WatchConfig> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return load_file(Path::new(&path));
    }

    let system = Path::new(SYSTEM_CONFIG_PATH);
    if system.exists() {
        return load_file(system);
    }

    Ok(WatchConfig::default())
}

fn load_file(path: &Path) -> Result<WatchConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("cannot parse config file {}", path.display()))
}
