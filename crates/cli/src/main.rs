mod config;
mod follow;
mod interrupt;
mod monitor;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use follow::LogFollower;
use monitor::MonitorConfig;
use std::io::{self, IsTerminal};
use taskwatch_core::index::read_active_tasks;
use taskwatch_core::select::{choose, filter_restore_like};
use taskwatch_core::{TaskRecord, TerminalStatus};
use taskwatch_paths::{active_index_path, resolve_task_log, shard_for};

#[derive(Parser)]
#[command(
    name = "taskwatch",
    about = "Live terminal dashboard for hypervisor restore-task logs"
)]
struct Cli {
    /// Enable debug diagnostics on stderr
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();

    match run() {
        Ok(status) => {
            println!("{}", status.summary_line());
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Select a task, resolve its log, and monitor it to a terminal status.
///
/// Absent-input conditions (no task, unresolvable log) are statuses, not
/// errors; only genuine startup failures (unreadable config, unopenable
/// log file) propagate as errors.
fn run() -> Result<TerminalStatus> {
    let cfg = config::load()?;

    let index = active_index_path(&cfg.tasks_root);
    let tasks = read_active_tasks(&index);
    tracing::debug!(count = tasks.len(), index = %index.display(), "loaded active tasks");

    let candidates = filter_restore_like(tasks);
    tracing::debug!(count = candidates.len(), "filtered restore-like tasks");

    let Some(task) = choose(candidates) else {
        return Ok(TerminalStatus::NoTask);
    };
    print_monitoring_header(&task);

    let Some(log_path) = resolve_task_log(&cfg.tasks_root, &task.upid) else {
        if let Err(reason) = shard_for(&task.upid) {
            tracing::debug!(%reason, "task identifier cannot be sharded");
        }
        return Ok(TerminalStatus::LogMissing);
    };
    println!("Log file: {}", log_path.display());

    interrupt::install();

    let mut follower = LogFollower::open(&log_path, cfg.poll_interval())
        .with_context(|| format!("cannot open task log {}", log_path.display()))?;

    let stdout = io::stdout();
    let is_tty = stdout.is_terminal();
    let monitor_cfg = MonitorConfig {
        update_interval: cfg.update_interval(),
        recent_log_lines: cfg.recent_log_lines,
        color: cfg.effective_color(is_tty),
    };

    let outcome = monitor::run_monitor(
        &mut follower,
        &mut stdout.lock(),
        is_tty,
        &monitor_cfg,
        interrupt::flag(),
    )?;
    tracing::debug!(samples = outcome.estimator.len(), "monitoring finished");

    Ok(outcome.status)
}

fn print_monitoring_header(task: &TaskRecord) {
    let action = if task.action.is_empty() {
        "unknown"
    } else {
        task.action.as_str()
    };
    let node = if task.node.is_empty() {
        "unknown"
    } else {
        task.node.as_str()
    };
    println!(
        "Monitoring restore task: action={action} node={node} upid={}",
        task.upid
    );
    if let Some(started) = task.start_time() {
        println!("Task started: {}", started.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}
