// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for soacheck
//!
//! The checker is a short-lived process, so metrics are not scraped but
//! written once per run to a file picked up by a node_exporter textfile
//! collector:
//! - Git command execution metrics (count, duration)
//! - Per-file verdicts
//! - History rounds used and run outcome

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use prometheus::{
    opts, register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Encoder, Gauge,
    HistogramVec, TextEncoder,
};
use std::path::Path;

use crate::types::RunReport;

lazy_static! {
    /// Git command counter by command and result
    pub static ref GIT_COMMANDS_TOTAL: CounterVec = register_counter_vec!(
        opts!(
            "soacheck_git_commands_total",
            "Total number of git commands executed"
        ),
        &["command", "result"]
    )
    .expect("Failed to create GIT_COMMANDS_TOTAL metric");

    /// Git command duration histogram
    pub static ref GIT_COMMAND_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "soacheck_git_command_duration_seconds",
        "Git command execution duration in seconds",
        &["command"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to create GIT_COMMAND_DURATION_SECONDS metric");

    /// Files checked by verdict
    pub static ref FILES_CHECKED_TOTAL: CounterVec = register_counter_vec!(
        opts!(
            "soacheck_files_checked_total",
            "Total number of files checked, by verdict"
        ),
        &["verdict"]
    )
    .expect("Failed to create FILES_CHECKED_TOTAL metric");

    /// History rounds used by the last run
    pub static ref HISTORY_ROUNDS: Gauge = register_gauge!(
        opts!(
            "soacheck_history_rounds",
            "Number of history rounds used by the last run"
        )
    )
    .expect("Failed to create HISTORY_ROUNDS metric");

    /// 1 if the last run succeeded, 0 otherwise
    pub static ref LAST_RUN_SUCCESS: Gauge = register_gauge!(
        opts!(
            "soacheck_last_run_success",
            "Whether the last run succeeded"
        )
    )
    .expect("Failed to create LAST_RUN_SUCCESS metric");

    /// Unix time of the last completed run
    pub static ref LAST_RUN_TIMESTAMP_SECONDS: Gauge = register_gauge!(
        opts!(
            "soacheck_last_run_timestamp_seconds",
            "Unix timestamp of the last completed run"
        )
    )
    .expect("Failed to create LAST_RUN_TIMESTAMP_SECONDS metric");

    /// Application info metric
    pub static ref APP_INFO: CounterVec = register_counter_vec!(
        opts!(
            "soacheck_app_info",
            "Application information"
        ),
        &["version"]
    )
    .expect("Failed to create APP_INFO metric");
}

/// Initialize metrics with application info
pub fn init_metrics() {
    APP_INFO
        .with_label_values(&[env!("CARGO_PKG_VERSION")])
        .inc();
}

/// Generate metrics output in Prometheus format
pub fn gather_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record a git command execution
pub fn record_git_command(command: &str, success: bool, duration: f64) {
    let result = if success { "success" } else { "error" };
    GIT_COMMANDS_TOTAL
        .with_label_values(&[command, result])
        .inc();
    GIT_COMMAND_DURATION_SECONDS
        .with_label_values(&[command])
        .observe(duration);
}

/// Record the verdicts and outcome of a validation run
pub fn record_run(report: &RunReport) {
    for file in &report.files {
        FILES_CHECKED_TOTAL
            .with_label_values(&[file.verdict.as_str()])
            .inc();
    }
    HISTORY_ROUNDS.set(f64::from(report.rounds));
    LAST_RUN_SUCCESS.set(if report.success { 1.0 } else { 0.0 });
    LAST_RUN_TIMESTAMP_SECONDS.set(chrono::Utc::now().timestamp() as f64);
}

/// Write the current metrics to `path` for a textfile collector
///
/// The file is written next to its final location and renamed into place so
/// the collector never sees a partial file.
pub fn write_textfile(path: &Path) -> Result<()> {
    let text = gather_metrics().map_err(|e| anyhow::anyhow!("Failed to gather metrics: {}", e))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    std::fs::write(&tmp, text)
        .with_context(|| format!("Failed to write metrics to {}", Path::new(&tmp).display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move metrics into {}", path.display()))?;
    Ok(())
}
