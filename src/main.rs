// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS zonefile serial checker
//!
//! Finds the zonefiles changed between two revisions of a git repository and
//! fails when any of them was modified without incrementing its SOA serial.
//! Intended to run as a CI step or a pre-push hook.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

use soacheck::{
    cli::SoacheckCli,
    config::{process_env, resolve_range},
    filter::PathFilter,
    git::GitExecutor,
    logging, metrics,
    revision::RevisionSource,
    validator::HistoryValidator,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = SoacheckCli::parse();

    logging::init_tracing(cli.log_format);
    debug!("starting soacheck v{}", env!("CARGO_PKG_VERSION"));

    // initialize metrics
    metrics::init_metrics();

    let filter = PathFilter::new(cli.include.as_slice(), cli.exclude.as_slice())
        .context("invalid path filter pattern")?;
    let git = GitExecutor::new(cli.git.clone(), cli.repo.clone());
    let range = resolve_range(cli.base.clone(), cli.target.clone(), process_env);

    let candidates = if cli.paths.is_empty() {
        info!(
            "checking files changed in {}..{} (from {})",
            range.base, range.target, range.origin
        );
        git.changed_paths(&range.base, &range.target)
            .await
            .with_context(|| {
                format!(
                    "failed to list files changed between {} and {}",
                    range.base, range.target
                )
            })?
    } else {
        info!("checking {} file(s) given on the command line", cli.paths.len());
        cli.paths.clone()
    };

    let paths = filter.apply(candidates);
    if paths.is_empty() {
        info!("no files to check");
        return Ok(ExitCode::SUCCESS);
    }
    debug!("files to check: {:?}", paths);

    let report = HistoryValidator::new(&git)
        .with_max_rounds(cli.max_rounds)
        .validate(&range.target, paths)
        .await
        .context("validation aborted")?;

    metrics::record_run(&report);
    if let Some(path) = &cli.metrics_file {
        if let Err(e) = metrics::write_textfile(path) {
            warn!("failed to write metrics: {:#}", e);
        }
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", report.render_text());
    }

    if report.success {
        Ok(ExitCode::SUCCESS)
    } else {
        error!("serial check failed");
        Ok(ExitCode::FAILURE)
    }
}
