// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! History-walking serial validation
//!
//! For every changed file the serial at the target revision is compared with
//! the serial at the target's parent. When the parent's serial is unusable
//! (a broken intermediate commit, say) the file is retried against the
//! grandparent, then the next ancestor, and so on. All files share the same
//! history depth within a round, and the walk stops after a bounded number
//! of rounds.
//!
//! # Example
//!
//! ```rust
//! use soacheck::revision::InMemoryHistory;
//! use soacheck::validator::HistoryValidator;
//!
//! let mut history = InMemoryHistory::new();
//! history.commit("r1", [("db.example", "@ IN SOA ns admin ( 1 1 1 1 1 )")]);
//! history.commit("r2", [("db.example", "@ IN SOA ns admin ( 2 1 1 1 1 )")]);
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build()?;
//! let report = rt.block_on(
//!     HistoryValidator::new(&history).validate("r2", vec!["db.example".to_string()]),
//! )?;
//! assert!(report.success);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::revision::RevisionSource;
use crate::serial::{extract_serial, Serial};
use crate::types::{Exhaustion, FileCheck, RunReport, Verdict};

/// Default number of history rounds before giving up
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Validates serial increments of a fixed set of files
pub struct HistoryValidator<'a, S> {
    source: &'a S,
    max_rounds: u32,
}

impl<'a, S: RevisionSource> HistoryValidator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Override the retry budget (at least one round is always performed)
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Validate `paths` at `target` against its ancestors
    ///
    /// Per-file problems end up in the report. Backend failures, such as a
    /// missing git binary or a target revision that does not resolve, are
    /// returned as errors.
    pub async fn validate(&self, target: &str, paths: Vec<String>) -> Result<RunReport> {
        let target_rev = self
            .source
            .resolve_ancestor(target, 0)
            .await
            .with_context(|| format!("unknown target revision {}", target))?;
        debug!("target {} resolved to {}", target, target_rev);

        let mut files: Vec<FileCheck> = paths.into_iter().map(FileCheck::new).collect();

        for file in files.iter_mut() {
            if !self.source.revision_exists(&file.path, &target_rev).await? {
                info!("{}: absent at {}, skipping", file.path, target);
                file.settle(
                    Verdict::Skipped,
                    Some(format!("absent at target revision {}", target)),
                );
                continue;
            }
            file.post_serial = self.serial_at(&file.path, &target_rev).await?;
        }

        let mut rounds = 0;
        let mut exhaustion = None;
        let mut finished = false;

        for round in 0..self.max_rounds {
            let generations_back = round + 1;
            let previous = match self
                .source
                .resolve_ancestor(&target_rev, generations_back)
                .await
            {
                Ok(rev) => rev,
                Err(e) => {
                    warn!("history exhausted at {}~{}: {:#}", target, generations_back, e);
                    exhaustion = Some(Exhaustion::HistoryExhausted { generations_back });
                    break;
                }
            };
            rounds = generations_back;
            info!(
                "round {}: comparing {} against {} ({}~{})",
                rounds, target, previous, target, generations_back
            );

            // The first round checks everything; later rounds only revisit
            // files whose baseline serial was unusable in the round before.
            let scheduled = if round == 0 {
                Verdict::Pending
            } else {
                Verdict::Unresolved
            };

            for file in files.iter_mut().filter(|f| f.verdict == scheduled) {
                file.pre_serial = self.serial_at(&file.path, &previous).await?;
                file.baseline = Some(previous.clone());
                evaluate(file);
            }

            if !files.iter().any(|f| f.verdict == Verdict::Unresolved) {
                finished = true;
                break;
            }
        }

        if !finished && exhaustion.is_none() {
            exhaustion = Some(Exhaustion::RoundsExceeded {
                rounds: self.max_rounds,
            });
        }
        if let Some(reason) = &exhaustion {
            error!("{}", reason);
            for file in files.iter_mut().filter(|f| f.verdict == Verdict::Pending) {
                file.settle(
                    Verdict::Unresolved,
                    Some("no baseline revision available".to_string()),
                );
            }
        }

        let success = finished && !files.iter().any(|f| f.verdict == Verdict::Failed);

        Ok(RunReport {
            target: target.to_string(),
            files,
            rounds,
            exhaustion,
            success,
        })
    }

    /// Serial of `path` at `revision`, `None` when unavailable for any reason
    async fn serial_at(&self, path: &str, revision: &str) -> Result<Option<Serial>> {
        if !self.source.revision_exists(path, revision).await? {
            debug!("{}: absent at {}", path, revision);
            return Ok(None);
        }

        let text = match self.source.read_file_at(path, revision).await {
            Ok(text) => text,
            Err(e) => {
                debug!("{}: cannot read at {}: {:#}", path, revision, e);
                return Ok(None);
            }
        };

        match extract_serial(&text) {
            Ok(serial) => Ok(Some(serial)),
            Err(e) => {
                debug!("{}: no serial at {}: {}", path, revision, e);
                Ok(None)
            }
        }
    }
}

/// Apply the validation rules to a file whose serials have been read
fn evaluate(file: &mut FileCheck) {
    let baseline = file.baseline.clone().unwrap_or_default();
    let post = file.post_serial.clone();
    let pre = file.pre_serial.clone();

    match (post.as_ref(), pre.as_ref()) {
        (None, None) => {
            debug!("{}: no serial at either revision, not a zonefile", file.path);
            file.settle(Verdict::Skipped, Some("not a zonefile".to_string()));
        }
        (Some(post), None) => {
            warn!("{}: no serial at {}, treating as new zonefile", file.path, baseline);
            if post.is_numeric() {
                file.settle(Verdict::PassedNewFile, None);
            } else {
                error!("{}: serial '{}' is not a number", file.path, post);
                file.settle(
                    Verdict::Failed,
                    Some(format!("serial '{}' is not a number", post)),
                );
            }
        }
        (_, Some(pre)) if !pre.is_numeric() => {
            info!(
                "{}: serial '{}' at {} is not a number, looking further back",
                file.path, pre, baseline
            );
            file.settle(
                Verdict::Unresolved,
                Some(format!("serial '{}' at {} is not a number", pre, baseline)),
            );
        }
        (None, Some(_)) => {
            error!("{}: no serial at target revision", file.path);
            file.settle(
                Verdict::Failed,
                Some("no serial at target revision".to_string()),
            );
        }
        (Some(post), Some(_)) if !post.is_numeric() => {
            error!("{}: serial '{}' is not a number", file.path, post);
            file.settle(
                Verdict::Failed,
                Some(format!("serial '{}' is not a number", post)),
            );
        }
        (Some(post), Some(pre)) => {
            if post.is_incremented_from(pre) == Some(true) {
                info!("{}: serial {} -> {}", file.path, pre, post);
                file.settle(Verdict::Passed, None);
            } else {
                error!("{}: serial not incremented ({} -> {})", file.path, pre, post);
                file.settle(
                    Verdict::Failed,
                    Some(format!("serial not incremented ({} -> {})", pre, post)),
                );
            }
        }
    }
}
