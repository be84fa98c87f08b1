// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common types shared by the validator, the binaries and metrics

use serde::Serialize;
use std::fmt::Write as _;

use crate::serial::Serial;

/// Per-file result of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Not evaluated yet
    Pending,
    /// Serial was incremented
    Passed,
    /// No serial at the baseline revision, target serial is valid
    PassedNewFile,
    /// Serial invalid or not incremented
    Failed,
    /// Every baseline tried had an invalid serial
    Unresolved,
    /// Not a zonefile, or absent at the target revision
    Skipped,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pending => "pending",
            Verdict::Passed => "passed",
            Verdict::PassedNewFile => "passed_new_file",
            Verdict::Failed => "failed",
            Verdict::Unresolved => "unresolved",
            Verdict::Skipped => "skipped",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Verdict::Pending => "PEND",
            Verdict::Passed => "PASS",
            Verdict::PassedNewFile => "WARN",
            Verdict::Failed => "FAIL",
            Verdict::Unresolved => "FAIL",
            Verdict::Skipped => "SKIP",
        }
    }
}

/// Validation state and outcome for one file
#[derive(Debug, Clone, Serialize)]
pub struct FileCheck {
    pub path: String,
    /// Serial at the target revision
    pub post_serial: Option<Serial>,
    /// Serial at the baseline revision used last
    pub pre_serial: Option<Serial>,
    /// Baseline revision the pre serial was read from
    pub baseline: Option<String>,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FileCheck {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            post_serial: None,
            pre_serial: None,
            baseline: None,
            verdict: Verdict::Pending,
            reason: None,
        }
    }

    pub(crate) fn settle(&mut self, verdict: Verdict, reason: Option<String>) {
        self.verdict = verdict;
        self.reason = reason;
    }
}

/// Why the history walk could not find a usable baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exhaustion {
    /// The retry budget ran out
    RoundsExceeded { rounds: u32 },
    /// The ancestor `generations_back` steps before the target does not exist
    HistoryExhausted { generations_back: u32 },
}

impl std::fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exhaustion::RoundsExceeded { rounds } => write!(
                f,
                "could not find a valid baseline within {} revisions",
                rounds
            ),
            Exhaustion::HistoryExhausted { generations_back } => write!(
                f,
                "could not find a valid baseline: history ends before {} generations back",
                generations_back
            ),
        }
    }
}

/// Outcome of a full validation run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Revision whose serials were validated
    pub target: String,
    pub files: Vec<FileCheck>,
    /// Number of history rounds performed
    pub rounds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhaustion: Option<Exhaustion>,
    pub success: bool,
}

impl RunReport {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.files.iter().filter(|f| f.verdict == verdict).count()
    }

    /// Human readable summary, one line per file plus a final verdict
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for file in &self.files {
            let _ = write!(out, "{} {}", file.verdict.label(), file.path);
            match (&file.pre_serial, &file.post_serial) {
                (Some(pre), Some(post)) => {
                    let _ = write!(out, " ({} -> {})", pre, post);
                }
                (None, Some(post)) => {
                    let _ = write!(out, " (new serial {})", post);
                }
                _ => {}
            }
            if let Some(reason) = &file.reason {
                let _ = write!(out, ": {}", reason);
            }
            out.push('\n');
        }

        if let Some(exhaustion) = &self.exhaustion {
            let _ = writeln!(out, "error: {}", exhaustion);
        }

        let _ = writeln!(
            out,
            "{}: {} passed, {} failed, {} unresolved, {} skipped ({} round{})",
            if self.success { "OK" } else { "FAILED" },
            self.count(Verdict::Passed) + self.count(Verdict::PassedNewFile),
            self.count(Verdict::Failed),
            self.count(Verdict::Unresolved),
            self.count(Verdict::Skipped),
            self.rounds,
            if self.rounds == 1 { "" } else { "s" },
        );

        out
    }
}
