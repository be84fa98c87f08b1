// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Git command execution
//!
//! This module reads file contents and history through the system's git
//! binary. Every invocation is timed and recorded in the metrics registry.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Output;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, error};

use crate::metrics;
use crate::revision::RevisionSource;

/// Git command executor
pub struct GitExecutor {
    pub(crate) git_path: String,
    pub(crate) repo_dir: Option<PathBuf>,
}

impl GitExecutor {
    /// Create a new git executor
    ///
    /// # Arguments
    /// * `git_path` - Path to the git binary (default: "git", looked up in PATH)
    /// * `repo_dir` - Working tree to run in (default: current directory)
    pub fn new(git_path: Option<String>, repo_dir: Option<PathBuf>) -> Self {
        Self {
            git_path: git_path.unwrap_or_else(|| "git".to_string()),
            repo_dir,
        }
    }

    /// Run a git command and return its raw output, whatever the exit status
    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("Executing git command: {} {:?}", self.git_path, args);

        let start = Instant::now();
        let command_name = args.first().copied().unwrap_or("unknown");

        let mut cmd = Command::new(&self.git_path);
        cmd.args(args);
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .await
            .context("Failed to execute git command")?;

        let duration = start.elapsed().as_secs_f64();
        metrics::record_git_command(command_name, output.status.success(), duration);

        Ok(output)
    }

    /// Run a git command, failing on a non-zero exit status
    ///
    /// # Returns
    /// The stdout output from git on success
    async fn execute(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("git command failed: {}", stderr.trim());
            return Err(anyhow::anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// `<revision>:<path>` object name
pub(crate) fn object_spec(revision: &str, path: &str) -> String {
    format!("{}:{}", revision, path)
}

/// First-parent ancestor expression, committed to a commit object
pub(crate) fn ancestor_spec(revision: &str, generations_back: u32) -> String {
    format!("{}~{}^{{commit}}", revision, generations_back)
}

/// Split NUL-terminated `-z` output into paths
pub(crate) fn split_nul(stdout: &str) -> Vec<String> {
    stdout
        .split('\0')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl RevisionSource for GitExecutor {
    async fn revision_exists(&self, path: &str, revision: &str) -> Result<bool> {
        let output = self
            .run(&["cat-file", "-e", &object_spec(revision, path)])
            .await?;
        Ok(output.status.success())
    }

    async fn read_file_at(&self, path: &str, revision: &str) -> Result<String> {
        self.execute(&["show", &object_spec(revision, path)]).await
    }

    async fn changed_paths(&self, from: &str, to: &str) -> Result<Vec<String>> {
        // -z keeps paths verbatim; without it non-ASCII names come back C-quoted
        let stdout = self
            .execute(&["diff", "--name-only", "--no-renames", "-z", from, to])
            .await?;
        Ok(split_nul(&stdout))
    }

    async fn resolve_ancestor(&self, revision: &str, generations_back: u32) -> Result<String> {
        let stdout = self
            .execute(&[
                "rev-parse",
                "--verify",
                "--quiet",
                &ancestor_spec(revision, generations_back),
            ])
            .await
            .with_context(|| format!("cannot resolve {}~{}", revision, generations_back))?;
        Ok(stdout.trim().to_string())
    }
}

impl Clone for GitExecutor {
    fn clone(&self) -> Self {
        Self {
            git_path: self.git_path.clone(),
            repo_dir: self.repo_dir.clone(),
        }
    }
}
