// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Access to file contents across version-control revisions
//!
//! [`RevisionSource`] is the seam between the history walk and the version
//! control backend. [`crate::git::GitExecutor`] implements it on top of the
//! `git` binary; [`InMemoryHistory`] keeps a linear history in memory.

use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Revision lookup backend
#[allow(async_fn_in_trait)]
pub trait RevisionSource {
    /// Whether `path` exists at `revision`
    async fn revision_exists(&self, path: &str, revision: &str) -> Result<bool>;

    /// Full text of `path` at `revision`; fails if the file is absent
    async fn read_file_at(&self, path: &str, revision: &str) -> Result<String>;

    /// Paths that differ between `from` and `to`, in backend order
    async fn changed_paths(&self, from: &str, to: &str) -> Result<Vec<String>>;

    /// The revision `generations_back` first-parent steps before `revision`
    async fn resolve_ancestor(&self, revision: &str, generations_back: u32) -> Result<String>;
}

#[derive(Debug, Clone)]
struct Commit {
    id: String,
    files: BTreeMap<String, String>,
}

/// Linear, in-memory revision history (oldest commit first)
///
/// # Example
///
/// ```rust
/// use soacheck::revision::InMemoryHistory;
///
/// let mut history = InMemoryHistory::new();
/// history.commit("r1", [("db.example", "@ IN SOA ns admin ( 1 1 1 1 1 )")]);
/// history.commit("r2", [("db.example", "@ IN SOA ns admin ( 2 1 1 1 1 )")]);
/// assert_eq!(history.head(), Some("r2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    commits: Vec<Commit>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit holding exactly the given files
    pub fn commit<I, P, C>(&mut self, id: &str, files: I) -> &mut Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        self.commits.push(Commit {
            id: id.to_string(),
            files: files
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        });
        self
    }

    /// Id of the newest commit
    pub fn head(&self) -> Option<&str> {
        self.commits.last().map(|c| c.id.as_str())
    }

    fn find(&self, revision: &str) -> Result<(usize, &Commit)> {
        self.commits
            .iter()
            .enumerate()
            .find(|(_, c)| c.id == revision)
            .ok_or_else(|| anyhow!("unknown revision: {}", revision))
    }
}

impl RevisionSource for InMemoryHistory {
    async fn revision_exists(&self, path: &str, revision: &str) -> Result<bool> {
        let (_, commit) = self.find(revision)?;
        Ok(commit.files.contains_key(path))
    }

    async fn read_file_at(&self, path: &str, revision: &str) -> Result<String> {
        let (_, commit) = self.find(revision)?;
        commit
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("{} does not exist at {}", path, revision))
    }

    async fn changed_paths(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let (_, a) = self.find(from)?;
        let (_, b) = self.find(to)?;
        let paths: BTreeSet<&String> = a.files.keys().chain(b.files.keys()).collect();
        Ok(paths
            .into_iter()
            .filter(|p| a.files.get(*p) != b.files.get(*p))
            .cloned()
            .collect())
    }

    async fn resolve_ancestor(&self, revision: &str, generations_back: u32) -> Result<String> {
        let (index, _) = self.find(revision)?;
        let back = generations_back as usize;
        index
            .checked_sub(back)
            .map(|i| self.commits[i].id.clone())
            .ok_or_else(|| anyhow!("{}~{} is beyond the start of history", revision, generations_back))
    }
}
