// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Changed-path filtering
//!
//! Narrows the set of changed paths down to the files worth validating.

use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

/// Path filter errors
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Include/exclude regular expressions applied to repository paths
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

fn compile<S: AsRef<str>>(patterns: &[S], kind: &'static str) -> Result<Vec<Regex>, FilterError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|source| FilterError::InvalidPattern {
                kind,
                pattern: p.as_ref().to_string(),
                source,
            })
        })
        .collect()
}

impl PathFilter {
    /// Build a filter; an empty include list accepts every path
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, FilterError> {
        Ok(Self {
            include: compile(include, "include")?,
            exclude: compile(exclude, "exclude")?,
        })
    }

    /// Whether a single path passes the filter
    pub fn matches(&self, path: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|r| r.is_match(path));
        included && !self.exclude.iter().any(|r| r.is_match(path))
    }

    /// Deduplicate and filter, keeping first-seen order
    pub fn apply<I>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        paths
            .into_iter()
            .filter(|p| self.matches(p))
            .filter(|p| seen.insert(p.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = PathFilter::new::<&str>(&[], &[]).unwrap();
        assert!(filter.matches("anything"));
    }

    #[test]
    fn test_include_and_exclude() {
        let filter = PathFilter::new(&[r"^zones/", r"\.zone$"], &[r"^zones/archive/"]).unwrap();
        assert!(filter.matches("zones/db.example"));
        assert!(filter.matches("other/example.zone"));
        assert!(!filter.matches("zones/archive/db.old"));
        assert!(!filter.matches("README.md"));
    }

    #[test]
    fn test_apply_deduplicates_in_order() {
        let filter = PathFilter::new(&[r"^zones/"], &[]).unwrap();
        let result = filter.apply(owned(&[
            "zones/b",
            "README.md",
            "zones/a",
            "zones/b",
        ]));
        assert_eq!(result, owned(&["zones/b", "zones/a"]));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = PathFilter::new(&["("], &[]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("include"));
        assert!(message.contains("'('"));

        let err = PathFilter::new(&["ok"], &["[z-a]"]).unwrap_err();
        assert!(err.to_string().contains("exclude"));
    }
}
