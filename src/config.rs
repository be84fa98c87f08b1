// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Revision range configuration
//!
//! Decides which revisions the checker compares. Explicit values win; when
//! no base is given the range is taken from well-known CI environment
//! variables, falling back to the target's parent.

use serde::Serialize;
use tracing::debug;

/// Target revision used when none is configured
pub const DEFAULT_TARGET: &str = "HEAD";

/// Range of revisions whose changed files are validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionRange {
    pub base: String,
    pub target: String,
    /// Where the range came from ("arguments", "travis", ...)
    pub origin: &'static str,
}

/// Split `a...b` or `a..b`
fn split_range(range: &str) -> Option<(String, String)> {
    let (base, target) = range
        .split_once("...")
        .or_else(|| range.split_once(".."))?;
    if base.is_empty() || target.is_empty() {
        return None;
    }
    Some((base.to_string(), target.to_string()))
}

/// Detect a revision range from CI environment variables
///
/// `lookup` returns the value of an environment variable; empty values are
/// treated as unset.
pub fn detect_ci_range<F>(lookup: F) -> Option<RevisionRange>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some((base, target)) = get("TRAVIS_COMMIT_RANGE").and_then(|r| split_range(&r)) {
        return Some(RevisionRange {
            base,
            target,
            origin: "travis",
        });
    }

    if let (Some(base), Some(target)) = (get("CI_MERGE_REQUEST_DIFF_BASE_SHA"), get("CI_COMMIT_SHA")) {
        return Some(RevisionRange {
            base,
            target,
            origin: "gitlab",
        });
    }

    if let (Some(base_ref), Some(target)) = (get("GITHUB_BASE_REF"), get("GITHUB_SHA")) {
        return Some(RevisionRange {
            base: format!("origin/{}", base_ref),
            target,
            origin: "github",
        });
    }

    None
}

/// Resolve the revision range from explicit values and the environment
pub fn resolve_range<F>(base: Option<String>, target: Option<String>, lookup: F) -> RevisionRange
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base) = base {
        return RevisionRange {
            base,
            target: target.unwrap_or_else(|| DEFAULT_TARGET.to_string()),
            origin: "arguments",
        };
    }

    if let Some(mut range) = detect_ci_range(&lookup) {
        debug!("revision range detected from {} environment", range.origin);
        if let Some(target) = target {
            range.target = target;
        }
        return range;
    }

    let target = target.unwrap_or_else(|| DEFAULT_TARGET.to_string());
    RevisionRange {
        base: format!("{}~1", target),
        target,
        origin: "default",
    }
}

/// Environment lookup backed by the process environment
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
