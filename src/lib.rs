// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! soacheck - verify DNS zonefile SOA serial increments across git history
//!
//! A small library, with two command line tools on top, for checking that
//! every changed zonefile carries a larger SOA serial than its previous
//! revision.
//!
//! # Features
//!
//! - Zonefile tokenizing with quotes, escapes, comments and multi-line records
//! - SOA serial extraction with typed failure reasons
//! - History walking past broken intermediate revisions, with a bounded budget
//! - Git backend running the `git` binary asynchronously
//! - Include/exclude path filtering and CI revision range detection
//! - Prometheus metrics written for a textfile collector
//! - Flash image layout parsing, image build and extract (`flashimg`)
//!
//! # Usage
//!
//! ## Extracting a Serial
//!
//! ```rust
//! use soacheck::extract_serial;
//!
//! let zone = "$TTL 3600\n\
//!             @ IN SOA ns1.example.com. admin.example.com. (\n\
//!                 2025010101 ; serial\n\
//!                 3600 600 604800 86400 )\n";
//!
//! let serial = extract_serial(zone).unwrap();
//! assert_eq!(serial.as_str(), "2025010101");
//! ```
//!
//! ## Validating Against Git History
//!
//! ```rust,no_run
//! use soacheck::{GitExecutor, HistoryValidator, RevisionSource};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let git = GitExecutor::new(None, None);
//!     let paths = git.changed_paths("HEAD~1", "HEAD").await?;
//!
//!     let report = HistoryValidator::new(&git).validate("HEAD", paths).await?;
//!     print!("{}", report.render_text());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## As a Binary
//!
//! ```bash
//! cargo install soacheck
//! soacheck --include '^zones/'
//! flashimg show --layout '256k(boot),-(rootfs)' --image-size 8M
//! ```

pub mod cli;
pub mod config;
pub mod filter;
pub mod git;
pub mod image;
pub mod layout;
pub mod layout_parser;
pub mod logging;
pub mod metrics;
pub mod record;
pub mod revision;
pub mod serial;
pub mod tokenizer;
pub mod types;
pub mod validator;

// Re-export commonly used types

// Serial checking
pub use git::GitExecutor;
pub use revision::{InMemoryHistory, RevisionSource};
pub use serial::{extract_serial, Serial, SerialError};
pub use types::{FileCheck, RunReport, Verdict};
pub use validator::HistoryValidator;

// Flash layouts
pub use layout::{Layout, Notation, Partition};
pub use layout_parser::{parse_layout, LayoutParseError};

// Test modules
#[cfg(test)]
mod cli_test;
#[cfg(test)]
mod serial_tests;
#[cfg(test)]
mod tokenizer_test;
#[cfg(test)]
mod types_test;
