// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! SOA serial extraction
//!
//! Scans a zonefile snapshot top to bottom for a line carrying an `SOA`
//! token, accumulates tokens from that line onwards until the record is
//! closed and reads the serial at its fixed position after `SOA`.
//!
//! # Examples
//!
//! ```rust
//! use soacheck::serial::extract_serial;
//!
//! let zone = "@ IN SOA ns1.example.com. admin.example.com. (\n\
//!             2024010100 ; serial\n\
//!             3600 600 604800 86400 )\n";
//! assert_eq!(extract_serial(zone).unwrap().as_str(), "2024010100");
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::record::{record_status, RecordStatus};
use crate::tokenizer::{is_keyword, tokenize_line, TokenizerState};

/// Distance from the `SOA` token to the serial: primary, mailbox, `(`, serial
pub const SERIAL_OFFSET: usize = 4;

const SOA_KEYWORD: &str = "SOA";

/// Serial extraction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerialError {
    #[error("no SOA record found")]
    NotFound,

    #[error("SOA record starting at line {line} is never closed")]
    Unterminated { line: usize },

    #[error("SOA record starting at line {line} has unbalanced parentheses")]
    Malformed { line: usize },

    #[error(
        "SOA record starting at line {line} closed with {len} tokens, serial expected at index {index}"
    )]
    OutOfRange {
        line: usize,
        index: usize,
        len: usize,
    },
}

/// Raw serial token as found in a zonefile
///
/// The value is kept verbatim; [`Serial::is_numeric`] tells whether it is a
/// usable non-negative decimal integer. Comparison is numeric and works for
/// any number of digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is made only of ASCII decimal digits
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// Digits with leading zeros removed ("0" for zero)
    fn significant_digits(&self) -> Option<&str> {
        if !self.is_numeric() {
            return None;
        }
        let trimmed = self.0.trim_start_matches('0');
        Some(if trimmed.is_empty() { "0" } else { trimmed })
    }

    /// Numeric comparison, `None` if either side is not numeric
    pub fn numeric_cmp(&self, other: &Serial) -> Option<Ordering> {
        let a = self.significant_digits()?;
        let b = other.significant_digits()?;
        Some(a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
    }

    /// True when `self` is numerically greater than `previous`
    pub fn is_incremented_from(&self, previous: &Serial) -> Option<bool> {
        self.numeric_cmp(previous).map(|o| o == Ordering::Greater)
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the SOA serial from a zonefile snapshot
///
/// Every line containing a standalone, case-insensitive `SOA` token starts
/// an attempt. The first attempt that yields a serial wins. When every
/// attempt fails, the first failure is returned; without any `SOA` token the
/// result is [`SerialError::NotFound`].
pub fn extract_serial(text: &str) -> Result<Serial, SerialError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut first_failure = None;

    for (start, line) in lines.iter().enumerate() {
        let mut probe = TokenizerState::new();
        let Some(soa_index) = tokenize_line(line, &mut probe)
            .iter()
            .position(|t| is_keyword(t, SOA_KEYWORD))
        else {
            continue;
        };

        match read_record(&lines[start..], start + 1, soa_index) {
            Ok(serial) => {
                debug!("found serial {} in SOA record at line {}", serial, start + 1);
                return Ok(serial);
            }
            Err(e) => {
                debug!("SOA attempt failed: {}", e);
                first_failure.get_or_insert(e);
            }
        }
    }

    Err(first_failure.unwrap_or(SerialError::NotFound))
}

/// Accumulate tokens from the SOA line until the record closes
fn read_record(lines: &[&str], line_no: usize, soa_index: usize) -> Result<Serial, SerialError> {
    let mut state = TokenizerState::new();
    let mut tokens: Vec<String> = Vec::new();

    for line in lines {
        tokens.extend(tokenize_line(line, &mut state));

        match record_status(&tokens, state.in_quotes()) {
            Ok(RecordStatus::Open) => continue,
            Ok(RecordStatus::Closed) => {
                debug_assert!(state.is_drained());
                let index = soa_index + SERIAL_OFFSET;
                if tokens.len() <= index {
                    return Err(SerialError::OutOfRange {
                        line: line_no,
                        index,
                        len: tokens.len(),
                    });
                }
                return Ok(Serial::new(tokens.swap_remove(index)));
            }
            Err(_) => return Err(SerialError::Malformed { line: line_no }),
        }
    }

    Err(SerialError::Unterminated { line: line_no })
}
