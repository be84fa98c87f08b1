// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record boundary detection
//!
//! A zonefile record may span several lines when wrapped in parentheses.
//! This module decides, from the tokens accumulated so far, whether the
//! logical record has been closed.

use thiserror::Error;

use crate::tokenizer::{CLOSE_BRACE, OPEN_BRACE};

/// Whether an accumulated record is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// Braces are balanced and no quote is open
    Closed,
    /// More lines are needed
    Open,
}

/// More closing than opening parentheses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unbalanced closing parenthesis at token {position}")]
pub struct UnbalancedClose {
    /// Index of the offending `)` token
    pub position: usize,
}

/// Check whether `tokens` form a closed record
///
/// An open quote always means the record continues. Otherwise the record is
/// closed iff every `(` is matched by a later `)`. A `)` without a matching
/// `(` is reported as an error, distinct from "not closed yet".
pub fn record_status<T: AsRef<str>>(
    tokens: &[T],
    in_quotes: bool,
) -> Result<RecordStatus, UnbalancedClose> {
    if in_quotes {
        return Ok(RecordStatus::Open);
    }

    let mut depth: usize = 0;
    for (position, token) in tokens.iter().enumerate() {
        match token.as_ref() {
            OPEN_BRACE => depth += 1,
            CLOSE_BRACE => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(UnbalancedClose { position })?;
            }
            _ => {}
        }
    }

    if depth == 0 {
        Ok(RecordStatus::Closed)
    } else {
        Ok(RecordStatus::Open)
    }
}
