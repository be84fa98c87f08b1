// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zonefile line tokenizer
//!
//! Splits raw zonefile lines into tokens. Quoting state and the partially
//! accumulated token are carried between lines in a caller-owned
//! [`TokenizerState`], so a quoted string may continue on the next line.
//!
//! # Examples
//!
//! ```rust
//! use soacheck::tokenizer::{tokenize, tokenize_line, TokenizerState};
//!
//! assert_eq!(tokenize(r#""a b" (c)"#), vec!["a b", "(", "c", ")"]);
//!
//! let mut state = TokenizerState::new();
//! assert!(tokenize_line(r#"txt "first"#, &mut state) == vec!["txt"]);
//! assert!(state.in_quotes());
//! assert_eq!(tokenize_line(r#"second" end"#, &mut state), vec!["first\nsecond", "end"]);
//! ```

/// Opening brace of a multi-line record
pub const OPEN_BRACE: &str = "(";

/// Closing brace of a multi-line record
pub const CLOSE_BRACE: &str = ")";

const ESCAPE: char = '\\';
const QUOTE: char = '"';
const COMMENT: char = ';';

/// Lexer state carried from one line to the next within a single scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizerState {
    in_quotes: bool,
    buffer: String,
}

impl TokenizerState {
    /// Create a fresh state (not quoted, empty buffer)
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the scan is currently inside a quoted section
    pub fn in_quotes(&self) -> bool {
        self.in_quotes
    }

    /// True once the quote is closed and no partial token is pending
    pub fn is_drained(&self) -> bool {
        !self.in_quotes && self.buffer.is_empty()
    }

    /// Discard any carried quote or partial token
    pub fn reset(&mut self) {
        self.in_quotes = false;
        self.buffer.clear();
    }

    fn flush(&mut self, tokens: &mut Vec<String>) {
        if !self.buffer.is_empty() {
            tokens.push(std::mem::take(&mut self.buffer));
        }
    }
}

/// Tokenize one line, updating the carried state
///
/// Whitespace separates tokens, `(` and `)` are tokens of their own, `"`
/// toggles a quoted section and `;` starts a comment that runs to the end of
/// the line. A backslash makes the following character literal, inside or
/// outside quotes. A quoted section left open at the end of the line keeps
/// accumulating on the next line, joined by a newline.
pub fn tokenize_line(line: &str, state: &mut TokenizerState) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            state.buffer.push(c);
            escaped = false;
            continue;
        }

        if c == ESCAPE {
            escaped = true;
            continue;
        }

        if state.in_quotes {
            if c == QUOTE {
                state.in_quotes = false;
            } else {
                state.buffer.push(c);
            }
            continue;
        }

        match c {
            QUOTE => state.in_quotes = true,
            COMMENT => break,
            '(' | ')' => {
                state.flush(&mut tokens);
                tokens.push(c.to_string());
            }
            c if c.is_whitespace() => state.flush(&mut tokens),
            c => state.buffer.push(c),
        }
    }

    if state.in_quotes {
        state.buffer.push('\n');
    } else {
        state.flush(&mut tokens);
    }

    tokens
}

/// Tokenize a standalone line with a fresh state
///
/// Anything still inside an unterminated quote is dropped.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut state = TokenizerState::new();
    tokenize_line(line, &mut state)
}

/// Case-insensitive keyword comparison
pub fn is_keyword(token: &str, keyword: &str) -> bool {
    token.eq_ignore_ascii_case(keyword)
}
