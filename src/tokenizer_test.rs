// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for tokenizer module

use super::tokenizer::*;

#[test]
fn test_quoted_token_and_braces() {
    assert_eq!(tokenize(r#""a b" (c)"#), vec!["a b", "(", "c", ")"]);
}

#[test]
fn test_escaped_space_is_not_a_separator() {
    assert_eq!(tokenize(r"a\ b c"), vec!["a b", "c"]);
}

#[test]
fn test_comment_truncates_line() {
    assert_eq!(tokenize("x ; ignored"), vec!["x"]);
    assert_eq!(tokenize("x;ignored ( )"), vec!["x"]);
    assert!(tokenize("; only a comment").is_empty());
}

#[test]
fn test_empty_and_blank_lines() {
    assert!(tokenize("").is_empty());
    assert!(tokenize(" \t  ").is_empty());
}

#[test]
fn test_whitespace_run_length_does_not_matter() {
    let compact = tokenize("@ IN SOA ns admin ( 1 2 3 4 5 )");
    let spread = tokenize("  @\t\tIN   SOA ns    admin(1  2\t3 4 5)   ");
    assert_eq!(compact, spread);
}

#[test]
fn test_braces_split_adjacent_text() {
    assert_eq!(tokenize("a(b)c"), vec!["a", "(", "b", ")", "c"]);
}

#[test]
fn test_special_characters_inside_quotes_are_literal() {
    assert_eq!(tokenize(r#""a;b (c)" d"#), vec!["a;b (c)", "d"]);
}

#[test]
fn test_escaped_quote_is_copied_literally() {
    assert_eq!(tokenize(r#"say\"hi"#), vec![r#"say"hi"#]);
    assert_eq!(tokenize(r#""in \" quote""#), vec![r#"in " quote"#]);
}

#[test]
fn test_escaped_comment_and_brace() {
    assert_eq!(tokenize(r"a\;b \(c"), vec!["a;b", "(c"]);
}

#[test]
fn test_escaped_backslash() {
    assert_eq!(tokenize(r"a\\ b"), vec![r"a\", "b"]);
}

#[test]
fn test_empty_quotes_emit_nothing() {
    assert_eq!(tokenize(r#"a "" b"#), vec!["a", "b"]);
}

#[test]
fn test_quote_joins_adjacent_text() {
    assert_eq!(tokenize(r#"ab"c d"e f"#), vec!["abc de", "f"]);
}

#[test]
fn test_quoted_section_spans_lines() {
    let mut state = TokenizerState::new();

    let first = tokenize_line(r#"txt "line one"#, &mut state);
    assert_eq!(first, vec!["txt"]);
    assert!(state.in_quotes());
    assert!(!state.is_drained());

    let second = tokenize_line(r#"line two" tail"#, &mut state);
    assert_eq!(second, vec!["line one\nline two", "tail"]);
    assert!(state.is_drained());
}

#[test]
fn test_comment_marker_inside_multiline_quote() {
    let mut state = TokenizerState::new();
    tokenize_line(r#"""#, &mut state);
    let tokens = tokenize_line(r#"; not a comment" x"#, &mut state);
    assert_eq!(tokens, vec!["\n; not a comment", "x"]);
}

#[test]
fn test_reset_discards_carried_state() {
    let mut state = TokenizerState::new();
    tokenize_line(r#""open"#, &mut state);
    assert!(state.in_quotes());

    state.reset();
    assert!(state.is_drained());
    assert_eq!(tokenize_line("a b", &mut state), vec!["a", "b"]);
}

#[test]
fn test_is_keyword_ignores_case() {
    assert!(is_keyword("soa", "SOA"));
    assert!(is_keyword("SoA", "SOA"));
    assert!(!is_keyword("SOAX", "SOA"));
}
