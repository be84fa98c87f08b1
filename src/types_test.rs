// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for types module

use super::serial::Serial;
use super::types::*;

fn checked(path: &str, pre: Option<&str>, post: Option<&str>, verdict: Verdict) -> FileCheck {
    let mut file = FileCheck::new(path);
    file.pre_serial = pre.map(Serial::new);
    file.post_serial = post.map(Serial::new);
    file.settle(verdict, None);
    file
}

fn report(files: Vec<FileCheck>, exhaustion: Option<Exhaustion>) -> RunReport {
    let success = exhaustion.is_none()
        && files
            .iter()
            .all(|f| !matches!(f.verdict, Verdict::Failed | Verdict::Unresolved));
    RunReport {
        target: "HEAD".to_string(),
        files,
        rounds: 1,
        exhaustion,
        success,
    }
}

#[test]
fn test_new_file_check_is_pending() {
    let file = FileCheck::new("zones/db.example");
    assert_eq!(file.verdict, Verdict::Pending);
    assert!(file.pre_serial.is_none());
    assert!(file.post_serial.is_none());
    assert!(file.reason.is_none());
}

#[test]
fn test_verdict_serialization() {
    assert_eq!(
        serde_json::to_string(&Verdict::PassedNewFile).unwrap(),
        "\"passed_new_file\""
    );
    assert_eq!(Verdict::Unresolved.as_str(), "unresolved");
}

#[test]
fn test_exhaustion_serialization() {
    let json = serde_json::to_value(Exhaustion::RoundsExceeded { rounds: 10 }).unwrap();
    assert_eq!(json["kind"], "rounds_exceeded");
    assert_eq!(json["rounds"], 10);

    let json = serde_json::to_value(Exhaustion::HistoryExhausted {
        generations_back: 3,
    })
    .unwrap();
    assert_eq!(json["kind"], "history_exhausted");
    assert_eq!(json["generations_back"], 3);
}

#[test]
fn test_run_report_serialization() {
    let run = report(
        vec![checked(
            "db.example",
            Some("2025010100"),
            Some("2025010101"),
            Verdict::Passed,
        )],
        None,
    );

    let json = serde_json::to_value(&run).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["files"][0]["verdict"], "passed");
    assert_eq!(json["files"][0]["pre_serial"], "2025010100");
    assert_eq!(json["files"][0]["post_serial"], "2025010101");
    assert!(json.get("exhaustion").is_none());
    assert!(json["files"][0].get("reason").is_none());
}

#[test]
fn test_render_text_summary() {
    let mut failed = checked("db.b", Some("5"), Some("5"), Verdict::Failed);
    failed.reason = Some("serial not incremented".to_string());

    let run = report(
        vec![
            checked("db.a", Some("1"), Some("2"), Verdict::Passed),
            failed,
            checked("db.c", None, Some("1"), Verdict::PassedNewFile),
            checked("README", None, None, Verdict::Skipped),
        ],
        None,
    );

    let text = run.render_text();
    assert!(text.contains("PASS db.a (1 -> 2)"));
    assert!(text.contains("FAIL db.b (5 -> 5): serial not incremented"));
    assert!(text.contains("WARN db.c (new serial 1)"));
    assert!(text.contains("SKIP README"));
    assert!(text.contains("FAILED: 2 passed, 1 failed, 0 unresolved, 1 skipped (1 round)"));
}

#[test]
fn test_render_text_exhaustion() {
    let run = report(
        vec![checked("db.a", Some("x"), Some("2"), Verdict::Unresolved)],
        Some(Exhaustion::RoundsExceeded { rounds: 10 }),
    );

    let text = run.render_text();
    assert!(text.contains("error: could not find a valid baseline within 10 revisions"));
    assert!(text.starts_with("FAIL db.a"));
    assert_eq!(run.count(Verdict::Unresolved), 1);
}
