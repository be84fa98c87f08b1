// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for command line parsing

use super::cli::*;
use super::layout::Notation;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[test]
fn test_cli_definitions_are_valid() {
    SoacheckCli::command().debug_assert();
    FlashimgCli::command().debug_assert();
}

#[test]
fn test_soacheck_defaults() {
    let cli = SoacheckCli::try_parse_from(["soacheck"]).unwrap();
    assert!(cli.base.is_none());
    assert!(cli.paths.is_empty());
    assert_eq!(cli.max_rounds, 10);
    assert_eq!(cli.log_format, LogFormat::Text);
    assert!(!cli.json);
}

#[test]
fn test_soacheck_options() {
    let cli = SoacheckCli::try_parse_from([
        "soacheck",
        "-b",
        "origin/main",
        "--target",
        "feature",
        "-i",
        "^zones/",
        "-i",
        "\\.zone$",
        "--exclude",
        "a{1,2}",
        "-C",
        "/srv/repo",
        "--max-rounds",
        "3",
        "--json",
        "--log-format",
        "json",
        "zones/db.example",
    ])
    .unwrap();

    assert_eq!(cli.base.as_deref(), Some("origin/main"));
    assert_eq!(cli.target.as_deref(), Some("feature"));
    assert_eq!(cli.include, vec!["^zones/", "\\.zone$"]);
    // Commas belong to the regex
    assert_eq!(cli.exclude, vec!["a{1,2}"]);
    assert_eq!(cli.repo, Some(PathBuf::from("/srv/repo")));
    assert_eq!(cli.max_rounds, 3);
    assert!(cli.json);
    assert_eq!(cli.log_format, LogFormat::Json);
    assert_eq!(cli.paths, vec!["zones/db.example"]);
}

#[test]
fn test_soacheck_rejects_zero_rounds() {
    assert!(SoacheckCli::try_parse_from(["soacheck", "--max-rounds", "0"]).is_err());
}

#[test]
fn test_flashimg_build() {
    let cli = FlashimgCli::try_parse_from([
        "flashimg",
        "build",
        "--layout",
        "256k(boot),-(rootfs)",
        "--image-size",
        "8M",
        "-o",
        "flash.bin",
    ])
    .unwrap();

    match cli.command {
        FlashCommand::Build(args) => {
            assert_eq!(args.layout.source.layout.as_deref(), Some("256k(boot),-(rootfs)"));
            assert_eq!(args.image_size, Some(8 * 1024 * 1024));
            assert_eq!(args.input_dir, PathBuf::from("."));
            assert_eq!(args.output, PathBuf::from("flash.bin"));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_flashimg_extract_with_notation() {
    let cli = FlashimgCli::try_parse_from([
        "flashimg",
        "extract",
        "-f",
        "/proc/mtd",
        "-n",
        "proc-mtd",
        "-i",
        "flash.bin",
        "-o",
        "parts",
    ])
    .unwrap();

    match cli.command {
        FlashCommand::Extract(args) => {
            assert_eq!(args.layout.source.layout_file, Some(PathBuf::from("/proc/mtd")));
            assert_eq!(args.layout.notation, Some(Notation::ProcMtd));
            assert_eq!(args.output_dir, PathBuf::from("parts"));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_flashimg_layout_source_required_and_exclusive() {
    assert!(FlashimgCli::try_parse_from(["flashimg", "show"]).is_err());
    assert!(FlashimgCli::try_parse_from([
        "flashimg",
        "show",
        "--layout",
        "4k(a)",
        "--layout-file",
        "layout.txt",
    ])
    .is_err());
}

#[test]
fn test_flashimg_invalid_size() {
    assert!(
        FlashimgCli::try_parse_from(["flashimg", "show", "-l", "4k(a)", "-s", "lots"]).is_err()
    );
}
