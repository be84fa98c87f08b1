// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command line definitions for the `soacheck` and `flashimg` binaries
//!
//! Kept in the library so argument parsing can be unit tested.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::layout::Notation;
use crate::layout_parser::parse_size_str;
use crate::validator::DEFAULT_MAX_ROUNDS;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Verify that changed DNS zonefiles carry an incremented SOA serial.
#[derive(Parser, Debug)]
#[command(name = "soacheck")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Check zonefiles changed by the last commit:\n",
    "    $ soacheck --include '^zones/'\n\n",
    "  Check a merge request range:\n",
    "    $ soacheck --base origin/main --target HEAD\n\n",
    "  Check specific files against their history:\n",
    "    $ soacheck zones/db.example.com zones/db.example.org\n\n",
    "When --base is not given, the range is read from TRAVIS_COMMIT_RANGE,\n",
    "GitLab (CI_MERGE_REQUEST_DIFF_BASE_SHA, CI_COMMIT_SHA) or GitHub\n",
    "(GITHUB_BASE_REF, GITHUB_SHA), falling back to <target>~1.",
))]
pub struct SoacheckCli {
    /// Revision to diff against when discovering changed files.
    #[arg(short, long, value_name = "REV", env = "SOACHECK_BASE")]
    pub base: Option<String>,

    /// Revision whose serials are validated [default: HEAD].
    #[arg(short, long, value_name = "REV", env = "SOACHECK_TARGET")]
    pub target: Option<String>,

    /// Only check paths matching this regex (repeatable).
    #[arg(short, long, value_name = "REGEX", env = "SOACHECK_INCLUDE")]
    pub include: Vec<String>,

    /// Never check paths matching this regex (repeatable).
    #[arg(short, long, value_name = "REGEX", env = "SOACHECK_EXCLUDE")]
    pub exclude: Vec<String>,

    /// Repository working tree [default: current directory].
    #[arg(short = 'C', long, value_name = "DIR", env = "SOACHECK_REPO")]
    pub repo: Option<PathBuf>,

    /// Path to the git binary.
    #[arg(long, value_name = "PATH", env = "SOACHECK_GIT")]
    pub git: Option<String>,

    /// How many ancestors to try when a baseline serial is unusable.
    #[arg(
        long,
        value_name = "N",
        env = "SOACHECK_MAX_ROUNDS",
        default_value_t = DEFAULT_MAX_ROUNDS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_rounds: u32,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Write Prometheus metrics to this file after the run.
    #[arg(long, value_name = "PATH")]
    pub metrics_file: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Files to check instead of discovering changed files.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

/// Build or split flash images from a partition layout.
#[derive(Parser, Debug)]
#[command(name = "flashimg")]
#[command(version, about)]
#[command(after_help = concat!(
    "LAYOUT NOTATIONS:\n",
    "  cmdline   [mtd-id:]256k(u-boot),64k@0x40000(env),-(rootfs)\n",
    "  flashrom  00000000:0003ffff u-boot   (one partition per line)\n",
    "  proc-mtd  mtd0: 00040000 00010000 \"u-boot\"   (as in /proc/mtd)\n\n",
    "EXAMPLES:\n",
    "  $ flashimg build --layout '256k(boot),-(rootfs)' --image-size 8M -o flash.bin\n",
    "  $ flashimg extract --layout-file /proc/mtd --image flash.bin --output-dir parts/\n",
))]
pub struct FlashimgCli {
    #[command(subcommand)]
    pub command: FlashCommand,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum FlashCommand {
    /// Write partition files into an image.
    Build(BuildArgs),

    /// Copy partitions out of an image.
    Extract(ExtractArgs),

    /// Print the resolved layout.
    Show(ShowArgs),
}

/// Where the layout comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct LayoutSource {
    /// Layout given inline.
    #[arg(short, long, value_name = "LAYOUT")]
    pub layout: Option<String>,

    /// Layout read from a file.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub layout_file: Option<PathBuf>,
}

/// Layout options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub source: LayoutSource,

    /// Layout notation [default: detected].
    #[arg(short, long, value_enum)]
    pub notation: Option<Notation>,
}

/// Arguments for the build command.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Directory holding one file per partition, named after it.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub input_dir: PathBuf,

    /// Image file to write.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Total image size (e.g. 8M, 0x800000) [default: end of last partition].
    #[arg(short = 's', long, value_name = "SIZE", value_parser = parse_size_arg)]
    pub image_size: Option<u64>,
}

/// Arguments for the extract command.
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Image file to read.
    #[arg(short, long, value_name = "FILE")]
    pub image: PathBuf,

    /// Directory receiving one file per partition.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

/// Arguments for the show command.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Total image size, needed to resolve a trailing "-" partition.
    #[arg(short = 's', long, value_name = "SIZE", value_parser = parse_size_arg)]
    pub image_size: Option<u64>,
}

fn parse_size_arg(s: &str) -> Result<u64, String> {
    parse_size_str(s).map_err(|e| e.to_string())
}
