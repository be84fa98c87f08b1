// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Flash layout parsers
//!
//! This module parses the three supported partition layout notations using
//! nom: kernel command line partition lists, flashrom layout files and
//! `/proc/mtd` tables.
//!
//! # Examples
//!
//! ```rust
//! use soacheck::layout_parser::parse_cmdline;
//!
//! let layout = parse_cmdline("spi0.0:256k(u-boot),64k(env),-(rootfs)", Some(0x800000)).unwrap();
//! assert_eq!(layout.len(), 3);
//! assert_eq!(layout.get("rootfs").unwrap().offset, 0x50000);
//! ```

use crate::layout::{Layout, Notation, Partition};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit1, hex_digit1, one_of, space1},
    combinator::{all_consuming, map, map_opt, map_res, opt, rest, value},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

/// Layout parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutParseError {
    #[error("Parse error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Partition '{0}' ends before it starts")]
    InvertedRange(String),

    #[error("Partition '{0}' takes the remaining space but the image size is unknown")]
    MissingImageSize(String),

    #[error("Partition '{name}' starts at {offset:#x}, beyond the image size {image_size:#x}")]
    OffsetBeyondImage {
        name: String,
        offset: u64,
        image_size: u64,
    },

    #[error("Layout contains no partitions")]
    Empty,
}

pub type ParseResult<T> = Result<T, LayoutParseError>;

// ========== Error Helpers ==========

/// At most the first 24 characters of the unparsed input
fn snippet(input: &str) -> &str {
    input
        .char_indices()
        .nth(24)
        .map(|(i, _)| &input[..i])
        .unwrap_or(input)
}

fn syntax_error(line: usize, err: nom::Err<nom::error::Error<&str>>) -> LayoutParseError {
    let message = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            if e.input.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected input at '{}'", snippet(e.input))
            }
        }
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
    };
    LayoutParseError::Syntax { line, message }
}

// ========== Number Parsers ==========

/// Hexadecimal number with an optional 0x prefix: 0x40000, 0003ffff
fn hex_number(input: &str) -> IResult<&str, u64> {
    map_res(preceded(opt(tag_no_case("0x")), hex_digit1), |s: &str| {
        u64::from_str_radix(s, 16)
    })(input)
}

/// Hexadecimal number that requires the 0x prefix
fn prefixed_hex(input: &str) -> IResult<&str, u64> {
    map_res(preceded(tag_no_case("0x"), hex_digit1), |s: &str| {
        u64::from_str_radix(s, 16)
    })(input)
}

fn decimal(input: &str) -> IResult<&str, u64> {
    map_res(digit1, |s: &str| s.parse::<u64>())(input)
}

/// Binary unit suffix multiplier
fn unit(input: &str) -> IResult<&str, u64> {
    map(opt(one_of("kKmMgG")), |u| match u {
        Some('k' | 'K') => 1 << 10,
        Some('m' | 'M') => 1 << 20,
        Some('g' | 'G') => 1 << 30,
        _ => 1,
    })(input)
}

/// Size with optional unit: 4096, 0x1000, 4k, 8M
pub(crate) fn size_value(input: &str) -> IResult<&str, u64> {
    map_opt(pair(alt((prefixed_hex, decimal)), unit), |(n, m)| {
        n.checked_mul(m)
    })(input)
}

/// Parse a standalone size such as `8M` or `0x800000`
pub fn parse_size_str(s: &str) -> ParseResult<u64> {
    all_consuming(size_value)(s.trim())
        .map(|(_, v)| v)
        .map_err(|_| LayoutParseError::InvalidSize(s.to_string()))
}

// ========== Command Line Notation ==========

#[derive(Debug, Clone, PartialEq, Eq)]
struct CmdlineEntry {
    /// `None` for `-` (rest of the image)
    size: Option<u64>,
    offset: Option<u64>,
    name: String,
}

/// Device id before the partition list: `spi0.0:`
fn mtd_id(input: &str) -> IResult<&str, &str> {
    terminated(take_while1(|c: char| !":,()@".contains(c)), char(':'))(input)
}

/// One partition: `<size>[@<offset>](<name>)[ro][lk]`
fn cmdline_entry(input: &str) -> IResult<&str, CmdlineEntry> {
    let (input, size) = alt((value(None, char('-')), map(size_value, Some)))(input)?;
    let (input, offset) = opt(preceded(char('@'), size_value))(input)?;
    let (input, name) = delimited(char('('), take_while1(|c: char| c != ')'), char(')'))(input)?;
    let (input, _) = many0(alt((tag("ro"), tag("lk"))))(input)?;

    Ok((
        input,
        CmdlineEntry {
            size,
            offset,
            name: name.to_string(),
        },
    ))
}

fn cmdline(input: &str) -> IResult<&str, Vec<CmdlineEntry>> {
    let (input, _) = opt(tag("mtdparts="))(input)?;
    let (input, _) = opt(mtd_id)(input)?;
    separated_list1(char(','), cmdline_entry)(input)
}

/// Parse a command line partition list
///
/// Offsets follow on from the previous partition unless given with `@`.
/// A `-` size takes the rest of the image and needs `image_size`.
pub fn parse_cmdline(text: &str, image_size: Option<u64>) -> ParseResult<Layout> {
    let (_, entries) = all_consuming(cmdline)(text.trim()).map_err(|e| syntax_error(1, e))?;

    let mut cursor = 0u64;
    let mut partitions = Vec::with_capacity(entries.len());

    for entry in entries {
        let offset = entry.offset.unwrap_or(cursor);
        let size = match entry.size {
            Some(size) => size,
            None => {
                let total =
                    image_size.ok_or_else(|| LayoutParseError::MissingImageSize(entry.name.clone()))?;
                total
                    .checked_sub(offset)
                    .ok_or_else(|| LayoutParseError::OffsetBeyondImage {
                        name: entry.name.clone(),
                        offset,
                        image_size: total,
                    })?
            }
        };

        let partition = Partition::new(entry.name, offset, size);
        cursor = partition.end();
        partitions.push(partition);
    }

    Ok(Layout::new(partitions))
}

// ========== flashrom Notation ==========

/// `<start>:<end> <name>`, end inclusive
fn flashrom_line(input: &str) -> IResult<&str, (u64, u64, &str)> {
    tuple((
        hex_number,
        preceded(char(':'), hex_number),
        preceded(space1, map(rest, str::trim)),
    ))(input)
}

/// Parse a flashrom layout file
pub fn parse_flashrom(text: &str) -> ParseResult<Layout> {
    let mut partitions = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (_, (start, end, name)) =
            all_consuming(flashrom_line)(line).map_err(|e| syntax_error(index + 1, e))?;
        let size = end
            .checked_sub(start)
            .and_then(|d| d.checked_add(1))
            .ok_or_else(|| LayoutParseError::InvertedRange(name.to_string()))?;

        partitions.push(Partition::new(name, start, size));
    }

    Ok(Layout::new(partitions))
}

// ========== /proc/mtd Notation ==========

/// `mtdN: <size> <erasesize> "<name>"`
fn proc_mtd_line(input: &str) -> IResult<&str, (u64, &str)> {
    let (input, _) = tuple((tag("mtd"), digit1, char(':'), space1))(input)?;
    let (input, size) = map_res(hex_digit1, |s: &str| u64::from_str_radix(s, 16))(input)?;
    let (input, _) = tuple((space1, hex_digit1, space1))(input)?;
    let (input, name) = delimited(char('"'), take_while1(|c: char| c != '"'), char('"'))(input)?;
    Ok((input, (size, name)))
}

/// Parse a `/proc/mtd` table; partitions are laid out back to back
pub fn parse_proc_mtd(text: &str) -> ParseResult<Layout> {
    let mut offset = 0u64;
    let mut partitions = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("dev:") {
            continue;
        }

        let (_, (size, name)) =
            all_consuming(proc_mtd_line)(line).map_err(|e| syntax_error(index + 1, e))?;
        let partition = Partition::new(name, offset, size);
        offset = partition.end();
        partitions.push(partition);
    }

    Ok(Layout::new(partitions))
}

// ========== Entry Point ==========

/// Parse a layout in the given notation, or a detected one
pub fn parse_layout(
    text: &str,
    notation: Option<Notation>,
    image_size: Option<u64>,
) -> ParseResult<Layout> {
    let notation = notation.unwrap_or_else(|| Notation::detect(text));
    let layout = match notation {
        Notation::Cmdline => parse_cmdline(text, image_size)?,
        Notation::Flashrom => parse_flashrom(text)?,
        Notation::ProcMtd => parse_proc_mtd(text)?,
    };

    if layout.is_empty() {
        return Err(LayoutParseError::Empty);
    }
    Ok(layout)
}
