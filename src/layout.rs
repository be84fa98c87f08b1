// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Flash partition layout types

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// One named byte range of a flash image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub name: String,
    pub offset: u64,
    pub size: u64,
}

impl Partition {
    pub fn new(name: impl Into<String>, offset: u64, size: u64) -> Self {
        Self {
            name: name.into(),
            offset,
            size,
        }
    }

    /// First byte past the partition
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// Ordered list of partitions
///
/// Partitions may overlap or leave gaps; the order is the order in which
/// they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Layout {
    partitions: Vec<Partition>,
}

impl Layout {
    pub fn new(partitions: Vec<Partition>) -> Self {
        Self { partitions }
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Partition> {
        self.partitions.iter()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.name == name)
    }

    /// End of the partition reaching furthest into the image
    pub fn extent(&self) -> u64 {
        self.partitions.iter().map(Partition::end).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a Partition;
    type IntoIter = std::slice::Iter<'a, Partition>;

    fn into_iter(self) -> Self::IntoIter {
        self.partitions.iter()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<20} {:>12} {:>12} {:>12}", "NAME", "OFFSET", "SIZE", "END")?;
        for p in &self.partitions {
            writeln!(
                f,
                "{:<20} {:>#12x} {:>#12x} {:>#12x}",
                p.name,
                p.offset,
                p.size,
                p.end()
            )?;
        }
        Ok(())
    }
}

/// Textual layout notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Notation {
    /// Kernel command line: `[mtd-id:]256k(boot),-(rootfs)`
    Cmdline,
    /// flashrom layout: `00000000:0003ffff boot`
    Flashrom,
    /// `/proc/mtd` table: `mtd0: 00040000 00010000 "boot"`
    ProcMtd,
}

impl Notation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notation::Cmdline => "cmdline",
            Notation::Flashrom => "flashrom",
            Notation::ProcMtd => "proc-mtd",
        }
    }

    /// Guess the notation of a layout text
    pub fn detect(text: &str) -> Self {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));

        let looks_like_mtd = |l: &str| {
            l.strip_prefix("mtd")
                .and_then(|rest| rest.split_once(':'))
                .map(|(num, rest)| {
                    !num.is_empty()
                        && num.bytes().all(|b| b.is_ascii_digit())
                        && rest.starts_with(char::is_whitespace)
                })
                .unwrap_or(false)
        };

        if text.lines().map(str::trim).any(looks_like_mtd) {
            return Notation::ProcMtd;
        }

        let looks_like_range = |l: &str| {
            let Some((range, _)) = l.split_once(char::is_whitespace) else {
                return false;
            };
            let is_hex = |s: &str| {
                let s = s
                    .strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .unwrap_or(s);
                !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
            };
            range
                .split_once(':')
                .map(|(start, end)| is_hex(start) && is_hex(end))
                .unwrap_or(false)
        };

        match lines.next() {
            Some(first) if looks_like_range(first) => Notation::Flashrom,
            _ => Notation::Cmdline,
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
