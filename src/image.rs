// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Flash image assembly and extraction
//!
//! Partition contents live in a directory, one file per partition named
//! after it. Building writes each file at its partition offset; extracting
//! copies each partition's byte range back out.

use serde::Serialize;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::layout::{Layout, Partition};

/// Image build/extract errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Partition '{name}' holds {size} bytes but {path} is {actual} bytes")]
    TooLarge {
        name: String,
        path: PathBuf,
        size: u64,
        actual: u64,
    },

    #[error("Partition '{name}' ({offset:#x}..{end:#x}) lies outside the {image_len}-byte image")]
    OutOfBounds {
        name: String,
        offset: u64,
        end: u64,
        image_len: u64,
    },

    #[error("Image size {image_size:#x} is smaller than the layout extent {extent:#x}")]
    ImageTooSmall { image_size: u64, extent: u64 },

    #[error("Invalid partition name for a file: '{0}'")]
    InvalidName(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ImageError + '_ {
    move |source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// How a partition was filled during a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// File written, followed by `padding` zero bytes
    File { written: u64, padding: u64 },
    /// No file for the partition, zero-filled
    Zeroed,
}

/// Per-partition build outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionFill {
    pub name: String,
    pub fill: Fill,
}

/// File name for a partition; names must not escape the directory
fn partition_path(dir: &Path, name: &str) -> Result<PathBuf, ImageError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(ImageError::InvalidName(name.to_string()));
    }
    Ok(dir.join(name))
}

/// Byte range of `partition` within an image of `image_len` bytes
fn byte_range(partition: &Partition, image_len: u64) -> Result<Range<usize>, ImageError> {
    let out_of_bounds = || ImageError::OutOfBounds {
        name: partition.name.clone(),
        offset: partition.offset,
        end: partition.end(),
        image_len,
    };

    let end = partition
        .offset
        .checked_add(partition.size)
        .ok_or_else(out_of_bounds)?;
    if end > image_len {
        return Err(out_of_bounds());
    }

    let start = usize::try_from(partition.offset).map_err(|_| out_of_bounds())?;
    let end = usize::try_from(end).map_err(|_| out_of_bounds())?;
    Ok(start..end)
}

/// Assemble an image from partition files
///
/// Files shorter than their partition are padded with zero bytes and
/// partitions without a file are zero-filled. Later partitions overwrite
/// earlier ones where they overlap. The image is `image_size` bytes long, or
/// ends with the furthest partition when no size is given.
pub fn build_image(
    layout: &Layout,
    input_dir: &Path,
    output: &Path,
    image_size: Option<u64>,
) -> Result<Vec<PartitionFill>, ImageError> {
    let extent = layout.extent();
    let image_len = image_size.unwrap_or(extent);
    if image_len < extent {
        return Err(ImageError::ImageTooSmall {
            image_size: image_len,
            extent,
        });
    }

    let buffer_len = usize::try_from(image_len).map_err(|_| ImageError::ImageTooSmall {
        image_size: image_len,
        extent,
    })?;
    let mut image = vec![0u8; buffer_len];
    let mut fills = Vec::with_capacity(layout.len());

    for partition in layout {
        let range = byte_range(partition, image_len)?;
        let path = partition_path(input_dir, &partition.name)?;

        let fill = if path.is_file() {
            let data = std::fs::read(&path).map_err(io_error(&path))?;
            let actual = data.len() as u64;
            if actual > partition.size {
                return Err(ImageError::TooLarge {
                    name: partition.name.clone(),
                    path,
                    size: partition.size,
                    actual,
                });
            }

            let (head, tail) = image[range].split_at_mut(data.len());
            head.copy_from_slice(&data);
            tail.fill(0);

            debug!(
                "wrote {} ({} bytes) at {:#x}",
                path.display(),
                actual,
                partition.offset
            );
            Fill::File {
                written: actual,
                padding: partition.size - actual,
            }
        } else {
            warn!(
                "no file for partition '{}', filling {} bytes with zeros",
                partition.name, partition.size
            );
            image[range].fill(0);
            Fill::Zeroed
        };

        fills.push(PartitionFill {
            name: partition.name.clone(),
            fill,
        });
    }

    std::fs::write(output, &image).map_err(io_error(output))?;
    info!(
        "wrote {} ({} bytes, {} partitions)",
        output.display(),
        image_len,
        layout.len()
    );

    Ok(fills)
}

/// Copy every partition of `image` into `output_dir`
///
/// Returns the paths written, in layout order.
pub fn extract_image(
    layout: &Layout,
    image: &Path,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, ImageError> {
    let data = std::fs::read(image).map_err(io_error(image))?;
    let image_len = data.len() as u64;

    // Validate everything before touching the output directory
    let mut jobs = Vec::with_capacity(layout.len());
    for partition in layout {
        let range = byte_range(partition, image_len)?;
        let path = partition_path(output_dir, &partition.name)?;
        jobs.push((path, range));
    }

    std::fs::create_dir_all(output_dir).map_err(io_error(output_dir))?;

    let mut written = Vec::with_capacity(jobs.len());
    for (path, range) in jobs {
        debug!("extracting {} bytes into {}", range.len(), path.display());
        std::fs::write(&path, &data[range]).map_err(io_error(&path))?;
        written.push(path);
    }

    info!(
        "extracted {} partitions from {} into {}",
        written.len(),
        image.display(),
        output_dir.display()
    );
    Ok(written)
}
