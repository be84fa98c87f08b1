// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Flash image tool
//!
//! Assembles a flash image from per-partition files, or splits an image
//! back into them, following a partition layout given in kernel command
//! line, flashrom or `/proc/mtd` notation.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{debug, info};

use soacheck::{
    cli::{FlashCommand, FlashimgCli, LayoutArgs},
    image::{build_image, extract_image, Fill},
    layout::{Layout, Notation},
    layout_parser::parse_layout,
    logging,
};

/// Read the layout text from the command line or a file and parse it
fn load_layout(args: &LayoutArgs, image_size: Option<u64>) -> Result<Layout> {
    let text = match (&args.source.layout, &args.source.layout_file) {
        (Some(layout), _) => layout.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read layout file {}", path.display()))?,
        (None, None) => anyhow::bail!("either --layout or --layout-file is required"),
    };

    let notation = args.notation.unwrap_or_else(|| Notation::detect(&text));
    debug!("parsing layout as {}", notation);

    let layout = parse_layout(&text, Some(notation), image_size)
        .with_context(|| format!("invalid {} layout", notation))?;
    info!("layout has {} partitions", layout.len());
    Ok(layout)
}

fn image_len(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("failed to read image {}", path.display()))?;
    Ok(metadata.len())
}

fn main() -> Result<()> {
    let cli = FlashimgCli::parse();
    logging::init_tracing(cli.log_format);

    match cli.command {
        FlashCommand::Build(args) => {
            let layout = load_layout(&args.layout, args.image_size)?;
            let fills = build_image(&layout, &args.input_dir, &args.output, args.image_size)
                .with_context(|| format!("failed to build {}", args.output.display()))?;

            for fill in &fills {
                match fill.fill {
                    Fill::File { written, padding } => {
                        println!("{:<20} {} bytes + {} padding", fill.name, written, padding)
                    }
                    Fill::Zeroed => println!("{:<20} zero-filled", fill.name),
                }
            }
        }
        FlashCommand::Extract(args) => {
            // A trailing "-" partition extends to the end of the image
            let size = image_len(&args.image)?;
            let layout = load_layout(&args.layout, Some(size))?;
            let written = extract_image(&layout, &args.image, &args.output_dir)
                .with_context(|| format!("failed to extract {}", args.image.display()))?;

            for path in &written {
                println!("{}", path.display());
            }
        }
        FlashCommand::Show(args) => {
            let layout = load_layout(&args.layout, args.image_size)?;
            print!("{}", layout);
        }
    }

    Ok(())
}
