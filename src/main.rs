//! haartrainingformat - build a haar training info file from imageclipper clips
//!
//! Usage:
//!   haartrainingformat --clipdir imgs/imageclipper --path imgs > info.dat

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use haar_format::{ClipPattern, Converter, ConverterConfig};

#[derive(Parser)]
#[command(name = "haartrainingformat")]
#[command(about = "Convert imageclipper clip names into a haar training annotation file")]
#[command(version)]
struct Cli {
    /// Directory containing the clipped images, named in the default
    /// imageclipper output format:
    /// %d/imageclipper/%i.%e_%04r_%04x_%04y_%04w_%04h.png
    #[arg(long, value_name = "CLIPDIR")]
    clipdir: PathBuf,

    /// Path to prepend to the image name in the output.
    #[arg(long, value_name = "PATH", default_value = "")]
    path: String,

    /// Clip name format: `image`, `video`, or an imageclipper format string.
    #[arg(long, default_value = "image")]
    format: String,

    /// Write one line per original image listing all of its clips.
    #[arg(long)]
    group: bool,

    /// Skip clips with malformed names instead of stopping at the first one.
    #[arg(long)]
    keep_going: bool,

    /// Write annotations to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let pattern = ClipPattern::from_format(&cli.format)?;

    let config = ConverterConfig {
        path_prefix: PathBuf::from(cli.path),
        pattern,
        group: cli.group,
        keep_going: cli.keep_going,
        ..ConverterConfig::new(cli.clipdir)
    };

    let converter = Converter::new(config);

    let summary = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            converter.run(BufWriter::new(file))
        }
        None => converter.run(io::stdout().lock()),
    }
    .with_context(|| {
        format!(
            "Failed to convert clips in {}",
            converter.config().clip_dir.display()
        )
    })?;

    if summary.rejected > 0 {
        tracing::warn!(rejected = summary.rejected, "some clips were skipped");
    }

    Ok(())
}
