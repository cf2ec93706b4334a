//! Converts a directory of imageclipper clips into a haar training
//! annotation file.
//!
//! Each clip name carries the original image name and the clip rectangle,
//! e.g. `cat.png_0001_0010_0020_0030_0040.png`. For every clip whose
//! original image exists under the configured prefix one line
//! `<path> 1 <x> <y> <w> <h>` is written.

pub mod clip;
pub mod emit;
pub mod error;
pub mod walk;

pub use clip::{BBox, ClipPattern, ClipRecord, Ltwh};
pub use emit::{Emitter, HaarAnnotation};
use error::Error;

use std::io::Write;
use std::path::PathBuf;

pub struct ConverterConfig {
    pub clip_dir: PathBuf,
    pub path_prefix: PathBuf,
    pub pattern: ClipPattern,
    pub group: bool,
    pub keep_going: bool,
}

impl ConverterConfig {
    pub fn new(clip_dir: impl Into<PathBuf>) -> Self {
        Self {
            clip_dir: clip_dir.into(),
            path_prefix: PathBuf::new(),
            pattern: ClipPattern::legacy(),
            group: false,
            keep_going: false,
        }
    }
}

/// Counters of a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub listed: usize,
    pub skipped_dirs: usize,
    pub parsed: usize,
    pub emitted: usize,
    pub missing: usize,
    pub rejected: usize,
}

pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    ///
    /// Walks the clip directory and writes annotations to `out`.
    ///
    /// Unless `keep_going` is set, the first malformed clip name stops the
    /// run: lines written before it stay, nothing after it is read.
    ///
    pub fn run<W: Write>(&self, out: W) -> Result<Summary, Error> {
        let config = &self.config;
        let listing = walk::list_clips(&config.clip_dir)?;

        let mut summary = Summary {
            listed: listing.files.len() + listing.skipped_dirs,
            skipped_dirs: listing.skipped_dirs,
            ..Default::default()
        };

        let mut emitter = Emitter::new(out, &config.path_prefix, config.group);

        for name in listing.files {
            let record = match config.pattern.parse(&name) {
                Ok(record) => record,
                Err(err) if config.keep_going => {
                    tracing::warn!(error = %err, "rejected clip");
                    summary.rejected += 1;
                    continue;
                }
                Err(err) => {
                    emitter.finish()?;
                    return Err(err);
                }
            };

            summary.parsed += 1;

            if !emitter.push(record)? {
                summary.missing += 1;
            }
        }

        summary.emitted = emitter.finish()?;

        tracing::info!(
            listed = summary.listed,
            skipped_dirs = summary.skipped_dirs,
            parsed = summary.parsed,
            emitted = summary.emitted,
            missing = summary.missing,
            rejected = summary.rejected,
            "conversion finished"
        );

        Ok(summary)
    }
}
