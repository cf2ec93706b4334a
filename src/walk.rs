use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::error::Error;

/// Directory listing, split into the names to parse and a count of
/// skipped subdirectories.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClipListing {
    pub files: Vec<OsString>,
    pub skipped_dirs: usize,
}

///
/// Lists `clip_dir`, dropping subdirectories.
///
/// Names come back sorted so the annotation file does not depend on the
/// filesystem's enumeration order. They are kept as raw `OsString`s, a
/// name that is not UTF-8 is still a clip.
///
pub fn list_clips(clip_dir: &Path) -> Result<ClipListing, Error> {
    let entries = fs::read_dir(clip_dir).map_err(|err| Error::MissingDirectory {
        path: clip_dir.display().to_string(),
        err,
    })?;

    let mut listing = ClipListing::default();

    for entry in entries {
        let entry = entry?;

        // follows symlinks, a link to a directory is a directory
        if entry.path().is_dir() {
            tracing::debug!(entry = ?entry.file_name(), "skipping directory");
            listing.skipped_dirs += 1;
            continue;
        }

        listing.files.push(entry.file_name());
    }

    listing.files.sort();

    tracing::debug!(
        dir = %clip_dir.display(),
        files = listing.files.len(),
        skipped_dirs = listing.skipped_dirs,
        "listed clip directory"
    );

    Ok(listing)
}
