use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::clip::{BBox, Ltwh};
use crate::error::Error;

///
/// A single clip decoded from its filename.
///
/// basename : name of the original image the clip was cut from, e.g. `cat.png`.
/// r : rotation index encoded by the clipper. Parsed, never emitted.
/// bbox : clip region in the original image, `(x, y, w, h)`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRecord {
    pub basename: OsString,
    pub r: u32,
    pub bbox: BBox<Ltwh>,
}

impl ClipRecord {
    /// Builds a record from signed `[r, x, y, w, h]`, flooring negatives at zero.
    pub fn clamped(basename: impl Into<OsString>, values: [i64; 5], file: &str) -> Result<Self, Error> {
        let [r, x, y, w, h] = values;

        Ok(Self {
            basename: basename.into(),
            r: clamp(r, file)?,
            bbox: BBox::ltwh(
                clamp(x, file)?,
                clamp(y, file)?,
                clamp(w, file)?,
                clamp(h, file)?,
            ),
        })
    }

    /// Path of the original image under `prefix`.
    #[inline]
    pub fn base_image_path(&self, prefix: &Path) -> PathBuf {
        prefix.join(&self.basename)
    }
}

fn clamp(value: i64, file: &str) -> Result<u32, Error> {
    u32::try_from(value.max(0))
        .map_err(|_| Error::format(file, format!("value {} is out of range", value)))
}
