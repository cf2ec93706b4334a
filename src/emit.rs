use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::clip::{BBox, ClipRecord, Ltwh};
use crate::error::Error;

///
/// One line of a haar training info file:
/// `<path> <n> <x1> <y1> <w1> <h1> ... <xn> <yn> <wn> <hn>`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaarAnnotation {
    pub path: PathBuf,
    pub rects: Vec<BBox<Ltwh>>,
}

impl HaarAnnotation {
    #[inline]
    pub fn single(path: PathBuf, bbox: BBox<Ltwh>) -> Self {
        Self {
            path,
            rects: vec![bbox],
        }
    }

    /// Writes the line with the path bytes untouched, `Display` is lossy
    /// for names that are not UTF-8.
    pub fn write_line<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(self.path.as_os_str().as_encoded_bytes())?;
        write!(out, " {}", self.rects.len())?;

        for rect in &self.rects {
            write!(out, " {}", rect)?;
        }

        out.write_all(b"\n")
    }
}

impl fmt::Display for HaarAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path.display(), self.rects.len())?;

        for rect in &self.rects {
            write!(f, " {}", rect)?;
        }

        Ok(())
    }
}

///
/// Writes annotations for records whose base image exists.
///
/// Streaming mode writes and flushes one line per record as it arrives.
/// Grouped mode collects rectangles per base image, in first-seen order,
/// and writes them on `finish`.
///
pub struct Emitter<W: Write> {
    out: W,
    prefix: PathBuf,
    group: bool,
    groups: Vec<HaarAnnotation>,
    group_index: HashMap<PathBuf, usize>,
    lines: usize,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W, prefix: &Path, group: bool) -> Self {
        Self {
            out,
            prefix: prefix.to_path_buf(),
            group,
            groups: Vec::new(),
            group_index: HashMap::new(),
            lines: 0,
        }
    }

    /// Returns `false` when the base image is missing and nothing was kept.
    pub fn push(&mut self, record: ClipRecord) -> Result<bool, Error> {
        let path = record.base_image_path(&self.prefix);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "base image missing, clip skipped");
            return Ok(false);
        }

        if self.group {
            match self.group_index.get(&path) {
                Some(&idx) => self.groups[idx].rects.push(record.bbox),
                None => {
                    self.group_index.insert(path.clone(), self.groups.len());
                    self.groups.push(HaarAnnotation::single(path, record.bbox));
                }
            }
        } else {
            self.write(&HaarAnnotation::single(path, record.bbox))?;
        }

        Ok(true)
    }

    /// Writes pending groups and flushes. Returns the number of lines written.
    pub fn finish(mut self) -> Result<usize, Error> {
        for annotation in std::mem::take(&mut self.groups) {
            self.write(&annotation)?;
        }

        self.out.flush()?;

        Ok(self.lines)
    }

    fn write(&mut self, annotation: &HaarAnnotation) -> Result<(), Error> {
        annotation.write_line(&mut self.out)?;

        if !self.group {
            self.out.flush()?;
        }

        self.lines += 1;

        Ok(())
    }
}
