use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use regex::bytes::{Captures, Regex};

use crate::clip::ClipRecord;
use crate::error::Error;

/// Default imageclipper output format for clips cut from still images.
pub const IMAGE_FORMAT: &str = "%d/imageclipper/%i.%e_%04r_%04x_%04y_%04w_%04h.png";

/// Default imageclipper output format for clips cut from video frames.
pub const VIDEO_FORMAT: &str = "%d/imageclipper/%i.%e_%04f_%04r_%04x_%04y_%04w_%04h.png";

/// Any byte but `\n`, so names that are not UTF-8 still match.
const ANY: &str = "(?-u:.)";

/// `<name.ext>_<r>_<x>_<y>_<w>_<h>.<anything>`, matched from the start only.
static LEGACY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<base>(?-u:.)*?\.(?-u:.)*?)_(?P<r>-?[0-9]+)_(?P<x>-?[0-9]+)_(?P<y>-?[0-9]+)_(?P<w>-?[0-9]+)_(?P<h>-?[0-9]+)\.",
    )
    .expect("valid legacy clip regex")
});

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum NameParts {
    Whole,
    StemExt,
    Stem,
    Ext,
}

/// Compiled clip filename grammar.
#[derive(Debug, Clone)]
pub struct ClipPattern {
    source: String,
    regex: Regex,
    name: NameParts,
}

impl Default for ClipPattern {
    fn default() -> Self {
        Self::legacy()
    }
}

impl fmt::Display for ClipPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl ClipPattern {
    /// The grammar of `haartrainingformat`: any suffix after the last
    /// integer, basename must hold a dot.
    pub fn legacy() -> Self {
        Self {
            source: "image".to_string(),
            regex: LEGACY.clone(),
            name: NameParts::Whole,
        }
    }

    /// Resolves `image`, `video` or an imageclipper format string.
    pub fn from_format(format: &str) -> Result<Self, Error> {
        match format {
            "image" => Ok(Self::legacy()),
            "video" => Self::compile(VIDEO_FORMAT),
            other => Self::compile(other),
        }
    }

    ///
    /// Compiles an imageclipper output format into a filename matcher.
    ///
    /// The directory part (up to the last `/`) is dropped. Specifiers are
    /// `%` plus optional printf flags and width, then one of
    /// `i e x y w h r f . ,`; `%%` is a literal percent sign.
    ///
    pub fn compile(format: &str) -> Result<Self, Error> {
        let file_part = format.rsplit('/').next().unwrap_or(format);

        let mut expr = String::from("^");
        let mut literal = String::new();
        let mut seen: Vec<char> = Vec::new();
        let mut chars = file_part.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            while let Some(&flag) = chars.peek() {
                if flag.is_ascii_digit() || "-+ #".contains(flag) {
                    chars.next();
                } else {
                    break;
                }
            }

            let key = chars
                .next()
                .ok_or_else(|| Error::pattern(format, "dangling '%' at end of format"))?;

            if key == '%' {
                literal.push('%');
                continue;
            }

            let piece = match key {
                'i' | 'e' => format!("(?P<{}>{}*?)", key, ANY),
                'x' | 'y' | 'w' | 'h' | 'r' => format!("(?P<{}>-?[0-9]+)", key),
                'f' | '.' | ',' => "-?[0-9]+".to_string(),
                other => {
                    return Err(Error::pattern(format, format!("unknown specifier '%{}'", other)))
                }
            };

            if seen.contains(&key) {
                return Err(Error::pattern(format, format!("specifier '%{}' used twice", key)));
            }
            seen.push(key);

            expr.push_str(&regex::escape(&literal));
            literal.clear();
            expr.push_str(&piece);
        }

        expr.push_str(&regex::escape(&literal));
        expr.push('$');

        for key in ['x', 'y', 'w', 'h'] {
            if !seen.contains(&key) {
                return Err(Error::pattern(format, format!("missing specifier '%{}'", key)));
            }
        }

        let name = match (seen.contains(&'i'), seen.contains(&'e')) {
            (true, true) => NameParts::StemExt,
            (true, false) => NameParts::Stem,
            (false, true) => NameParts::Ext,
            (false, false) => {
                return Err(Error::pattern(format, "no image name specifier ('%i' or '%e')"))
            }
        };

        let regex = Regex::new(&expr).map_err(|err| Error::pattern(format, err.to_string()))?;

        Ok(Self {
            source: format.to_string(),
            regex,
            name,
        })
    }

    ///
    /// Decodes one clip filename.
    ///
    /// Matching runs on the raw bytes of the name, the basename keeps them
    /// as they are.
    ///
    pub fn parse<S: AsRef<OsStr> + ?Sized>(&self, file: &S) -> Result<ClipRecord, Error> {
        let file = file.as_ref();
        let shown = file.to_string_lossy();

        let caps = self
            .regex
            .captures(file.as_encoded_bytes())
            .ok_or_else(|| Error::format(&shown, format!("does not match clip name format {}", self)))?;

        let basename = match self.name {
            NameParts::Whole => group(&caps, "base").to_vec(),
            NameParts::StemExt => [group(&caps, "i"), &b"."[..], group(&caps, "e")].concat(),
            NameParts::Stem => group(&caps, "i").to_vec(),
            NameParts::Ext => group(&caps, "e").to_vec(),
        };

        let int = |key: &str| -> Result<i64, Error> {
            let digits = match caps.name(key) {
                Some(m) => std::str::from_utf8(m.as_bytes())
                    .map_err(|err| Error::format(&shown, format!("bad {} value: {}", key, err)))?,
                None => return Ok(0),
            };

            digits
                .parse::<i64>()
                .map_err(|err| Error::format(&shown, format!("bad {} value {:?}: {}", key, digits, err)))
        };

        ClipRecord::clamped(
            os_string(basename, &shown)?,
            [int("r")?, int("x")?, int("y")?, int("w")?, int("h")?],
            &shown,
        )
    }
}

#[inline]
fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t [u8] {
    caps.name(name).map(|m| m.as_bytes()).unwrap_or_default()
}

#[cfg(unix)]
fn os_string(bytes: Vec<u8>, _file: &str) -> Result<OsString, Error> {
    use std::os::unix::ffi::OsStringExt;

    Ok(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn os_string(bytes: Vec<u8>, file: &str) -> Result<OsString, Error> {
    String::from_utf8(bytes)
        .map(OsString::from)
        .map_err(|_| Error::format(file, "file name is not valid UTF-8"))
}
