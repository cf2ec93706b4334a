use err_derive::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(display = "{}: {}", file, reason)]
    Format { file: String, reason: String },

    #[error(display = "cannot list clip directory {}: {}", path, err)]
    MissingDirectory { path: String, err: std::io::Error },

    #[error(display = "invalid clip name format {:?}: {}", format, reason)]
    Pattern { format: String, reason: String },

    #[error(display = "IO Error: {}", _0)]
    Io(std::io::Error),
}

impl Error {
    pub(crate) fn format(file: &str, reason: impl Into<String>) -> Self {
        Self::Format {
            file: file.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn pattern(format: &str, reason: impl Into<String>) -> Self {
        Self::Pattern {
            format: format.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
