use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error kinds
// ---------------------------------------------------------------------------

/// Every failure aborts the invocation; `main` prints it and exits with 1.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or unknown mode selector, or a wrong number of files.
    #[error("usage error: {0}")]
    Usage(String),

    /// Unknown option, malformed `key=value` token, or a missing required option.
    #[error("argument error: {0}")]
    Argument(String),

    /// An option value that does not coerce to the option's type.
    #[error("type error: {option}={value:?} is not a valid {expected}")]
    Type {
        option: String,
        value: String,
        expected: &'static str,
    },

    /// Data file unreadable or not a rectangular numeric table.
    #[error("failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl Error {
    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn type_error(option: &str, value: &str, expected: &'static str) -> Self {
        Error::Type {
            option: option.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

/// Failures raised while drawing or encoding the figure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format for {}: expected one of {supported}", path.display())]
    UnsupportedFormat {
        path: PathBuf,
        supported: &'static str,
    },

    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("encoding image failed: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
