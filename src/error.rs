//! Error types for the mattershift library
//!
//! Every failure that can stop a document (or a whole batch, before it starts)
//! is a [`MattershiftError`]. Errors are grouped into an [`ErrorCategory`] so
//! the batch report can tell structure problems apart from I/O problems.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum MattershiftError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal errors
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Front matter block is not a well-formed mapping
    #[error("Invalid front matter in {path}: {reason}")]
    InvalidFrontMatter { path: PathBuf, reason: String },

    /// File bytes are not valid in the configured encoding
    #[error("Cannot decode {path} as {encoding}")]
    Decode { path: PathBuf, encoding: String },

    /// Rewritten text contains characters the configured encoding cannot represent
    #[error("Cannot encode {path} as {encoding}")]
    Encode { path: PathBuf, encoding: String },

    /// Failed to replace a file with its rewritten content
    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// Encoding label not recognised
    #[error("Unknown text encoding: {label}")]
    UnknownEncoding { label: String },

    /// Operation list could not be decoded
    #[error("Invalid operation list: {reason}")]
    InvalidOperations { reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MattershiftError>;

impl MattershiftError {
    /// Create a new invalid front matter error
    pub fn invalid_front_matter(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFrontMatter {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new decode error
    pub fn decode(path: impl Into<PathBuf>, encoding: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            encoding: encoding.into(),
        }
    }

    /// Create a new encode error
    pub fn encode(path: impl Into<PathBuf>, encoding: impl Into<String>) -> Self {
        Self::Encode {
            path: path.into(),
            encoding: encoding.into(),
        }
    }

    /// Create a new write error
    pub fn write(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new unknown encoding error
    pub fn unknown_encoding(label: impl Into<String>) -> Self {
        Self::UnknownEncoding {
            label: label.into(),
        }
    }

    /// Create a new invalid operations error
    pub fn invalid_operations(reason: impl Into<String>) -> Self {
        Self::InvalidOperations {
            reason: reason.into(),
        }
    }

    /// Classify this error for batch reporting
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Yaml(_) | Self::InvalidFrontMatter { .. } => ErrorCategory::Parse,
            Self::Io(_)
            | Self::Walk(_)
            | Self::Decode { .. }
            | Self::Encode { .. }
            | Self::Write { .. } => ErrorCategory::Io,
            Self::Json(_) | Self::UnknownEncoding { .. } | Self::InvalidOperations { .. } => {
                ErrorCategory::Config
            }
        }
    }
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// The metadata block is not a well-formed mapping
    Parse,
    /// The file could not be read, decoded, encoded or written
    Io,
    /// The batch itself is misconfigured
    Config,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "PARSE"),
            Self::Io => write!(f, "IO"),
            Self::Config => write!(f, "CONFIG"),
        }
    }
}
