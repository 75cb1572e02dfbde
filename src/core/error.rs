//! Error model shared by the walker, the reader and the session
//!
//! Every public operation returns either a payload or an [`AccessError`];
//! adapters render the error message, never a panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error category, used for stable machine-readable codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Containment violation, missing path, wrong path type, bad root
    InvalidPath,
    /// Symbolic link or special file at an explicitly requested target
    UnsupportedPath,
    /// Target matches the exclusion ruleset
    ExcludedPath,
    /// File exceeds the size limit
    ResourceLimit,
    /// Content is not valid text
    DecodeFailure,
    /// Stat/list/read failure
    TransientIo,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidPath => "INVALID_PATH",
            ErrorKind::UnsupportedPath => "UNSUPPORTED_PATH",
            ErrorKind::ExcludedPath => "EXCLUDED_PATH",
            ErrorKind::ResourceLimit => "RESOURCE_LIMIT",
            ErrorKind::DecodeFailure => "DECODE_FAILURE",
            ErrorKind::TransientIo => "TRANSIENT_IO",
        }
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Repository path must be an absolute path")]
    AmbiguousRoot,

    #[error("Repository path must be absolute, got: {0}")]
    RelativeRoot(String),

    #[error("Repository path does not exist: {0}")]
    MissingRoot(String),

    #[error("Repository path is not a directory: {0}")]
    RootNotDirectory(String),

    #[error("Attempted to access path outside repository: {0}")]
    OutsideRoot(String),

    #[error("Path {0} not found")]
    NotFound(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("Symbolic links are not supported: {0}")]
    Symlink(String),

    #[error("Unsupported file type at {0}")]
    UnsupportedType(String),

    #[error("{0} is ignored based on .gitignore patterns")]
    Excluded(String),

    #[error("File {path} is too large ({size} bytes). Maximum size is {max} bytes.")]
    TooLarge { path: String, size: u64, max: u64 },

    #[error("File {0} appears to be a binary file")]
    Binary(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AccessError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AccessError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::AmbiguousRoot
            | AccessError::RelativeRoot(_)
            | AccessError::MissingRoot(_)
            | AccessError::RootNotDirectory(_)
            | AccessError::OutsideRoot(_)
            | AccessError::NotFound(_)
            | AccessError::NotAFile(_) => ErrorKind::InvalidPath,
            AccessError::Symlink(_) | AccessError::UnsupportedType(_) => {
                ErrorKind::UnsupportedPath
            }
            AccessError::Excluded(_) => ErrorKind::ExcludedPath,
            AccessError::TooLarge { .. } => ErrorKind::ResourceLimit,
            AccessError::Binary(_) => ErrorKind::DecodeFailure,
            AccessError::Io { .. } => ErrorKind::TransientIo,
        }
    }
}

/// Serializable form of an [`AccessError`], used by the JSON renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl ErrorPayload {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&AccessError> for ErrorPayload {
    fn from(err: &AccessError) -> Self {
        Self::new(err.kind().as_str(), err.to_string())
    }
}
