//! Error types for mgmt-fs

use std::path::{Path, PathBuf};

/// Result type for mgmt-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while persisting or reading a resource tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem failure. `path` is always absolute.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A file the codec does not own was found inside a persisted tree
    #[error("Unexpected file: {path}")]
    UnexpectedFile { path: PathBuf },

    #[error("Illegal state: {message}")]
    IllegalState { message: String },

    #[error("Malformed escape sequence in '{name}' at {position}")]
    MalformedEncoding { name: String, position: usize },

    #[error("Registration is missing for child resource {address}")]
    ChildRegistrationMissing { address: String },

    #[error("Failed to parse attributes at {path}: {message}")]
    AttributeParse { path: PathBuf, message: String },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} config for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error(transparent)]
    Model(#[from] mgmt_model::Error),
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref();
        Self::Io {
            path: std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
            source,
        }
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
