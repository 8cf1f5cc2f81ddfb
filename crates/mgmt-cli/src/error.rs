//! Error types for mgmt-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mgmt-core
    #[error(transparent)]
    Core(#[from] mgmt_core::Error),

    /// Error from mgmt-fs
    #[error(transparent)]
    Fs(#[from] mgmt_fs::Error),

    /// Error from mgmt-diff
    #[error(transparent)]
    Diff(#[from] mgmt_diff::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
