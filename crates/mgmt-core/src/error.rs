//! Error types for mgmt-core

/// Result type for mgmt-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while executing operations or driving persistence
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operation was rejected by the executor
    #[error("Operation {operation} failed: {message}")]
    OperationFailed { operation: String, message: String },

    /// The operation targets a resource that does not exist
    #[error("No resource at {address}")]
    NoSuchResource { address: String },

    /// The operation would create a resource that already exists
    #[error("Resource already exists at {address}")]
    DuplicateResource { address: String },

    /// Invalid persistence configuration
    #[error("Invalid persistence configuration: {message}")]
    Config { message: String },

    // Transparent wrappers for underlying crate errors
    /// Tree model error from mgmt-model
    #[error(transparent)]
    Model(#[from] mgmt_model::Error),

    /// Directory codec error from mgmt-fs
    #[error(transparent)]
    Fs(#[from] mgmt_fs::Error),

    /// Diff error from mgmt-diff
    #[error(transparent)]
    Diff(#[from] mgmt_diff::Error),
}
