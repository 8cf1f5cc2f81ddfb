//! Error types for mgmt-diff

/// Result type for mgmt-diff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while diffing resource trees
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Without metadata the attribute key sets of both sides must match
    #[error("Attribute set {actual:?} at {address} is inconsistent with the target one {target:?}")]
    InconsistentModel {
        address: String,
        actual: Vec<String>,
        target: Vec<String>,
    },

    #[error("Registration is missing for child resource {address}")]
    ChildRegistrationMissing { address: String },

    #[error("Illegal state: {message}")]
    IllegalState { message: String },

    #[error(transparent)]
    Fs(#[from] mgmt_fs::Error),
}
