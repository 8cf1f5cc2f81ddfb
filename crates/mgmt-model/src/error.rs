//! Error types for mgmt-model

/// Result type for mgmt-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating a resource tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A child with the same type and name is already registered
    #[error("Duplicate resource {child_type}={name}")]
    DuplicateChild { child_type: String, name: String },

    /// No child with the given type and name exists
    #[error("Child resource {child_type}={name} not found")]
    ChildNotFound { child_type: String, name: String },

    /// No resource exists at the given address
    #[error("No resource at {address}")]
    ResourceNotFound { address: String },
}
