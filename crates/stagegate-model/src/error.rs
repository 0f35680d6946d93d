//! Error types for the model crate

/// Parse failures for model identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Role string not recognised
    #[error("unknown role: '{0}'")]
    UnknownRole(String),

    /// Permission string not recognised
    #[error("unknown permission: '{0}'")]
    UnknownPermission(String),

    /// Stage string not recognised
    #[error("unknown project stage: '{0}'")]
    UnknownStage(String),

    /// Task ids are positive
    #[error("invalid task id: {0}")]
    InvalidTaskId(String),
}
