//! Error types for the quiz registry.

use thiserror::Error;

use crate::publish::PublishError;

/// Errors that can occur while registering, launching or listing quizzes.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The submitted quiz is malformed (too few options, bad correct index).
    #[error("invalid quiz content: {0}")]
    InvalidContent(String),

    /// A quiz with this token is already registered.
    #[error("quiz token '{0}' is already registered")]
    DuplicateToken(String),

    /// The token is unknown: it never existed, expired, or was already
    /// launched elsewhere and re-keyed away.
    #[error("quiz token '{0}' is unknown or no longer valid")]
    UnknownToken(String),

    /// The owner index points at a record the store does not hold.
    /// Indicates the registry invariant was already violated.
    #[error("owner '{owner}' has no stored quiz for token '{token}'")]
    StoreInconsistency { owner: String, token: String },

    /// The publish collaborator failed; the registry was left untouched.
    #[error("failed to publish quiz")]
    PublishFailed(#[from] PublishError),
}
