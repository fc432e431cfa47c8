//! Error type shared by every collaborator trait

use std::fmt;

/// Failure reported by the content backend
///
/// Storage implementations convert their own error types into this one so
/// that the protocol layer never depends on a concrete backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The addressed record does not exist
    NotFound(String),

    /// The backend refused the operation (invalid field, constraint violation)
    Rejected(String),

    /// The backend could not be reached or failed internally
    Unavailable(String),
}

impl RepositoryError {
    /// Human-readable message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            RepositoryError::NotFound(msg)
            | RepositoryError::Rejected(msg)
            | RepositoryError::Unavailable(msg) => msg,
        }
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for RepositoryError {}
