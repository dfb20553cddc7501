//! UseCase errors.

use thiserror::Error;

use crate::domain::RepositoryError;

/// The connection an event came from is not (or no longer) registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
}

impl From<RepositoryError> for SessionError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::ConnectionNotFound(id) => SessionError::ConnectionNotFound(id),
        }
    }
}

/// Import payload rejected; stored transcripts are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("import payload is not a JSON array: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("event router has stopped")]
    Closed,
}
