use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Shorthand for a missing entity keyed by an integer id.
    pub fn not_found(entity_type: &'static str, id: i64) -> Self {
        RepositoryError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

impl From<crate::news::NewsError> for RepositoryError {
    fn from(error: crate::news::NewsError) -> Self {
        RepositoryError::InvalidData(error.to_string())
    }
}

impl From<crate::news::CategoryError> for RepositoryError {
    fn from(error: crate::news::CategoryError) -> Self {
        RepositoryError::InvalidData(error.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
