//! HTTP status codes for repository failures.

use super::RepositoryError;

/// Status code a handler should answer with when storage fails.
///
/// Missing rows are 404 and duplicates 409. Rows that break a reference or a
/// validation rule are the caller's fault (400). An unreachable database is 503,
/// anything else that went wrong inside storage is 500.
///
/// ```
/// use newsdesk_core::storage::{repository_error_to_status_code, RepositoryError};
///
/// let missing = RepositoryError::not_found("News", 42);
/// assert_eq!(repository_error_to_status_code(&missing), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::InvalidData(_) => 400,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_) => 500,
    }
}
