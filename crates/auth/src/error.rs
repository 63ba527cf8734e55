use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use newsdesk_core::storage::{repository_error_to_status_code, RepositoryError};
use thiserror::Error;

/// Auth errors for the newsdesk_auth crate.
///
/// This wraps the core `AuthError` and adds the user lookups that happen during
/// sign-in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (validation, session storage)
    #[error(transparent)]
    Core(#[from] newsdesk_core::auth::AuthError),

    /// Error while reading or creating the signed-in user
    #[error("user storage error: {0}")]
    Users(#[from] RepositoryError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use newsdesk_core::auth::AuthError as CoreError;

        let (status, message) = match &self {
            AuthError::Core(core_err) => match core_err {
                CoreError::InvalidUsername(_) => (StatusCode::BAD_REQUEST, self.to_string()),
                CoreError::SessionNotFound
                | CoreError::SessionExpired
                | CoreError::UserNotFound => (StatusCode::UNAUTHORIZED, self.to_string()),
                CoreError::Storage(_) => {
                    tracing::error!("Auth error: {}", self);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            AuthError::Users(repo_err) => {
                let status = StatusCode::from_u16(repository_error_to_status_code(repo_err))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!("User storage error during auth: {}", self);
                    (status, "Internal server error".to_string())
                } else {
                    (status, self.to_string())
                }
            }
        };

        (status, message).into_response()
    }
}
