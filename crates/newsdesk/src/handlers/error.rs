use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use newsdesk_core::news::{NewsError, PaginationError};
use newsdesk_core::storage::{repository_error_to_status_code, RepositoryError};

use super::authz::AuthzError;
use crate::models::FormError;

pub struct AppError(pub anyhow::Error);

fn status_for(err: &anyhow::Error) -> StatusCode {
    if let Some(repo_error) = err.downcast_ref::<RepositoryError>() {
        let code = repository_error_to_status_code(repo_error);
        return StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    }

    if let Some(page_error) = err.downcast_ref::<PaginationError>() {
        return match page_error {
            PaginationError::InvalidPage(_) => StatusCode::BAD_REQUEST,
            PaginationError::OutOfRange { .. } => StatusCode::NOT_FOUND,
        };
    }

    if err.is::<NewsError>() || err.is::<FormError>() {
        return StatusCode::BAD_REQUEST;
    }

    StatusCode::INTERNAL_SERVER_ERROR
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = match self.0.downcast::<AuthzError>() {
            Ok(authz) => return authz.into_response(),
            Err(err) => err,
        };

        let status_code = status_for(&err);
        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %err, "Request failed");
        } else {
            tracing::debug!(status = %status_code, error = %err, "Request rejected");
        }

        (status_code, err.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_core::news::Permission;

    fn status(err: impl Into<anyhow::Error>) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_repository_errors_use_their_status() {
        assert_eq!(
            status(RepositoryError::not_found("News", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(RepositoryError::InvalidData("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_pagination_errors() {
        assert_eq!(
            status(PaginationError::InvalidPage("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(PaginationError::OutOfRange { page: 9, last: 2 }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        assert_eq!(status(NewsError::EmptyHeading), StatusCode::BAD_REQUEST);
        assert_eq!(status(FormError::Missing("Category")), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_authz_error_is_forbidden() {
        assert_eq!(
            status(AuthzError::MissingPermission {
                user_id: 1,
                permission: Permission::AddNews,
            }),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_unknown_errors_are_internal() {
        assert_eq!(
            status(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
