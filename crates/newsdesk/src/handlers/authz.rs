//! Authorization helpers for the write path.
//!
//! Permissions come from the caller's groups; superusers hold all of them.
//! Returns 403 Forbidden for authorization failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use newsdesk_core::news::{has_permission, Permission, User};

use crate::state::AppState;

/// Authorization error that maps to HTTP 403 Forbidden.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// User lacks the required permission.
    #[error("User {user_id} lacks the {} permission", .permission.codename())]
    MissingPermission { user_id: i64, permission: Permission },
    /// Failed to look up the user's groups (internal error).
    #[error("Group lookup failed for user {user_id}: {error}")]
    LookupFailed { user_id: i64, error: String },
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingPermission {
                user_id,
                permission,
            } => {
                tracing::warn!(
                    user_id,
                    permission = permission.codename(),
                    "Authorization denied: missing permission"
                );
                (
                    StatusCode::FORBIDDEN,
                    format!("Requires the {} permission", permission.codename()),
                )
                    .into_response()
            }
            Self::LookupFailed { user_id, error } => {
                tracing::error!(user_id, error = %error, "Authorization lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authorization check failed",
                )
                    .into_response()
            }
        }
    }
}

/// Requires `permission` through the user's groups.
pub async fn require_permission(
    state: &AppState,
    user: &User,
    permission: Permission,
) -> Result<(), AuthzError> {
    if user.is_superuser {
        return Ok(());
    }

    let groups = state
        .groups
        .get_groups_for_user(user.id)
        .await
        .map_err(|e| AuthzError::LookupFailed {
            user_id: user.id,
            error: e.to_string(),
        })?;

    if has_permission(user, &groups, permission) {
        Ok(())
    } else {
        Err(AuthzError::MissingPermission {
            user_id: user.id,
            permission,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_core::news::{authors_permissions, NewUser, AUTHORS_GROUP};

    #[tokio::test]
    async fn test_authors_may_add_but_not_delete() {
        let state = AppState::default();
        let user = state.users.create_user(&NewUser::new("writer")).await.unwrap();
        let group = state
            .groups
            .create_group(AUTHORS_GROUP, &authors_permissions())
            .await
            .unwrap();
        state.groups.add_user_to_group(user.id, group.id).await.unwrap();

        assert!(require_permission(&state, &user, Permission::AddNews)
            .await
            .is_ok());
        assert!(require_permission(&state, &user, Permission::ChangeNews)
            .await
            .is_ok());
        assert!(matches!(
            require_permission(&state, &user, Permission::DeleteNews).await,
            Err(AuthzError::MissingPermission { .. })
        ));
    }

    #[tokio::test]
    async fn test_user_without_groups_is_denied() {
        let state = AppState::default();
        let user = state.users.create_user(&NewUser::new("reader")).await.unwrap();

        let result = require_permission(&state, &user, Permission::AddNews).await;

        assert!(matches!(
            result,
            Err(AuthzError::MissingPermission {
                permission: Permission::AddNews,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_superuser_holds_every_permission() {
        let state = AppState::default();
        let admin = state
            .users
            .create_user(&NewUser::new("admin").superuser())
            .await
            .unwrap();

        assert!(require_permission(&state, &admin, Permission::DeleteNews)
            .await
            .is_ok());
    }
}
