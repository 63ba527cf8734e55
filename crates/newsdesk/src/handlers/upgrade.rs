use axum::{extract::State, response::Redirect};

use newsdesk_auth::CurrentUser;
use newsdesk_core::news::{is_member_of, AUTHORS_GROUP};
use newsdesk_core::storage::RepositoryError;

use crate::{handlers::AppError, state::AppState};

/// Handler for GET /upgrade.
///
/// Adds the caller to the authors group without any approval step, then sends
/// them back to the listing. Calling it again changes nothing.
pub async fn upgrade_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Redirect, AppError> {
    let authors = state
        .groups
        .get_group_by_name(AUTHORS_GROUP)
        .await?
        .ok_or_else(|| RepositoryError::NotFound {
            entity_type: "Group",
            id: AUTHORS_GROUP.to_string(),
        })?;

    let groups = state.groups.get_groups_for_user(user.id).await?;
    if !is_member_of(&groups, AUTHORS_GROUP) {
        state.groups.add_user_to_group(user.id, authors.id).await?;
        tracing::info!(
            user_id = user.id,
            username = %user.username,
            group = AUTHORS_GROUP,
            "User joined group"
        );
    }

    Ok(Redirect::to("/news"))
}
