//! Startup data: the authors group and, on an empty store, a few demo records.

use chrono::{Duration, Utc};

use newsdesk_core::news::{
    authors_permissions, Group, NewUser, NewsDraft, NewsType, AUTHORS_GROUP,
};
use newsdesk_core::storage::Result;

use crate::state::AppState;

const DEMO_CATEGORIES: [&str; 4] = ["Sports", "Politics", "Science", "Culture"];

/// Makes sure the authors group exists. Returns it either way.
pub async fn ensure_authors_group(state: &AppState) -> Result<Group> {
    if let Some(group) = state.groups.get_group_by_name(AUTHORS_GROUP).await? {
        return Ok(group);
    }

    let group = state
        .groups
        .create_group(AUTHORS_GROUP, &authors_permissions())
        .await?;
    tracing::info!(group_id = group.id, group = AUTHORS_GROUP, "Created group");
    Ok(group)
}

/// Seeds demo users, categories and news when no categories exist yet.
///
/// Returns whether anything was written.
pub async fn seed_demo_data(state: &AppState) -> Result<bool> {
    if !state.categories.list_categories().await?.is_empty() {
        tracing::debug!("Store already has categories, skipping demo data");
        return Ok(false);
    }

    let authors = ensure_authors_group(state).await?;

    let mut categories = Vec::with_capacity(DEMO_CATEGORIES.len());
    for name in DEMO_CATEGORIES {
        categories.push(state.categories.create_category(name).await?);
    }

    let editor = state
        .users
        .create_user(&NewUser::new("editor").with_email("editor@newsdesk.local"))
        .await?;
    state.groups.add_user_to_group(editor.id, authors.id).await?;
    state
        .users
        .create_user(&NewUser::new("reader").with_email("reader@newsdesk.local"))
        .await?;

    let now = Utc::now();
    let stories = [
        (
            0,
            NewsType::News,
            "Home side wins the derby",
            "A late header settled a tense derby in front of a full stadium.",
        ),
        (
            1,
            NewsType::News,
            "Parliament passes the budget",
            "The budget passed its final reading after a long night of amendments.",
        ),
        (
            2,
            NewsType::Article,
            "Why the deep sea still surprises us",
            "Every survey of the abyssal plain turns up species nobody has described before.",
        ),
        (
            3,
            NewsType::Article,
            "A season of small theatres",
            "Fringe venues are having their best year in a decade, and it shows on stage.",
        ),
        (
            0,
            NewsType::Article,
            "The tactics behind a title run",
            "Pressing high is half the story; the rest is what happens after winning the ball.",
        ),
    ];

    for (offset, (category_index, news_type, heading, text)) in stories.into_iter().enumerate() {
        let draft = NewsDraft {
            author_id: editor.id,
            heading: heading.to_string(),
            text: text.to_string(),
            pub_date: now - Duration::hours(offset as i64 * 6),
            category_id: categories[category_index].id,
            news_type,
        };
        state.news.create_news(&draft).await?;
    }

    tracing::info!(
        categories = categories.len(),
        news = stories.len(),
        "Seeded demo data"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_core::news::NewsFilter;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let state = AppState::default();

        assert!(seed_demo_data(&state).await.unwrap());
        assert!(!seed_demo_data(&state).await.unwrap());

        let categories = state.categories.list_categories().await.unwrap();
        assert_eq!(categories.len(), DEMO_CATEGORIES.len());
        assert_eq!(
            state.news.count_news(&NewsFilter::default()).await.unwrap(),
            5
        );
    }

    #[tokio::test]
    async fn test_editor_is_an_author() {
        let state = AppState::default();
        seed_demo_data(&state).await.unwrap();

        let editor = state
            .users
            .get_user_by_username("editor")
            .await
            .unwrap()
            .unwrap();
        let groups = state.groups.get_groups_for_user(editor.id).await.unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, AUTHORS_GROUP);
    }

    #[tokio::test]
    async fn test_seed_creates_no_superuser() {
        let state = AppState::default();
        seed_demo_data(&state).await.unwrap();

        for username in ["editor", "reader"] {
            let user = state
                .users
                .get_user_by_username(username)
                .await
                .unwrap()
                .unwrap();
            assert!(!user.is_superuser, "{username}");
        }
        assert!(state
            .users
            .get_user_by_username("admin")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_ensure_authors_group_reuses_existing() {
        let state = AppState::default();

        let first = ensure_authors_group(&state).await.unwrap();
        let second = ensure_authors_group(&state).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.permissions, authors_permissions());
    }
}
