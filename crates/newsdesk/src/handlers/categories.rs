//! Category pages and newsletter subscriptions.

use askama::Template;
use axum::extract::{Path, Query, State};

use newsdesk_auth::{CurrentUser, OptionalUser};
use newsdesk_core::news::{Category, NewsFilter, PageWindow, SubscriptionOutcome, User};
use newsdesk_core::storage::RepositoryError;

use super::news::{load_page, NewsRow};
use super::pages::HtmlTemplate;
use crate::{handlers::AppError, models::PageQuery, state::AppState};

async fn load_category(state: &AppState, id: i64) -> Result<Category, AppError> {
    state
        .categories
        .get_category(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Category", id).into())
}

#[derive(Template)]
#[template(path = "categories.html")]
struct CategoriesTemplate {
    user: Option<User>,
    categories: Vec<Category>,
}

/// Handler for the category index (GET /categories).
pub async fn list_categories(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<HtmlTemplate<impl Template>, AppError> {
    let categories = state.categories.list_categories().await?;
    Ok(HtmlTemplate(CategoriesTemplate { user, categories }))
}

#[derive(Template)]
#[template(path = "category.html")]
struct CategoryTemplate {
    user: Option<User>,
    category: Category,
    is_subscribed: bool,
    subscriber_count: usize,
    rows: Vec<NewsRow>,
    window: PageWindow,
    page_link_prefix: String,
}

/// Handler for a category's news (GET /category/{id}).
///
/// Same ordering and page size as the main listing, plus whether the caller
/// subscribes to the category.
pub async fn category_news(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<HtmlTemplate<impl Template>, AppError> {
    let category = load_category(&state, id).await?;

    let filter = NewsFilter::default().with_category(id);
    let (rows, window) = load_page(&state, &filter, query.page()?).await?;

    let is_subscribed = match &user {
        Some(user) => state.subscriptions.is_subscribed(id, user.id).await?,
        None => false,
    };
    let subscriber_count = state.subscriptions.list_subscribers(id).await?.len();

    Ok(HtmlTemplate(CategoryTemplate {
        user,
        category,
        is_subscribed,
        subscriber_count,
        rows,
        window,
        page_link_prefix: format!("/category/{id}?"),
    }))
}

#[derive(Template)]
#[template(path = "subscribe.html")]
struct SubscriptionTemplate {
    user: Option<User>,
    category: Category,
    message: &'static str,
}

/// Handler for GET /category/{id}/subscribe.
///
/// Idempotent: subscribing twice leaves a single subscription.
pub async fn subscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<HtmlTemplate<impl Template>, AppError> {
    let category = load_category(&state, id).await?;

    let outcome = state.subscriptions.subscribe(id, user.id).await?;
    match outcome {
        SubscriptionOutcome::Subscribed => {
            tracing::info!(category_id = id, user_id = user.id, "User subscribed to category");
        }
        SubscriptionOutcome::AlreadySubscribed => {
            tracing::debug!(category_id = id, user_id = user.id, "User already subscribed");
        }
    }

    Ok(HtmlTemplate(SubscriptionTemplate {
        user: Some(user),
        category,
        message: "You have subscribed to the category newsletter",
    }))
}

/// Handler for GET /category/{id}/unsubscribe. Idempotent.
pub async fn unsubscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<HtmlTemplate<impl Template>, AppError> {
    let category = load_category(&state, id).await?;

    if state.subscriptions.unsubscribe(id, user.id).await? {
        tracing::info!(category_id = id, user_id = user.id, "User unsubscribed from category");
    }

    Ok(HtmlTemplate(SubscriptionTemplate {
        user: Some(user),
        category,
        message: "You have unsubscribed from the category newsletter",
    }))
}
