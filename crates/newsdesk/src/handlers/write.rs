//! Create, edit and delete handlers for news and articles.
//!
//! Both flavours share one implementation. The entry point is a type parameter
//! that fixes the stamped type and the fields an edit may touch.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;

use newsdesk_auth::{AuthRejection, CurrentUser, OptionalUser};
use newsdesk_core::news::{validate_draft, validate_update, News, NewsType, Permission, User};
use newsdesk_core::storage::RepositoryError;

use super::authz::require_permission;
use super::pages::{HtmlTemplate, SelectOption};
use crate::{
    handlers::AppError,
    models::{FormError, NewsForm},
    state::AppState,
};

/// An entry point of the write path.
pub trait EntryPoint: Send + Sync + 'static {
    /// Type stamped on records created here.
    const TYPE: NewsType;
}

/// `/news/...`: creates `NW` records and edits every field.
pub struct NewsEntry;

/// `/article/...`: creates `AR` records and edits author, heading and text.
pub struct ArticleEntry;

impl EntryPoint for NewsEntry {
    const TYPE: NewsType = NewsType::News;
}

impl EntryPoint for ArticleEntry {
    const TYPE: NewsType = NewsType::Article;
}

fn segment<E: EntryPoint>() -> &'static str {
    E::TYPE.route_segment()
}

async fn load_news(state: &AppState, id: i64) -> Result<News, AppError> {
    state
        .news_source
        .get_news(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("News", id).into())
}

// ============================================================================
// Form page
// ============================================================================

#[derive(Template)]
#[template(path = "news_form.html")]
struct NewsFormTemplate {
    user: Option<User>,
    title: String,
    action: String,
    author: String,
    heading: String,
    text: String,
    pub_date: String,
    categories: Vec<SelectOption>,
    /// Article edits cannot move the publication date or the category.
    show_date_and_category: bool,
    error: Option<String>,
}

struct FormValues {
    author: Option<i64>,
    heading: String,
    text: String,
    pub_date: String,
    category: Option<i64>,
}

impl FormValues {
    fn from_news(news: &News) -> Self {
        Self {
            author: Some(news.author_id),
            heading: news.heading.clone(),
            text: news.text.clone(),
            pub_date: news.pub_date.format("%Y-%m-%dT%H:%M").to_string(),
            category: Some(news.category_id),
        }
    }

    fn from_form(form: &NewsForm) -> Self {
        Self {
            author: form.author,
            heading: form.heading.clone(),
            text: form.text.clone(),
            pub_date: form
                .pub_date
                .map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
                .unwrap_or_default(),
            category: form.category,
        }
    }
}

async fn render_form(
    state: &AppState,
    user: User,
    title: String,
    action: String,
    values: FormValues,
    show_date_and_category: bool,
    error: Option<String>,
) -> Result<Response, AppError> {
    let categories = state
        .categories
        .list_categories()
        .await?
        .into_iter()
        .map(|c| SelectOption::new(c.id, c.name, values.category == Some(c.id)))
        .collect();

    let status = if error.is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    let page = NewsFormTemplate {
        author: values.author.unwrap_or(user.id).to_string(),
        user: Some(user),
        title,
        action,
        heading: values.heading,
        text: values.text,
        pub_date: values.pub_date,
        categories,
        show_date_and_category,
        error,
    };

    Ok((status, HtmlTemplate(page)).into_response())
}

// ============================================================================
// Create
// ============================================================================

/// GET /{news,article}/create
pub async fn create_form<E: EntryPoint>(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    require_permission(&state, &user, Permission::AddNews).await?;

    let values = FormValues {
        author: None,
        heading: String::new(),
        text: String::new(),
        pub_date: String::new(),
        category: None,
    };
    render_form(
        &state,
        user,
        format!("Create {}", E::TYPE.label().to_lowercase()),
        format!("/{}/create", segment::<E>()),
        values,
        true,
        None,
    )
    .await
}

/// POST /{news,article}/create
pub async fn create<E: EntryPoint>(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NewsForm>,
) -> Result<Response, AppError> {
    require_permission(&state, &user, Permission::AddNews).await?;

    let values = FormValues::from_form(&form);
    let draft = form
        .into_draft(E::TYPE, user.id, Utc::now())
        .and_then(|draft| validate_draft(&draft).map(|_| draft).map_err(FormError::from));

    let rejected = match draft {
        Ok(draft) => match state.news.create_news(&draft).await {
            Ok(news) => {
                tracing::info!(
                    news_id = news.id,
                    news_type = %news.news_type,
                    actor_id = user.id,
                    "News published"
                );
                return Ok(Redirect::to("/news").into_response());
            }
            Err(RepositoryError::InvalidData(reason)) => reason,
            Err(err) => return Err(err.into()),
        },
        Err(err) => err.to_string(),
    };

    tracing::debug!(reason = %rejected, "Rejected news form");
    render_form(
        &state,
        user,
        format!("Create {}", E::TYPE.label().to_lowercase()),
        format!("/{}/create", segment::<E>()),
        values,
        true,
        Some(rejected),
    )
    .await
}

// ============================================================================
// Edit
// ============================================================================

/// GET /{news,article}/{id}/edit
pub async fn edit_form<E: EntryPoint>(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    require_permission(&state, &user, Permission::ChangeNews).await?;
    let news = load_news(&state, id).await?;

    render_form(
        &state,
        user,
        format!("Edit {}", E::TYPE.label().to_lowercase()),
        format!("/{}/{id}/edit", segment::<E>()),
        FormValues::from_news(&news),
        E::TYPE == NewsType::News,
        None,
    )
    .await
}

/// POST /{news,article}/{id}/edit
pub async fn edit<E: EntryPoint>(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<NewsForm>,
) -> Result<Response, AppError> {
    require_permission(&state, &user, Permission::ChangeNews).await?;
    let existing = load_news(&state, id).await?;

    let values = FormValues::from_form(&form);
    let updated = form.into_changes(E::TYPE).apply_to(&existing);

    let rejected = match validate_update(&existing, &updated) {
        Ok(()) => match state.news.update_news(&updated).await {
            Ok(()) => {
                tracing::info!(news_id = id, actor_id = user.id, "News updated");
                return Ok(Redirect::to(&format!("/news/{id}")).into_response());
            }
            Err(RepositoryError::InvalidData(reason)) => reason,
            Err(err) => return Err(err.into()),
        },
        Err(err) => err.to_string(),
    };

    tracing::debug!(news_id = id, reason = %rejected, "Rejected news edit");
    render_form(
        &state,
        user,
        format!("Edit {}", E::TYPE.label().to_lowercase()),
        format!("/{}/{id}/edit", segment::<E>()),
        values,
        E::TYPE == NewsType::News,
        Some(rejected),
    )
    .await
}

// ============================================================================
// Delete
// ============================================================================

#[derive(Template)]
#[template(path = "news_delete.html")]
struct NewsDeleteTemplate {
    user: Option<User>,
    news: News,
    action: String,
}

/// Applies the delete rule. Open to everyone unless `enforce_delete_permission` is
/// set, in which case the caller must be signed in and hold `delete_news`.
async fn authorize_delete(
    state: &AppState,
    user: Option<&User>,
    path: String,
) -> Result<(), Response> {
    if !state.config.enforce_delete_permission {
        return Ok(());
    }

    let Some(user) = user else {
        return Err(AuthRejection::LoginRequired { next: path }.into_response());
    };

    require_permission(state, user, Permission::DeleteNews)
        .await
        .map_err(IntoResponse::into_response)
}

/// GET /{news,article}/{id}/delete
pub async fn delete_form<E: EntryPoint>(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let action = format!("/{}/{id}/delete", segment::<E>());
    if let Err(response) = authorize_delete(&state, user.as_ref(), action.clone()).await {
        return Ok(response);
    }

    let news = load_news(&state, id).await?;

    Ok(HtmlTemplate(NewsDeleteTemplate { user, news, action }).into_response())
}

/// POST /{news,article}/{id}/delete
pub async fn delete<E: EntryPoint>(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let path = format!("/{}/{id}/delete", segment::<E>());
    if let Err(response) = authorize_delete(&state, user.as_ref(), path).await {
        return Ok(response);
    }

    state.news.delete_news(id).await?;
    tracing::info!(
        news_id = id,
        actor_id = ?user.as_ref().map(|u| u.id),
        "News deleted"
    );

    Ok(Redirect::to("/news").into_response())
}
