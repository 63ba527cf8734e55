//! Read-side news handlers: the paginated listing, search and the cached detail page.

use std::collections::HashMap;

use askama::Template;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};

use newsdesk_auth::OptionalUser;
use newsdesk_core::news::{
    resolve_page, Category, News, NewsFilter, NewsType, PageNumber, PageWindow, User,
};
use newsdesk_core::storage::{RepositoryError, Result as RepoResult};

use super::pages::{HtmlTemplate, SelectOption};
use crate::{handlers::AppError, models::NewsQuery, state::AppState};

/// Characters of body text shown in listings.
const PREVIEW_CHARS: usize = 50;

/// A news record with its author and category resolved for display.
pub struct NewsRow {
    pub news: News,
    pub author: String,
    pub category: String,
}

impl NewsRow {
    pub fn preview(&self) -> String {
        self.news.preview(PREVIEW_CHARS)
    }

    pub fn published(&self) -> String {
        self.news.pub_date.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Base path of the entry point that owns this record, e.g. `/article/4`.
    pub fn base_path(&self) -> String {
        format!("/{}/{}", self.news.news_type.route_segment(), self.news.id)
    }
}

/// Resolves author and category names for a batch of records.
///
/// Records pointing at rows that no longer exist are still shown.
pub(crate) async fn present_news(
    state: &AppState,
    items: Vec<News>,
) -> RepoResult<Vec<NewsRow>> {
    let categories: HashMap<i64, String> = state
        .categories
        .list_categories()
        .await?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect();

    let mut authors: HashMap<i64, String> = HashMap::new();
    for news in &items {
        if authors.contains_key(&news.author_id) {
            continue;
        }
        let name = match state.users.get_user(news.author_id).await? {
            Some(user) => user.username,
            None => format!("user #{}", news.author_id),
        };
        authors.insert(news.author_id, name);
    }

    Ok(items
        .into_iter()
        .map(|news| NewsRow {
            author: authors.get(&news.author_id).cloned().unwrap_or_default(),
            category: categories
                .get(&news.category_id)
                .cloned()
                .unwrap_or_else(|| format!("category #{}", news.category_id)),
            news,
        })
        .collect())
}

/// Loads one page of `filter`, newest first.
pub(crate) async fn load_page(
    state: &AppState,
    filter: &NewsFilter,
    requested: PageNumber,
) -> Result<(Vec<NewsRow>, PageWindow), AppError> {
    let total = state.news.count_news(filter).await?;
    let window = resolve_page(requested, total, state.config.page_size)?;
    let items = state.news.list_news(filter, Some(window)).await?;
    let rows = present_news(state, items).await?;
    Ok((rows, window))
}

/// Prefix for pagination links that keeps the current filter, ending in `?` or `&`.
fn page_link_prefix(path: &str, filter_query: &str) -> String {
    if filter_query.is_empty() {
        format!("{path}?")
    } else {
        format!("{path}?{filter_query}&")
    }
}

// ============================================================================
// List
// ============================================================================

#[derive(Template)]
#[template(path = "news_list.html")]
struct NewsListTemplate {
    user: Option<User>,
    rows: Vec<NewsRow>,
    window: PageWindow,
    page_link_prefix: String,
    time_now: DateTime<Utc>,
}

/// Handler for the news listing (GET /news).
pub async fn list_news(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<NewsQuery>,
) -> Result<HtmlTemplate<impl Template>, AppError> {
    let filter = query.filter();
    let (rows, window) = load_page(&state, &filter, query.page()?).await?;

    tracing::trace!(
        page = window.number,
        total = window.total_items,
        filtered = !filter.is_empty(),
        "Listing news"
    );

    Ok(HtmlTemplate(NewsListTemplate {
        user,
        rows,
        window,
        page_link_prefix: page_link_prefix("/news", &query.filter_query()),
        time_now: Utc::now(),
    }))
}

// ============================================================================
// Search
// ============================================================================

/// Current values of the search form.
struct SearchForm {
    heading: String,
    author: String,
    date_from: String,
    date_to: String,
    categories: Vec<SelectOption>,
    types: Vec<SelectOption>,
}

impl SearchForm {
    fn new(filter: &NewsFilter, categories: &[Category]) -> Self {
        let date = |d: Option<chrono::NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };

        Self {
            heading: filter.heading.clone().unwrap_or_default(),
            author: filter.author_id.map(|id| id.to_string()).unwrap_or_default(),
            date_from: date(filter.date_from),
            date_to: date(filter.date_to),
            categories: categories
                .iter()
                .map(|c| {
                    SelectOption::new(c.id, c.name.clone(), filter.category_id == Some(c.id))
                })
                .collect(),
            types: [NewsType::News, NewsType::Article]
                .into_iter()
                .map(|t| SelectOption::new(t.code(), t.label(), filter.news_type == Some(t)))
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "news_search.html")]
struct NewsSearchTemplate {
    user: Option<User>,
    form: SearchForm,
    rows: Vec<NewsRow>,
}

/// Handler for the search page (GET /news/search). Matches are not paginated.
pub async fn search_news(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<NewsQuery>,
) -> Result<HtmlTemplate<impl Template>, AppError> {
    let filter = query.filter();
    let items = state.news.list_news(&filter, None).await?;
    let categories = state.categories.list_categories().await?;
    let rows = present_news(&state, items).await?;

    tracing::trace!(matches = rows.len(), "Searching news");

    Ok(HtmlTemplate(NewsSearchTemplate {
        user,
        form: SearchForm::new(&filter, &categories),
        rows,
    }))
}

// ============================================================================
// Detail
// ============================================================================

#[derive(Template)]
#[template(path = "news_detail.html")]
struct NewsDetailTemplate {
    user: Option<User>,
    row: NewsRow,
}

/// Handler for one news item (GET /news/{id}).
///
/// Served through the cache; a snapshot may outlive changes to the record.
pub async fn news_detail(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
) -> Result<HtmlTemplate<impl Template>, AppError> {
    let news = state
        .news
        .get_news(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("News", id))?;

    let row = present_news(&state, vec![news])
        .await?
        .pop()
        .ok_or_else(|| RepositoryError::not_found("News", id))?;

    Ok(HtmlTemplate(NewsDetailTemplate { user, row }))
}
