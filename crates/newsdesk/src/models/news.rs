use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use newsdesk_core::news::{
    parse_page_number, NewsChanges, NewsDraft, NewsError, NewsFilter, NewsType, PageNumber,
    PaginationError,
};
use newsdesk_core::serde::{
    deserialize_optional_date, deserialize_optional_datetime, deserialize_optional_id,
    deserialize_optional_news_type, deserialize_optional_string,
};

/// Query string of the listing and search pages.
///
/// Blank inputs from the filter form are treated as unset.
#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub author: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub heading: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_news_type")]
    pub news_type: Option<NewsType>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_to: Option<NaiveDate>,
    /// Kept as text so a non-numeric page is reported as a bad request by the handler.
    #[serde(default)]
    pub page: Option<String>,
}

impl NewsQuery {
    pub fn filter(&self) -> NewsFilter {
        NewsFilter {
            author_id: self.author,
            category_id: self.category,
            heading: self.heading.clone(),
            news_type: self.news_type,
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }

    pub fn page(&self) -> Result<PageNumber, PaginationError> {
        parse_page_number(self.page.as_deref())
    }

    /// The filter part of the query string, for pagination links.
    pub fn filter_query(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(author) = self.author {
            pairs.push(("author", author.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(heading) = &self.heading {
            pairs.push(("heading", heading.clone()));
        }
        if let Some(news_type) = self.news_type {
            pairs.push(("news_type", news_type.code().to_string()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("date_from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("date_to", to.format("%Y-%m-%d").to_string()));
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Query string of the category page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Result<PageNumber, PaginationError> {
        parse_page_number(self.page.as_deref())
    }
}

/// A submitted news or article form that cannot be turned into a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error(transparent)]
    Invalid(#[from] NewsError),
}

/// Create and edit form for news and articles.
///
/// Any submitted `news_type` is ignored; the entry point decides the type.
#[derive(Debug, Default, Deserialize)]
pub struct NewsForm {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub author: Option<i64>,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub category: Option<i64>,
}

impl NewsForm {
    /// Builds a draft stamped with `news_type`. The author defaults to the actor and the
    /// publication date to `now`.
    pub fn into_draft(
        self,
        news_type: NewsType,
        actor_id: i64,
        now: DateTime<Utc>,
    ) -> Result<NewsDraft, FormError> {
        let category_id = self.category.ok_or(FormError::Missing("Category"))?;

        Ok(NewsDraft {
            author_id: self.author.unwrap_or(actor_id),
            heading: self.heading.trim().to_string(),
            text: self.text,
            pub_date: self.pub_date.unwrap_or(now),
            category_id,
            news_type,
        })
    }

    /// The changes an edit through the `news_type` entry point may make. Article edits
    /// only touch the author, heading and text.
    pub fn into_changes(self, news_type: NewsType) -> NewsChanges {
        let mut changes = NewsChanges {
            author_id: self.author,
            heading: Some(self.heading.trim().to_string()),
            text: Some(self.text),
            ..NewsChanges::default()
        };
        if news_type == NewsType::News {
            changes.pub_date = self.pub_date;
            changes.category_id = self.category;
        }
        changes
    }
}
