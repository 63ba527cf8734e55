use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{News, NewsType};

/// Criteria for narrowing a news listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsFilter {
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
    /// Case-insensitive substring of the heading.
    pub heading: Option<String>,
    pub news_type: Option<NewsType>,
    /// Inclusive lower bound on the publication date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the publication date.
    pub date_to: Option<NaiveDate>,
}

impl NewsFilter {
    /// Restricts the filter to a single category.
    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn with_type(mut self, news_type: NewsType) -> Self {
        self.news_type = Some(news_type);
        self
    }

    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Returns true when no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.author_id.is_none()
            && self.category_id.is_none()
            && self.heading.is_none()
            && self.news_type.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Returns true if `news` satisfies every set criterion.
    pub fn matches(&self, news: &News) -> bool {
        let date = news.pub_date.date_naive();
        self.author_id.is_none_or(|id| news.author_id == id)
            && self.category_id.is_none_or(|id| news.category_id == id)
            && self.news_type.is_none_or(|t| news.news_type == t)
            && self.date_from.is_none_or(|from| date >= from)
            && self.date_to.is_none_or(|to| date <= to)
            && self.heading.as_deref().is_none_or(|needle| {
                news.heading
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            })
    }
}

/// Orders news newest first. Items published at the same instant fall back to
/// descending id so the order is total.
pub fn compare_newest_first(a: &News, b: &News) -> Ordering {
    b.pub_date.cmp(&a.pub_date).then_with(|| b.id.cmp(&a.id))
}

/// Sorts news in place, newest first.
pub fn sort_news_newest_first(news: &mut [News]) {
    news.sort_by(compare_newest_first);
}

/// Returns the news matching `filter`, newest first.
pub fn filter_news<'a>(news: impl IntoIterator<Item = &'a News>, filter: &NewsFilter) -> Vec<News> {
    let mut matched: Vec<News> = news
        .into_iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect();
    sort_news_newest_first(&mut matched);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn news(id: i64, day: u32, category_id: i64, heading: &str, news_type: NewsType) -> News {
        News {
            id,
            author_id: id % 2 + 1,
            heading: heading.to_string(),
            text: "body".to_string(),
            pub_date: Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap(),
            category_id,
            news_type,
        }
    }

    fn sample() -> Vec<News> {
        vec![
            news(1, 1, 1, "Derby tonight", NewsType::News),
            news(2, 3, 2, "Market update", NewsType::Article),
            news(3, 2, 1, "Transfer window", NewsType::Article),
            news(4, 4, 1, "Derby result", NewsType::News),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all_newest_first() {
        let items = sample();
        let result = filter_news(&items, &NewsFilter::default());
        let ids: Vec<i64> = result.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_filter_by_category() {
        let items = sample();
        let result = filter_news(&items, &NewsFilter::default().with_category(1));
        let ids: Vec<i64> = result.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 3, 1]);
    }

    #[test]
    fn test_filter_heading_is_case_insensitive() {
        let items = sample();
        let result = filter_news(&items, &NewsFilter::default().with_heading("DERBY"));
        let ids: Vec<i64> = result.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 1]);
    }

    #[test]
    fn test_filter_by_type_and_author() {
        let items = sample();
        let filter = NewsFilter::default()
            .with_type(NewsType::Article)
            .with_author(1);
        let result = filter_news(&items, &filter);
        let ids: Vec<i64> = result.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_filter_date_bounds_are_inclusive() {
        let items = sample();
        let filter = NewsFilter::default().with_dates(
            NaiveDate::from_ymd_opt(2024, 5, 2),
            NaiveDate::from_ymd_opt(2024, 5, 3),
        );
        let result = filter_news(&items, &filter);
        let ids: Vec<i64> = result.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_same_instant_breaks_ties_by_id() {
        let mut items = vec![
            news(1, 1, 1, "a", NewsType::News),
            news(5, 1, 1, "b", NewsType::News),
            news(3, 1, 1, "c", NewsType::News),
        ];
        sort_news_newest_first(&mut items);
        let ids: Vec<i64> = items.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![5, 3, 1]);
    }

    #[test]
    fn test_is_empty() {
        assert!(NewsFilter::default().is_empty());
        assert!(!NewsFilter::default().with_category(1).is_empty());
    }
}
