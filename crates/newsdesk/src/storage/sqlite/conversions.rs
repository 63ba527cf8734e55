//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use newsdesk_core::news::{Category, News, NewsType, Permission, User};

// ============================================================================
// Row conversions
// ============================================================================

/// Convert a SQLite row to a User.
///
/// Expected columns: id, username, email, is_superuser, created_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(4)?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        is_superuser: row.get(3)?,
        created_at: parse_datetime(&created_at, 4)?,
    })
}

/// Convert a SQLite row to a Category.
///
/// Expected columns: id, name
pub fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Convert a SQLite row to News.
///
/// Expected columns: id, author_id, heading, text, pub_date, category_id, news_type
pub fn row_to_news(row: &Row) -> rusqlite::Result<News> {
    let pub_date: String = row.get(4)?;
    let news_type: String = row.get(6)?;

    Ok(News {
        id: row.get(0)?,
        author_id: row.get(1)?,
        heading: row.get(2)?,
        text: row.get(3)?,
        pub_date: parse_datetime(&pub_date, 4)?,
        category_id: row.get(5)?,
        news_type: parse_news_type(&news_type, 6)?,
    })
}

/// Parse a permission codename column.
pub fn parse_permission(codename: &str) -> rusqlite::Result<Permission> {
    Permission::from_codename(codename).ok_or_else(|| invalid_text(0, codename, "permission"))
}

// ============================================================================
// Helper functions
// ============================================================================

fn invalid_text(column: usize, value: &str, what: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Unknown {what}: {value}"),
        )),
    )
}

fn parse_news_type(code: &str, column: usize) -> rusqlite::Result<NewsType> {
    NewsType::from_code(code).ok_or_else(|| invalid_text(column, code, "news type"))
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Format a DateTime<Utc> for SQLite storage.
///
/// Fixed-width UTC so text ordering matches chronological ordering.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Format a NaiveDate for SQLite storage (YYYY-MM-DD).
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
