//! SQLite schema definitions and SQL query constants.
//!
//! Pure data plus the filter clause builder. No I/O.

use rusqlite::types::Value;

use newsdesk_core::news::NewsFilter;

use super::conversions::format_date;

/// SQL statement to create all tables.
///
/// The `sessions` table is owned by the session store and created there.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT,
    is_superuser INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Permission groups
CREATE TABLE IF NOT EXISTS groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS group_permissions (
    group_id INTEGER NOT NULL,
    codename TEXT NOT NULL,
    PRIMARY KEY (group_id, codename),
    FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS user_groups (
    user_id INTEGER NOT NULL,
    group_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, group_id),
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE
);

-- Categories and their subscribers
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS category_subscribers (
    category_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (category_id, user_id),
    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- News and articles
CREATE TABLE IF NOT EXISTS news (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id INTEGER NOT NULL,
    heading TEXT NOT NULL,
    text TEXT NOT NULL,
    pub_date TEXT NOT NULL,
    category_id INTEGER NOT NULL,
    news_type TEXT NOT NULL CHECK (news_type IN ('NW', 'AR')),
    FOREIGN KEY (author_id) REFERENCES users(id),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_news_pub_date ON news(pub_date DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_news_category_id ON news(category_id);
CREATE INDEX IF NOT EXISTS idx_news_author_id ON news(author_id);
CREATE INDEX IF NOT EXISTS idx_category_subscribers_user_id ON category_subscribers(user_id);
CREATE INDEX IF NOT EXISTS idx_user_groups_group_id ON user_groups(group_id);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (username, email, is_superuser, created_at)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, username, email, is_superuser, created_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_USERNAME: &str = r#"
SELECT id, username, email, is_superuser, created_at
FROM users
WHERE username = ?1
"#;

pub const USER_EXISTS: &str = "SELECT 1 FROM users WHERE id = ?1";

// Group queries
pub const INSERT_GROUP: &str = "INSERT INTO groups (name) VALUES (?1)";

pub const INSERT_GROUP_PERMISSION: &str = r#"
INSERT OR IGNORE INTO group_permissions (group_id, codename)
VALUES (?1, ?2)
"#;

pub const SELECT_GROUP_BY_NAME: &str = "SELECT id, name FROM groups WHERE name = ?1";

pub const GROUP_EXISTS: &str = "SELECT 1 FROM groups WHERE id = ?1";

pub const SELECT_GROUP_PERMISSIONS: &str = r#"
SELECT codename
FROM group_permissions
WHERE group_id = ?1
ORDER BY codename ASC
"#;

pub const SELECT_GROUPS_FOR_USER: &str = r#"
SELECT g.id, g.name
FROM groups g
INNER JOIN user_groups ug ON g.id = ug.group_id
WHERE ug.user_id = ?1
ORDER BY g.name ASC
"#;

pub const INSERT_USER_GROUP: &str = r#"
INSERT OR IGNORE INTO user_groups (user_id, group_id)
VALUES (?1, ?2)
"#;

// Category queries
pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES (?1)";

pub const SELECT_CATEGORY_BY_ID: &str = "SELECT id, name FROM categories WHERE id = ?1";

pub const SELECT_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY name ASC, id ASC";

pub const CATEGORY_EXISTS: &str = "SELECT 1 FROM categories WHERE id = ?1";

// Subscription queries
pub const INSERT_SUBSCRIPTION: &str = r#"
INSERT OR IGNORE INTO category_subscribers (category_id, user_id, created_at)
VALUES (?1, ?2, ?3)
"#;

pub const DELETE_SUBSCRIPTION: &str = r#"
DELETE FROM category_subscribers
WHERE category_id = ?1 AND user_id = ?2
"#;

pub const SUBSCRIPTION_EXISTS: &str = r#"
SELECT 1 FROM category_subscribers
WHERE category_id = ?1 AND user_id = ?2
"#;

pub const SELECT_SUBSCRIBERS: &str = r#"
SELECT u.id, u.username, u.email, u.is_superuser, u.created_at
FROM users u
INNER JOIN category_subscribers cs ON u.id = cs.user_id
WHERE cs.category_id = ?1
ORDER BY u.username ASC
"#;

// News queries
pub const NEWS_COLUMNS: &str = "id, author_id, heading, text, pub_date, category_id, news_type";

pub const INSERT_NEWS: &str = r#"
INSERT INTO news (author_id, heading, text, pub_date, category_id, news_type)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_NEWS_BY_ID: &str = r#"
SELECT id, author_id, heading, text, pub_date, category_id, news_type
FROM news
WHERE id = ?1
"#;

pub const UPDATE_NEWS: &str = r#"
UPDATE news
SET author_id = ?2, heading = ?3, text = ?4, pub_date = ?5, category_id = ?6
WHERE id = ?1
"#;

pub const DELETE_NEWS: &str = "DELETE FROM news WHERE id = ?1";

/// A WHERE clause with positional parameters, built from a `NewsFilter`.
#[derive(Debug, Default)]
pub struct FilterClause {
    /// Empty, or ` WHERE ...` with a leading space.
    pub sql: String,
    pub params: Vec<Value>,
}

/// Translates a filter into bound SQL conditions. Values are never interpolated.
pub fn news_filter_clause(filter: &NewsFilter) -> FilterClause {
    let mut conditions: Vec<&'static str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(author_id) = filter.author_id {
        conditions.push("author_id = ?");
        params.push(Value::Integer(author_id));
    }
    if let Some(category_id) = filter.category_id {
        conditions.push("category_id = ?");
        params.push(Value::Integer(category_id));
    }
    if let Some(news_type) = filter.news_type {
        conditions.push("news_type = ?");
        params.push(Value::Text(news_type.code().to_string()));
    }
    if let Some(heading) = &filter.heading {
        conditions.push("instr(lower(heading), lower(?)) > 0");
        params.push(Value::Text(heading.clone()));
    }
    // pub_date is stored as fixed-width UTC text, so its first ten characters are the date.
    if let Some(from) = filter.date_from {
        conditions.push("substr(pub_date, 1, 10) >= ?");
        params.push(Value::Text(format_date(&from)));
    }
    if let Some(to) = filter.date_to {
        conditions.push("substr(pub_date, 1, 10) <= ?");
        params.push(Value::Text(format_date(&to)));
    }

    let sql = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    FilterClause { sql, params }
}

/// `SELECT COUNT(*)` over the filtered news set.
pub fn count_news_query(clause: &FilterClause) -> String {
    format!("SELECT COUNT(*) FROM news{}", clause.sql)
}

/// Newest-first listing over the filtered news set, optionally limited.
pub fn list_news_query(clause: &FilterClause, paginated: bool) -> String {
    let mut sql = format!(
        "SELECT {NEWS_COLUMNS} FROM news{} ORDER BY pub_date DESC, id DESC",
        clause.sql
    );
    if paginated {
        sql.push_str(" LIMIT ? OFFSET ?");
    }
    sql
}
