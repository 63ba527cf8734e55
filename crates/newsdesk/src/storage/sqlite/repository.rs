//! SQLite repository implementation.
//!
//! Implements the repository traits from `newsdesk_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, params_from_iter, OptionalExtension};
use tokio_rusqlite::Connection;

use newsdesk_core::news::{
    validate_category_name, validate_draft, validate_update, Category, Group, News, NewsDraft,
    NewsFilter, NewUser, PageWindow, Permission, SubscriptionOutcome, User,
};
use newsdesk_core::storage::{
    CategoryRepository, GroupRepository, NewsRepository, RepositoryError, Result,
    SubscriptionRepository, UserRepository,
};

use super::conversions::{
    format_datetime, parse_permission, row_to_category, row_to_news, row_to_user,
};
use super::error::{domain_err, map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Fails with NotFound unless `sql` (a `SELECT 1 ... WHERE id = ?1`) returns a row.
fn ensure_exists(
    conn: &rusqlite::Connection,
    sql: &str,
    entity_type: &'static str,
    id: i64,
) -> tokio_rusqlite::Result<()> {
    let found = conn
        .query_row(sql, [id], |_| Ok(()))
        .optional()
        .map_err(wrap_err)?;
    found.ok_or_else(|| domain_err(RepositoryError::not_found(entity_type, id)))
}

/// Loads the permissions of a group.
fn load_group(conn: &rusqlite::Connection, id: i64, name: String) -> rusqlite::Result<Group> {
    let mut stmt = conn.prepare(schema::SELECT_GROUP_PERMISSIONS)?;
    let codenames = stmt.query_map([id], |row| row.get::<_, String>(0))?;

    let mut permissions = Vec::new();
    for codename in codenames {
        permissions.push(parse_permission(&codename?)?);
    }
    Ok(Group {
        id,
        name,
        permissions,
    })
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// NewsRepository implementation
// ============================================================================

#[async_trait]
impl NewsRepository for SqliteRepository {
    async fn get_news(&self, id: i64) -> Result<Option<News>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_NEWS_BY_ID, [id], row_to_news)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", id))
    }

    async fn count_news(&self, filter: &NewsFilter) -> Result<u64> {
        let clause = schema::news_filter_clause(filter);

        self.conn
            .call(move |conn| {
                let sql = schema::count_news_query(&clause);
                let count: i64 = conn
                    .query_row(&sql, params_from_iter(clause.params.iter()), |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;
                Ok(u64::try_from(count).unwrap_or(0))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "News"))
    }

    async fn list_news(
        &self,
        filter: &NewsFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<News>> {
        let mut clause = schema::news_filter_clause(filter);
        let sql = schema::list_news_query(&clause, window.is_some());
        if let Some(window) = window {
            clause
                .params
                .push(rusqlite::types::Value::Integer(window.limit() as i64));
            clause
                .params
                .push(rusqlite::types::Value::Integer(window.offset() as i64));
        }

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params_from_iter(clause.params.iter()), row_to_news)
                    .map_err(wrap_err)?;

                let mut news = Vec::new();
                for row_result in rows {
                    news.push(row_result.map_err(wrap_err)?);
                }
                Ok(news)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "News"))
    }

    async fn create_news(&self, draft: &NewsDraft) -> Result<News> {
        validate_draft(draft)?;

        let author_id = draft.author_id;
        let heading = draft.heading.clone();
        let text = draft.text.clone();
        let pub_date = format_datetime(&draft.pub_date);
        let category_id = draft.category_id;
        let news_type = draft.news_type.code();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_NEWS,
                    params![author_id, heading, text, pub_date, category_id, news_type],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "News"))?;

        Ok(draft.clone().into_news(id))
    }

    async fn update_news(&self, news: &News) -> Result<()> {
        let existing = self
            .get_news(news.id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("News", news.id))?;
        validate_update(&existing, news)?;

        let id = news.id;
        let author_id = news.author_id;
        let heading = news.heading.clone();
        let text = news.text.clone();
        let pub_date = format_datetime(&news.pub_date);
        let category_id = news.category_id;

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_NEWS,
                        params![id, author_id, heading, text, pub_date, category_id],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", id))
    }

    async fn delete_news(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_NEWS, [id]).map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", id))
    }
}

// ============================================================================
// CategoryRepository implementation
// ============================================================================

#[async_trait]
impl CategoryRepository for SqliteRepository {
    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_CATEGORY_BY_ID, [id], row_to_category)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Category", id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_CATEGORIES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_category).map_err(wrap_err)?;

                let mut categories = Vec::new();
                for row_result in rows {
                    categories.push(row_result.map_err(wrap_err)?);
                }
                Ok(categories)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Category"))
    }

    async fn create_category(&self, name: &str) -> Result<Category> {
        validate_category_name(name)?;
        let name = name.to_string();
        let category_name = name.clone();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(schema::INSERT_CATEGORY, [&name])
                    .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Category", &category_name))?;

        Ok(Category {
            id,
            name: category_name,
        })
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_USER_BY_ID, [id], row_to_user)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_USER_BY_USERNAME, [&username], row_to_user)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let created = User {
            id: 0,
            username: user.username.clone(),
            email: user.email.clone(),
            is_superuser: user.is_superuser,
            created_at: Utc::now(),
        };
        let username = created.username.clone();
        let email = created.email.clone();
        let is_superuser = created.is_superuser;
        let created_at = format_datetime(&created.created_at);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    params![username, email, is_superuser, created_at],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", &user.username))?;

        Ok(User { id, ..created })
    }
}

// ============================================================================
// GroupRepository implementation
// ============================================================================

#[async_trait]
impl GroupRepository for SqliteRepository {
    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                let row = conn
                    .query_row(schema::SELECT_GROUP_BY_NAME, [&name], |row| {
                        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
                    })
                    .optional()
                    .map_err(wrap_err)?;

                match row {
                    Some((id, name)) => Ok(Some(load_group(conn, id, name).map_err(wrap_err)?)),
                    None => Ok(None),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Group"))
    }

    async fn create_group(&self, name: &str, permissions: &[Permission]) -> Result<Group> {
        let name = name.to_string();
        let group_name = name.clone();
        let codenames: Vec<&'static str> = permissions.iter().map(|p| p.codename()).collect();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(schema::INSERT_GROUP, [&name]).map_err(wrap_err)?;
                let id = tx.last_insert_rowid();
                for codename in &codenames {
                    tx.execute(schema::INSERT_GROUP_PERMISSION, params![id, codename])
                        .map_err(wrap_err)?;
                }
                let group = load_group(&tx, id, name).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(group)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", &group_name))
    }

    async fn add_user_to_group(&self, user_id: i64, group_id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                ensure_exists(conn, schema::USER_EXISTS, "User", user_id)?;
                ensure_exists(conn, schema::GROUP_EXISTS, "Group", group_id)?;
                let rows = conn
                    .execute(schema::INSERT_USER_GROUP, [user_id, group_id])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Group"))
    }

    async fn get_groups_for_user(&self, user_id: i64) -> Result<Vec<Group>> {
        self.conn
            .call(move |conn| {
                let rows: Vec<(i64, String)> = {
                    let mut stmt = conn
                        .prepare(schema::SELECT_GROUPS_FOR_USER)
                        .map_err(wrap_err)?;
                    let mapped = stmt
                        .query_map([user_id], |row| Ok((row.get(0)?, row.get(1)?)))
                        .map_err(wrap_err)?;
                    mapped
                        .collect::<rusqlite::Result<_>>()
                        .map_err(wrap_err)?
                };

                let mut groups = Vec::with_capacity(rows.len());
                for (id, name) in rows {
                    groups.push(load_group(conn, id, name).map_err(wrap_err)?);
                }
                Ok(groups)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Group"))
    }
}

// ============================================================================
// SubscriptionRepository implementation
// ============================================================================

#[async_trait]
impl SubscriptionRepository for SqliteRepository {
    async fn subscribe(&self, category_id: i64, user_id: i64) -> Result<SubscriptionOutcome> {
        let created_at = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                ensure_exists(conn, schema::CATEGORY_EXISTS, "Category", category_id)?;
                ensure_exists(conn, schema::USER_EXISTS, "User", user_id)?;
                let rows = conn
                    .execute(
                        schema::INSERT_SUBSCRIPTION,
                        params![category_id, user_id, created_at],
                    )
                    .map_err(wrap_err)?;
                Ok(if rows > 0 {
                    SubscriptionOutcome::Subscribed
                } else {
                    SubscriptionOutcome::AlreadySubscribed
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Subscription"))
    }

    async fn unsubscribe(&self, category_id: i64, user_id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                ensure_exists(conn, schema::CATEGORY_EXISTS, "Category", category_id)?;
                let rows = conn
                    .execute(schema::DELETE_SUBSCRIPTION, [category_id, user_id])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Subscription"))
    }

    async fn is_subscribed(&self, category_id: i64, user_id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                let found = conn
                    .query_row(schema::SUBSCRIPTION_EXISTS, [category_id, user_id], |_| Ok(()))
                    .optional()
                    .map_err(wrap_err)?;
                Ok(found.is_some())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Subscription"))
    }

    async fn list_subscribers(&self, category_id: i64) -> Result<Vec<User>> {
        self.conn
            .call(move |conn| {
                ensure_exists(conn, schema::CATEGORY_EXISTS, "Category", category_id)?;
                let mut stmt = conn.prepare(schema::SELECT_SUBSCRIBERS).map_err(wrap_err)?;
                let rows = stmt.query_map([category_id], row_to_user).map_err(wrap_err)?;

                let mut users = Vec::new();
                for row_result in rows {
                    users.push(row_result.map_err(wrap_err)?);
                }
                Ok(users)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Subscription"))
    }
}
