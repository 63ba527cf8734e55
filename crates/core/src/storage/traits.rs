use async_trait::async_trait;

use crate::news::{
    Category, Group, News, NewsDraft, NewsFilter, NewUser, PageWindow, Permission,
    SubscriptionOutcome, User,
};

use super::Result;

/// Repository for news operations.
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Gets a news record by its ID.
    async fn get_news(&self, id: i64) -> Result<Option<News>>;

    /// Counts the news matching a filter.
    async fn count_news(&self, filter: &NewsFilter) -> Result<u64>;

    /// Lists the news matching a filter, newest first.
    ///
    /// When a window is given only that page is returned.
    async fn list_news(&self, filter: &NewsFilter, window: Option<PageWindow>)
        -> Result<Vec<News>>;

    /// Persists a new record and returns it with its assigned ID.
    async fn create_news(&self, draft: &NewsDraft) -> Result<News>;

    /// Updates an existing record.
    async fn update_news(&self, news: &News) -> Result<()>;

    /// Deletes a record by its ID.
    async fn delete_news(&self, id: i64) -> Result<()>;
}

/// Repository for category operations.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Gets a category by its ID.
    async fn get_category(&self, id: i64) -> Result<Option<Category>>;

    /// Lists every category ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Creates a category with a unique name.
    async fn create_category(&self, name: &str) -> Result<Category>;
}

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: i64) -> Result<Option<User>>;

    /// Gets a user by their unique username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Registers a new user.
    async fn create_user(&self, user: &NewUser) -> Result<User>;
}

/// Repository for groups and group membership.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Gets a group by its unique name.
    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>>;

    /// Creates a group with the given permissions.
    async fn create_group(&self, name: &str, permissions: &[Permission]) -> Result<Group>;

    /// Adds a user to a group. Returns `false` if the user was already a member.
    async fn add_user_to_group(&self, user_id: i64, group_id: i64) -> Result<bool>;

    /// Gets every group the user belongs to.
    async fn get_groups_for_user(&self, user_id: i64) -> Result<Vec<Group>>;
}

/// Repository for the category subscriber relation.
///
/// Every operation is idempotent: the relation holds at most one record per
/// (category, user) pair.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Adds the user to the category's subscribers.
    async fn subscribe(&self, category_id: i64, user_id: i64) -> Result<SubscriptionOutcome>;

    /// Removes the user from the category's subscribers. Returns `false` if they
    /// were not subscribed.
    async fn unsubscribe(&self, category_id: i64, user_id: i64) -> Result<bool>;

    /// Checks whether the user subscribes to the category.
    async fn is_subscribed(&self, category_id: i64, user_id: i64) -> Result<bool>;

    /// Lists the subscribers of a category ordered by username.
    async fn list_subscribers(&self, category_id: i64) -> Result<Vec<User>>;
}
