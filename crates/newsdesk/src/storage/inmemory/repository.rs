//! In-memory repository implementation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use newsdesk_core::news::{
    filter_news, sort_news_newest_first, validate_category_name, validate_draft, validate_update,
    Category, Group, News, NewsDraft, NewsFilter, NewUser, PageWindow, Permission,
    SubscriptionOutcome, User,
};
use newsdesk_core::storage::{
    CategoryRepository, GroupRepository, NewsRepository, RepositoryError, Result,
    SubscriptionRepository, UserRepository,
};

/// Id generator mirroring an autoincrement column: starts at 1, never reuses.
#[derive(Debug)]
struct Sequence(AtomicI64);

impl Default for Sequence {
    fn default() -> Self {
        Self(AtomicI64::new(1))
    }
}

impl Sequence {
    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
/// Clones share the same underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    news: Arc<RwLock<HashMap<i64, News>>>,
    categories: Arc<RwLock<HashMap<i64, Category>>>,
    users: Arc<RwLock<HashMap<i64, User>>>,
    groups: Arc<RwLock<HashMap<i64, Group>>>,
    /// (user_id, group_id)
    user_groups: Arc<RwLock<HashSet<(i64, i64)>>>,
    /// (category_id, user_id)
    subscriptions: Arc<RwLock<HashSet<(i64, i64)>>>,
    news_ids: Arc<Sequence>,
    category_ids: Arc<Sequence>,
    user_ids: Arc<Sequence>,
    group_ids: Arc<Sequence>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    async fn ensure_references(&self, author_id: i64, category_id: i64) -> Result<()> {
        if !self.users.read().await.contains_key(&author_id) {
            return Err(RepositoryError::InvalidData(format!(
                "author {author_id} does not exist"
            )));
        }
        if !self.categories.read().await.contains_key(&category_id) {
            return Err(RepositoryError::InvalidData(format!(
                "category {category_id} does not exist"
            )));
        }
        Ok(())
    }

    async fn ensure_category(&self, category_id: i64) -> Result<()> {
        if self.categories.read().await.contains_key(&category_id) {
            Ok(())
        } else {
            Err(RepositoryError::not_found("Category", category_id))
        }
    }

    async fn ensure_user(&self, user_id: i64) -> Result<()> {
        if self.users.read().await.contains_key(&user_id) {
            Ok(())
        } else {
            Err(RepositoryError::not_found("User", user_id))
        }
    }
}

// ============================================================================
// NewsRepository implementation
// ============================================================================

#[async_trait]
impl NewsRepository for InMemoryRepository {
    async fn get_news(&self, id: i64) -> Result<Option<News>> {
        let news = self.news.read().await;
        Ok(news.get(&id).cloned())
    }

    async fn count_news(&self, filter: &NewsFilter) -> Result<u64> {
        let news = self.news.read().await;
        Ok(news.values().filter(|n| filter.matches(n)).count() as u64)
    }

    async fn list_news(
        &self,
        filter: &NewsFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<News>> {
        let mut matching = {
            let news = self.news.read().await;
            filter_news(news.values(), filter)
        };
        sort_news_newest_first(&mut matching);

        Ok(match window {
            Some(window) => matching
                .into_iter()
                .skip(window.offset() as usize)
                .take(window.limit() as usize)
                .collect(),
            None => matching,
        })
    }

    async fn create_news(&self, draft: &NewsDraft) -> Result<News> {
        validate_draft(draft)?;
        self.ensure_references(draft.author_id, draft.category_id)
            .await?;

        let created = draft.clone().into_news(self.news_ids.next());
        self.news.write().await.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_news(&self, news: &News) -> Result<()> {
        let existing = self
            .get_news(news.id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("News", news.id))?;
        validate_update(&existing, news)?;
        self.ensure_references(news.author_id, news.category_id)
            .await?;

        let mut stored = self.news.write().await;
        match stored.get_mut(&news.id) {
            Some(slot) => {
                *slot = news.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found("News", news.id)),
        }
    }

    async fn delete_news(&self, id: i64) -> Result<()> {
        let mut news = self.news.write().await;
        if news.remove(&id).is_none() {
            return Err(RepositoryError::not_found("News", id));
        }
        Ok(())
    }
}

// ============================================================================
// CategoryRepository implementation
// ============================================================================

#[async_trait]
impl CategoryRepository for InMemoryRepository {
    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut list: Vec<Category> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn create_category(&self, name: &str) -> Result<Category> {
        validate_category_name(name)?;

        let mut categories = self.categories.write().await;
        if categories.values().any(|c| c.name == name) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Category",
                id: name.to_string(),
            });
        }

        let category = Category {
            id: self.category_ids.next(),
            name: name.to_string(),
        };
        categories.insert(category.id, category.clone());
        Ok(category)
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.username.clone(),
            });
        }

        let created = User {
            id: self.user_ids.next(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_superuser: user.is_superuser,
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }
}

// ============================================================================
// GroupRepository implementation
// ============================================================================

#[async_trait]
impl GroupRepository for InMemoryRepository {
    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>> {
        let groups = self.groups.read().await;
        Ok(groups.values().find(|g| g.name == name).cloned())
    }

    async fn create_group(&self, name: &str, permissions: &[Permission]) -> Result<Group> {
        let mut groups = self.groups.write().await;
        if groups.values().any(|g| g.name == name) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Group",
                id: name.to_string(),
            });
        }

        let mut permissions = permissions.to_vec();
        permissions.dedup();
        let group = Group {
            id: self.group_ids.next(),
            name: name.to_string(),
            permissions,
        };
        groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn add_user_to_group(&self, user_id: i64, group_id: i64) -> Result<bool> {
        self.ensure_user(user_id).await?;
        if !self.groups.read().await.contains_key(&group_id) {
            return Err(RepositoryError::not_found("Group", group_id));
        }

        let mut memberships = self.user_groups.write().await;
        Ok(memberships.insert((user_id, group_id)))
    }

    async fn get_groups_for_user(&self, user_id: i64) -> Result<Vec<Group>> {
        let memberships = self.user_groups.read().await;
        let groups = self.groups.read().await;

        let mut list: Vec<Group> = memberships
            .iter()
            .filter(|(member, _)| *member == user_id)
            .filter_map(|(_, group_id)| groups.get(group_id).cloned())
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }
}

// ============================================================================
// SubscriptionRepository implementation
// ============================================================================

#[async_trait]
impl SubscriptionRepository for InMemoryRepository {
    async fn subscribe(&self, category_id: i64, user_id: i64) -> Result<SubscriptionOutcome> {
        self.ensure_category(category_id).await?;
        self.ensure_user(user_id).await?;

        let mut subscriptions = self.subscriptions.write().await;
        if subscriptions.insert((category_id, user_id)) {
            Ok(SubscriptionOutcome::Subscribed)
        } else {
            Ok(SubscriptionOutcome::AlreadySubscribed)
        }
    }

    async fn unsubscribe(&self, category_id: i64, user_id: i64) -> Result<bool> {
        self.ensure_category(category_id).await?;

        let mut subscriptions = self.subscriptions.write().await;
        Ok(subscriptions.remove(&(category_id, user_id)))
    }

    async fn is_subscribed(&self, category_id: i64, user_id: i64) -> Result<bool> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions.contains(&(category_id, user_id)))
    }

    async fn list_subscribers(&self, category_id: i64) -> Result<Vec<User>> {
        self.ensure_category(category_id).await?;

        let subscriptions = self.subscriptions.read().await;
        let users = self.users.read().await;

        let mut subscribers: Vec<User> = subscriptions
            .iter()
            .filter(|(category, _)| *category == category_id)
            .filter_map(|(_, user_id)| users.get(user_id).cloned())
            .collect();
        subscribers.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use newsdesk_core::news::{resolve_page, NewsType, PageNumber};

    struct Fixture {
        repo: InMemoryRepository,
        author: User,
        sports: Category,
    }

    async fn fixture() -> Fixture {
        let repo = InMemoryRepository::new();
        let author = repo.create_user(&NewUser::new("author")).await.unwrap();
        let sports = repo.create_category("Sports").await.unwrap();
        Fixture {
            repo,
            author,
            sports,
        }
    }

    fn draft(author_id: i64, category_id: i64, heading: &str, days_ago: i64) -> NewsDraft {
        NewsDraft {
            author_id,
            heading: heading.to_string(),
            text: format!("{heading} body"),
            pub_date: Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
                - Duration::days(days_ago),
            category_id,
            news_type: NewsType::News,
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let f = fixture().await;

        let first = f
            .repo
            .create_news(&draft(f.author.id, f.sports.id, "First", 2))
            .await
            .unwrap();
        let second = f
            .repo
            .create_news(&draft(f.author.id, f.sports.id, "Second", 1))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(f.sports.id, 1);
    }

    #[tokio::test]
    async fn test_create_news_rejects_unknown_category() {
        let f = fixture().await;

        let result = f.repo.create_news(&draft(f.author.id, 99, "Lost", 0)).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_create_news_rejects_blank_heading() {
        let f = fixture().await;

        let result = f
            .repo
            .create_news(&draft(f.author.id, f.sports.id, "   ", 0))
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_list_news_is_newest_first_and_windowed() {
        let f = fixture().await;
        for (heading, days_ago) in [("a", 4), ("b", 0), ("c", 2), ("d", 3), ("e", 1)] {
            f.repo
                .create_news(&draft(f.author.id, f.sports.id, heading, days_ago))
                .await
                .unwrap();
        }

        let filter = NewsFilter::default();
        let total = f.repo.count_news(&filter).await.unwrap();
        let window = resolve_page(PageNumber::Number(2), total, 3).unwrap();
        let page = f.repo.list_news(&filter, Some(window)).await.unwrap();

        let headings: Vec<&str> = page.iter().map(|n| n.heading.as_str()).collect();
        assert_eq!(total, 5);
        assert_eq!(headings, vec!["d", "a"]);
    }

    #[tokio::test]
    async fn test_list_news_applies_filter() {
        let f = fixture().await;
        let politics = f.repo.create_category("Politics").await.unwrap();
        f.repo
            .create_news(&draft(f.author.id, f.sports.id, "Cup final", 0))
            .await
            .unwrap();
        f.repo
            .create_news(&draft(f.author.id, politics.id, "Election", 0))
            .await
            .unwrap();

        let filter = NewsFilter::default().with_category(politics.id);
        let listed = f.repo.list_news(&filter, None).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].heading, "Election");
        assert_eq!(f.repo.count_news(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_news_keeps_type() {
        let f = fixture().await;
        let news = f
            .repo
            .create_news(&draft(f.author.id, f.sports.id, "Original", 0))
            .await
            .unwrap();

        let mut renamed = news.clone();
        renamed.heading = "Renamed".to_string();
        f.repo.update_news(&renamed).await.unwrap();
        assert_eq!(
            f.repo.get_news(news.id).await.unwrap().unwrap().heading,
            "Renamed"
        );

        let mut retyped = renamed.clone();
        retyped.news_type = NewsType::Article;
        let result = f.repo.update_news(&retyped).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_update_missing_news_is_not_found() {
        let f = fixture().await;
        let ghost = draft(f.author.id, f.sports.id, "Ghost", 0).into_news(42);

        let result = f.repo.update_news(&ghost).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_news() {
        let f = fixture().await;
        let news = f
            .repo
            .create_news(&draft(f.author.id, f.sports.id, "Doomed", 0))
            .await
            .unwrap();

        f.repo.delete_news(news.id).await.unwrap();

        assert!(f.repo.get_news(news.id).await.unwrap().is_none());
        assert!(matches!(
            f.repo.delete_news(news.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_category_name() {
        let f = fixture().await;

        let result = f.repo.create_category("Sports").await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_list_categories_sorted_by_name() {
        let f = fixture().await;
        f.repo.create_category("Culture").await.unwrap();

        let names: Vec<String> = f
            .repo
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Culture", "Sports"]);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let f = fixture().await;

        let result = f.repo.create_user(&NewUser::new("author")).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_group_membership_is_idempotent() {
        let f = fixture().await;
        let authors = f
            .repo
            .create_group("authors", &[Permission::AddNews, Permission::ChangeNews])
            .await
            .unwrap();

        assert!(f.repo.add_user_to_group(f.author.id, authors.id).await.unwrap());
        assert!(!f.repo.add_user_to_group(f.author.id, authors.id).await.unwrap());

        let groups = f.repo.get_groups_for_user(f.author.id).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].permissions, vec![Permission::AddNews, Permission::ChangeNews]);
    }

    #[tokio::test]
    async fn test_add_to_unknown_group() {
        let f = fixture().await;

        let result = f.repo.add_user_to_group(f.author.id, 7).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_subscribe_is_idempotent() {
        let f = fixture().await;

        let first = f.repo.subscribe(f.sports.id, f.author.id).await.unwrap();
        let second = f.repo.subscribe(f.sports.id, f.author.id).await.unwrap();

        assert_eq!(first, SubscriptionOutcome::Subscribed);
        assert_eq!(second, SubscriptionOutcome::AlreadySubscribed);
        assert_eq!(f.repo.list_subscribers(f.sports.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_unknown_category() {
        let f = fixture().await;

        let result = f.repo.subscribe(5, f.author.id).await;

        assert!(matches!(
            result,
            Err(RepositoryError::NotFound {
                entity_type: "Category",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_two_subscribers_listed_by_username() {
        let f = fixture().await;
        let a = f.repo.create_user(&NewUser::new("zoe")).await.unwrap();
        let b = f.repo.create_user(&NewUser::new("adam")).await.unwrap();

        f.repo.subscribe(f.sports.id, a.id).await.unwrap();
        assert!(f.repo.is_subscribed(f.sports.id, a.id).await.unwrap());
        assert!(!f.repo.is_subscribed(f.sports.id, b.id).await.unwrap());

        f.repo.subscribe(f.sports.id, b.id).await.unwrap();
        let names: Vec<String> = f
            .repo
            .list_subscribers(f.sports.id)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["adam", "zoe"]);
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let f = fixture().await;
        f.repo.subscribe(f.sports.id, f.author.id).await.unwrap();

        assert!(f.repo.unsubscribe(f.sports.id, f.author.id).await.unwrap());
        assert!(!f.repo.unsubscribe(f.sports.id, f.author.id).await.unwrap());
        assert!(!f.repo.is_subscribed(f.sports.id, f.author.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_clone_shares_tables() {
        let f = fixture().await;
        let clone = f.repo.clone();

        let created = clone.create_category("Weather").await.unwrap();

        assert!(f.repo.get_category(created.id).await.unwrap().is_some());
    }
}
