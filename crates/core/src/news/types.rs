use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminates the two flavours of published content.
///
/// The type is fixed by the entry point that created the record and never changes
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsType {
    #[serde(rename = "NW")]
    News,
    #[serde(rename = "AR")]
    Article,
}

impl NewsType {
    /// Returns the two-letter storage code.
    pub fn code(&self) -> &'static str {
        match self {
            NewsType::News => "NW",
            NewsType::Article => "AR",
        }
    }

    /// Parses a storage code back into a type.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NW" => Some(NewsType::News),
            "AR" => Some(NewsType::Article),
            _ => None,
        }
    }

    /// Human readable label used by the templates.
    pub fn label(&self) -> &'static str {
        match self {
            NewsType::News => "News",
            NewsType::Article => "Article",
        }
    }

    /// URL segment of the entry point that owns this type (`news` or `article`).
    pub fn route_segment(&self) -> &'static str {
        match self {
            NewsType::News => "news",
            NewsType::Article => "article",
        }
    }
}

impl std::fmt::Display for NewsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A published news item or article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: i64,
    pub author_id: i64,
    pub heading: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub category_id: i64,
    pub news_type: NewsType,
}

impl News {
    /// Returns the first `max_chars` characters of the body, marking truncation with an ellipsis.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Everything needed to persist a new news record; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDraft {
    pub author_id: i64,
    pub heading: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub category_id: i64,
    pub news_type: NewsType,
}

impl NewsDraft {
    /// Attaches a storage-assigned id.
    pub fn into_news(self, id: i64) -> News {
        News {
            id,
            author_id: self.author_id,
            heading: self.heading,
            text: self.text,
            pub_date: self.pub_date,
            category_id: self.category_id,
            news_type: self.news_type,
        }
    }
}

/// A topic that groups news and carries a subscriber set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    /// Superusers hold every permission regardless of group membership.
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub is_superuser: bool,
}

impl NewUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            is_superuser: false,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }
}

/// A capability attached to groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    AddNews,
    ChangeNews,
    DeleteNews,
}

impl Permission {
    /// Returns the permission codename as stored in the datastore.
    pub fn codename(&self) -> &'static str {
        match self {
            Permission::AddNews => "add_news",
            Permission::ChangeNews => "change_news",
            Permission::DeleteNews => "delete_news",
        }
    }

    pub fn from_codename(codename: &str) -> Option<Self> {
        match codename {
            "add_news" => Some(Permission::AddNews),
            "change_news" => Some(Permission::ChangeNews),
            "delete_news" => Some(Permission::DeleteNews),
            _ => None,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.codename())
    }
}

/// A named set of permissions users can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub permissions: Vec<Permission>,
}

/// Result of an idempotent subscribe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    Subscribed,
    AlreadySubscribed,
}

impl SubscriptionOutcome {
    /// True when the call changed the subscriber set.
    pub fn is_new(&self) -> bool {
        matches!(self, SubscriptionOutcome::Subscribed)
    }
}
