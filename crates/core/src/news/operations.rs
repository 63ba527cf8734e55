use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{CategoryError, NewsError};
use super::types::{Group, News, NewsDraft, Permission, User};

/// Maximum heading length, in characters.
pub const MAX_HEADING_LEN: usize = 255;

/// Maximum category name length, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 64;

/// Name of the group that self-service elevation grants.
pub const AUTHORS_GROUP: &str = "authors";

/// Validates the user-editable fields of a news record.
fn validate_fields(heading: &str, text: &str) -> Result<(), NewsError> {
    if heading.trim().is_empty() {
        return Err(NewsError::EmptyHeading);
    }
    if heading.chars().count() > MAX_HEADING_LEN {
        return Err(NewsError::HeadingTooLong);
    }
    if text.trim().is_empty() {
        return Err(NewsError::EmptyText);
    }
    Ok(())
}

/// Validates a draft before creation.
pub fn validate_draft(draft: &NewsDraft) -> Result<(), NewsError> {
    validate_fields(&draft.heading, &draft.text)
}

/// Validates a record before update. The type of an existing record is immutable.
pub fn validate_update(existing: &News, updated: &News) -> Result<(), NewsError> {
    if existing.news_type != updated.news_type {
        return Err(NewsError::TypeChanged {
            from: existing.news_type,
            to: updated.news_type,
        });
    }
    validate_fields(&updated.heading, &updated.text)
}

/// Validates a category name.
pub fn validate_category_name(name: &str) -> Result<(), CategoryError> {
    if name.trim().is_empty() {
        return Err(CategoryError::EmptyName);
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(CategoryError::NameTooLong);
    }
    Ok(())
}

/// Partial changes to an existing record. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsChanges {
    pub author_id: Option<i64>,
    pub heading: Option<String>,
    pub text: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
}

impl NewsChanges {
    /// Returns a copy of `news` with the changes applied.
    pub fn apply_to(&self, news: &News) -> News {
        let mut updated = news.clone();
        if let Some(author_id) = self.author_id {
            updated.author_id = author_id;
        }
        if let Some(heading) = &self.heading {
            updated.heading = heading.clone();
        }
        if let Some(text) = &self.text {
            updated.text = text.clone();
        }
        if let Some(pub_date) = self.pub_date {
            updated.pub_date = pub_date;
        }
        if let Some(category_id) = self.category_id {
            updated.category_id = category_id;
        }
        updated
    }
}

/// Checks whether a user holds a permission through any of their groups.
///
/// Superusers hold every permission.
pub fn has_permission(user: &User, groups: &[Group], permission: Permission) -> bool {
    user.is_superuser
        || groups
            .iter()
            .any(|group| group.permissions.contains(&permission))
}

/// Checks group membership by name.
pub fn is_member_of(groups: &[Group], name: &str) -> bool {
    groups.iter().any(|group| group.name == name)
}

/// Permissions carried by the authors group.
pub fn authors_permissions() -> Vec<Permission> {
    vec![Permission::AddNews, Permission::ChangeNews]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::NewsType;
    use chrono::TimeZone;

    fn user(is_superuser: bool) -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: None,
            is_superuser,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn group(name: &str, permissions: Vec<Permission>) -> Group {
        Group {
            id: 1,
            name: name.to_string(),
            permissions,
        }
    }

    fn news() -> News {
        News {
            id: 10,
            author_id: 1,
            heading: "Original".to_string(),
            text: "Body".to_string(),
            pub_date: Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
            category_id: 1,
            news_type: NewsType::Article,
        }
    }

    #[test]
    fn test_validate_draft_rejects_blank_heading() {
        let draft = NewsDraft {
            author_id: 1,
            heading: "   ".to_string(),
            text: "Body".to_string(),
            pub_date: Utc::now(),
            category_id: 1,
            news_type: NewsType::News,
        };
        assert_eq!(validate_draft(&draft), Err(NewsError::EmptyHeading));
    }

    #[test]
    fn test_validate_draft_rejects_long_heading() {
        let draft = NewsDraft {
            author_id: 1,
            heading: "x".repeat(MAX_HEADING_LEN + 1),
            text: "Body".to_string(),
            pub_date: Utc::now(),
            category_id: 1,
            news_type: NewsType::News,
        };
        assert_eq!(validate_draft(&draft), Err(NewsError::HeadingTooLong));
    }

    #[test]
    fn test_validate_draft_rejects_empty_text() {
        let draft = NewsDraft {
            author_id: 1,
            heading: "Heading".to_string(),
            text: String::new(),
            pub_date: Utc::now(),
            category_id: 1,
            news_type: NewsType::News,
        };
        assert_eq!(validate_draft(&draft), Err(NewsError::EmptyText));
    }

    #[test]
    fn test_validate_update_keeps_type() {
        let existing = news();
        let mut updated = existing.clone();
        updated.news_type = NewsType::News;
        assert!(matches!(
            validate_update(&existing, &updated),
            Err(NewsError::TypeChanged { .. })
        ));

        let mut updated = existing.clone();
        updated.heading = "Changed".to_string();
        assert_eq!(validate_update(&existing, &updated), Ok(()));
    }

    #[test]
    fn test_changes_apply_only_set_fields() {
        let existing = news();
        let changes = NewsChanges {
            heading: Some("New heading".to_string()),
            author_id: Some(2),
            ..Default::default()
        };
        let updated = changes.apply_to(&existing);
        assert_eq!(updated.heading, "New heading");
        assert_eq!(updated.author_id, 2);
        assert_eq!(updated.text, existing.text);
        assert_eq!(updated.pub_date, existing.pub_date);
        assert_eq!(updated.news_type, existing.news_type);
    }

    #[test]
    fn test_validate_category_name() {
        assert_eq!(validate_category_name("Sports"), Ok(()));
        assert_eq!(validate_category_name(""), Err(CategoryError::EmptyName));
        assert_eq!(
            validate_category_name(&"c".repeat(MAX_CATEGORY_NAME_LEN + 1)),
            Err(CategoryError::NameTooLong)
        );
    }

    #[test]
    fn test_has_permission_via_group() {
        let groups = vec![group(AUTHORS_GROUP, authors_permissions())];
        assert!(has_permission(&user(false), &groups, Permission::AddNews));
        assert!(has_permission(&user(false), &groups, Permission::ChangeNews));
        assert!(!has_permission(&user(false), &groups, Permission::DeleteNews));
    }

    #[test]
    fn test_has_permission_without_groups() {
        assert!(!has_permission(&user(false), &[], Permission::AddNews));
    }

    #[test]
    fn test_superuser_has_every_permission() {
        assert!(has_permission(&user(true), &[], Permission::DeleteNews));
    }

    #[test]
    fn test_is_member_of() {
        let groups = vec![group(AUTHORS_GROUP, vec![])];
        assert!(is_member_of(&groups, "authors"));
        assert!(!is_member_of(&groups, "editors"));
    }
}
