mod error;
mod filter;
mod operations;
mod pagination;
mod types;

pub use error::{CategoryError, NewsError, PaginationError};
pub use filter::{compare_newest_first, filter_news, sort_news_newest_first, NewsFilter};
pub use operations::{
    authors_permissions, has_permission, is_member_of, validate_category_name, validate_draft,
    validate_update, NewsChanges, AUTHORS_GROUP, MAX_CATEGORY_NAME_LEN, MAX_HEADING_LEN,
};
pub use pagination::{parse_page_number, resolve_page, PageNumber, PageWindow};
pub use types::{
    Category, Group, News, NewsDraft, NewsType, NewUser, Permission, SubscriptionOutcome, User,
};
