use thiserror::Error;

/// Errors that can occur when validating news before creation or update.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NewsError {
    #[error("News heading cannot be empty")]
    EmptyHeading,
    #[error("News heading too long (max 255 characters)")]
    HeadingTooLong,
    #[error("News text cannot be empty")]
    EmptyText,
    #[error("News type cannot change from {from} to {to}")]
    TypeChanged {
        from: super::NewsType,
        to: super::NewsType,
    },
}

/// Errors that can occur when validating a category.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Category name too long (max 64 characters)")]
    NameTooLong,
}

/// Errors that can occur when resolving a page of results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),
    #[error("Page {page} is out of range (last page is {last})")]
    OutOfRange { page: u32, last: u32 },
}
