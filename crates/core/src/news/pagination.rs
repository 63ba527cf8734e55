//! Page arithmetic for news listings.
//!
//! Pages are 1-based. The first page always exists, even for an empty result set;
//! any other page past the end is out of range.

use serde::Serialize;

use super::error::PaginationError;

/// A page as requested by the client, before the total is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(u32),
    Last,
}

impl Default for PageNumber {
    fn default() -> Self {
        PageNumber::Number(1)
    }
}

/// Parses the `page` query parameter. Missing or blank means the first page, and the
/// literal `last` selects the final page.
pub fn parse_page_number(raw: Option<&str>) -> Result<PageNumber, PaginationError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(PageNumber::default()),
        Some(raw) => raw,
    };
    if raw == "last" {
        return Ok(PageNumber::Last);
    }
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(PaginationError::InvalidPage(raw.to_string())),
        Ok(n) => Ok(PageNumber::Number(n)),
    }
}

/// The resolved slice of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PageWindow {
    /// Number of items to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn previous_number(&self) -> Option<u32> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_number(&self) -> Option<u32> {
        self.has_next().then(|| self.number + 1)
    }

    /// True when pagination controls are worth rendering.
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }
}

/// Resolves a requested page against the size of the result set.
pub fn resolve_page(
    requested: PageNumber,
    total_items: u64,
    per_page: u32,
) -> Result<PageWindow, PaginationError> {
    let per_page = per_page.max(1);
    let total_pages = total_items.div_ceil(u64::from(per_page)).max(1);
    let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);

    let number = match requested {
        PageNumber::Last => total_pages,
        PageNumber::Number(n) if n > total_pages => {
            return Err(PaginationError::OutOfRange {
                page: n,
                last: total_pages,
            })
        }
        PageNumber::Number(n) => n,
    };

    Ok(PageWindow {
        number,
        per_page,
        total_items,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_missing_page_is_first() {
        assert_eq!(parse_page_number(None), Ok(PageNumber::Number(1)));
        assert_eq!(parse_page_number(Some("  ")), Ok(PageNumber::Number(1)));
    }

    #[test]
    fn test_parse_numeric_and_last() {
        assert_eq!(parse_page_number(Some("4")), Ok(PageNumber::Number(4)));
        assert_eq!(parse_page_number(Some("last")), Ok(PageNumber::Last));
    }

    #[test]
    fn test_parse_rejects_zero_and_garbage() {
        assert!(matches!(
            parse_page_number(Some("0")),
            Err(PaginationError::InvalidPage(_))
        ));
        assert!(matches!(
            parse_page_number(Some("two")),
            Err(PaginationError::InvalidPage(_))
        ));
        assert!(matches!(
            parse_page_number(Some("-1")),
            Err(PaginationError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_resolve_counts_pages_of_three() {
        let window = resolve_page(PageNumber::Number(1), 7, 3).unwrap();
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.offset(), 0);
        assert!(window.has_next());
        assert!(!window.has_previous());

        let last = resolve_page(PageNumber::Last, 7, 3).unwrap();
        assert_eq!(last.number, 3);
        assert_eq!(last.offset(), 6);
        assert_eq!(last.previous_number(), Some(2));
        assert_eq!(last.next_number(), None);
    }

    #[test]
    fn test_first_page_of_empty_set_is_valid() {
        let window = resolve_page(PageNumber::Number(1), 0, 3).unwrap();
        assert_eq!(window.total_pages, 1);
        assert!(!window.is_paginated());
    }

    #[test]
    fn test_page_past_end_is_out_of_range() {
        assert_eq!(
            resolve_page(PageNumber::Number(2), 0, 3),
            Err(PaginationError::OutOfRange { page: 2, last: 1 })
        );
        assert_eq!(
            resolve_page(PageNumber::Number(4), 9, 3),
            Err(PaginationError::OutOfRange { page: 4, last: 3 })
        );
    }
}
