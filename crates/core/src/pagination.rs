//! Page-window arithmetic for catalog listings.
//!
//! The caller supplies defaults, the raw `page` / `limit` query values and
//! the total number of matching rows. Requested pages are never clamped
//! against the last page: a page past the end simply produces a skip offset
//! beyond the available rows, and the store returns an empty page.

use serde::Serialize;

/// Page shown when the caller does not ask for one.
pub const DEFAULT_CURRENT_PAGE: u64 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT_ITEMS: u64 = 10;

/// Fallback values for [`compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationDefaults {
    pub current_page: u64,
    pub limit_items: u64,
}

impl Default for PaginationDefaults {
    fn default() -> Self {
        Self {
            current_page: DEFAULT_CURRENT_PAGE,
            limit_items: DEFAULT_LIMIT_ITEMS,
        }
    }
}

/// Resolved pagination state for one listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub limit_items: u64,
    pub skip: u64,
    pub total_pages: u64,
}

/// Skip/limit pair handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn window(&self) -> PageWindow {
        PageWindow {
            skip: self.skip,
            limit: self.limit_items,
        }
    }
}

/// Resolve the page window from raw query values.
///
/// `page` and `limit` are used only when they parse to a positive integer;
/// anything else (absent, blank, zero, negative, non-numeric) falls back to
/// the corresponding default.
pub fn compute(
    defaults: PaginationDefaults,
    page: Option<&str>,
    limit: Option<&str>,
    total_count: u64,
) -> Pagination {
    let current_page = parse_positive(page).unwrap_or(defaults.current_page).max(1);
    let limit_items = parse_positive(limit).unwrap_or(defaults.limit_items).max(1);

    Pagination {
        current_page,
        limit_items,
        skip: (current_page - 1).saturating_mul(limit_items),
        total_pages: total_count.div_ceil(limit_items),
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_page_of_twenty_five() {
        let p = compute(PaginationDefaults::default(), Some("3"), None, 25);
        assert_eq!(p.current_page, 3);
        assert_eq!(p.limit_items, 10);
        assert_eq!(p.skip, 20);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn page_past_the_end_is_not_clamped() {
        let p = compute(PaginationDefaults::default(), Some("100"), Some("10"), 5);
        assert_eq!(p.skip, 990);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.current_page, 100);
    }

    #[test]
    fn defaults_apply_when_params_absent() {
        let p = compute(PaginationDefaults::default(), None, None, 0);
        assert_eq!(
            p,
            Pagination {
                current_page: 1,
                limit_items: 10,
                skip: 0,
                total_pages: 0,
            }
        );
    }

    #[test]
    fn invalid_page_values_fall_back() {
        for raw in ["0", "-2", "abc", "", "  "] {
            let p = compute(PaginationDefaults::default(), Some(raw), Some(raw), 42);
            assert_eq!(p.current_page, 1, "page {raw:?}");
            assert_eq!(p.limit_items, 10, "limit {raw:?}");
        }
    }

    #[test]
    fn caller_limit_overrides_default() {
        let p = compute(PaginationDefaults::default(), Some("2"), Some("4"), 9);
        assert_eq!(p.skip, 4);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.window(), PageWindow { skip: 4, limit: 4 });
    }

    #[test]
    fn custom_defaults_are_respected() {
        let defaults = PaginationDefaults {
            current_page: 2,
            limit_items: 25,
        };
        let p = compute(defaults, None, None, 60);
        assert_eq!(p.skip, 25);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let p = compute(
            PaginationDefaults::default(),
            Some(&u64::MAX.to_string()),
            None,
            1,
        );
        assert_eq!(p.skip, u64::MAX);
    }
}
