//! Page descriptor calculation for list endpoints.

use serde::Serialize;

/// Pagination metadata returned alongside a page of posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    #[serde(rename = "SumOfPages")]
    pub total_pages: u64,
    #[serde(rename = "CurrentPage")]
    pub current_page: u32,
    #[serde(rename = "NewsOnPage")]
    pub page_size: u32,
}

/// Build the page descriptor for `total_count` items split into pages of `page_size`.
///
/// A partially filled last page counts as a page. `requested_page` is echoed
/// back as-is, even when it lies past the last page.
///
/// # Panics
/// If `page_size` is zero. Page size is validated at startup.
pub fn paginate(total_count: u64, page_size: u32, requested_page: u32) -> PageDescriptor {
    assert!(page_size > 0, "page size must be non-zero");

    PageDescriptor {
        total_pages: total_count.div_ceil(u64::from(page_size)),
        current_page: requested_page,
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_page_rounds_up() {
        assert_eq!(paginate(16, 15, 0).total_pages, 2);
        assert_eq!(paginate(15, 15, 0).total_pages, 1);
        assert_eq!(paginate(0, 15, 0).total_pages, 0);
        assert_eq!(paginate(1, 15, 0).total_pages, 1);
        assert_eq!(paginate(31, 15, 0).total_pages, 3);
    }

    #[test]
    fn test_requested_page_is_not_clamped() {
        let page = paginate(16, 15, 9);
        assert_eq!(page.current_page, 9);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page_size, 15);
    }

    #[test]
    fn test_large_counts() {
        assert_eq!(paginate(u64::MAX, 1, 0).total_pages, u64::MAX);
        assert_eq!(paginate(u64::MAX, 2, 0).total_pages, u64::MAX / 2 + 1);
    }

    #[test]
    #[should_panic(expected = "page size must be non-zero")]
    fn test_zero_page_size_is_a_bug() {
        paginate(10, 0, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(paginate(16, 15, 1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"SumOfPages": 2, "CurrentPage": 1, "NewsOnPage": 15})
        );
    }
}
