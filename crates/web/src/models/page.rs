//! Pagination types.

/// Listing page size.
pub const ITEMS_PER_PAGE: u32 = 6;

/// A requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build a request; pages below 1 are clamped to 1.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Parse a raw `page` query value, defaulting to the first page.
    #[must_use]
    pub fn from_query(raw: Option<&str>, per_page: u32) -> Self {
        let page = raw
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map_or(1, |p| u32::try_from(p.max(1)).unwrap_or(u32::MAX));
        Self::new(page, per_page)
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.per_page)
    }

    /// Row limit for this page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, ITEMS_PER_PAGE)
    }
}

/// One page of results plus the counts needed for navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    /// Total matching rows across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
        }
    }

    /// Number of pages; zero when nothing matched.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_below_one_is_clamped() {
        assert_eq!(PageRequest::new(0, 6).page(), 1);
        assert_eq!(PageRequest::from_query(Some("-4"), 6).page(), 1);
    }

    #[test]
    fn test_unparseable_page_defaults_to_first() {
        assert_eq!(PageRequest::from_query(Some("abc"), 6).page(), 1);
        assert_eq!(PageRequest::from_query(None, 6).page(), 1);
        assert_eq!(PageRequest::from_query(Some(" 3 "), 6).page(), 3);
    }

    #[test]
    fn test_offset_and_limit() {
        let req = PageRequest::new(3, 6);
        assert_eq!(req.offset(), 12);
        assert_eq!(req.limit(), 6);
    }

    #[test]
    fn test_navigation_flags() {
        let first = Page::new(vec![1, 2, 3, 4, 5, 6], PageRequest::new(1, 6), 13);
        assert_eq!(first.total_pages(), 3);
        assert!(!first.has_prev());
        assert!(first.has_next());

        let last = Page::new(vec![13], PageRequest::new(3, 6), 13);
        assert!(last.has_prev());
        assert!(!last.has_next());
    }

    #[test]
    fn test_out_of_range_page_is_empty_without_next() {
        let page: Page<i32> = Page::new(Vec::new(), PageRequest::new(9, 6), 7);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages(), 2);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let page: Page<i32> = Page::new(Vec::new(), PageRequest::default(), 0);
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_next());
        assert!(!page.has_prev());
    }
}
