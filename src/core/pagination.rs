use std::ops::RangeInclusive;

/// Number of numbered page buttons shown around the current page.
pub const PAGE_WINDOW: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total_elements: u64,
}

impl Pagination {
    pub fn new(page: u64, page_size: u64, total_elements: u64) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(self.page_size)
    }

    /// Clamps a requested page into `[0, total_pages - 1]`.
    pub fn clamp(&self, requested: u64) -> u64 {
        requested.min(self.total_pages().saturating_sub(1))
    }

    pub fn clamped(self) -> Self {
        Self {
            page: self.clamp(self.page),
            ..self
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn previous(&self) -> Option<u64> {
        self.has_previous().then(|| self.page - 1)
    }

    pub fn next(&self) -> Option<u64> {
        self.has_next().then(|| self.page + 1)
    }

    /// Zero-based page indices for the numbered buttons, centred on the
    /// current page and shifted left when the end of the range is reached.
    /// A page past the end is treated as the last page.
    pub fn window(&self, max_pages: u64) -> Option<RangeInclusive<u64>> {
        let total_pages = self.total_pages();
        if total_pages == 0 || max_pages == 0 {
            return None;
        }
        let mut start = self.clamp(self.page).saturating_sub(max_pages / 2);
        let end = (total_pages - 1).min(start + max_pages - 1);
        if end - start + 1 < max_pages {
            start = (end + 1).saturating_sub(max_pages);
        }
        Some(start..=end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_seven_items_make_five_pages() {
        let pagination = Pagination::new(0, 10, 47);
        assert_eq!(pagination.total_pages(), 5);
    }

    #[test]
    fn last_page_is_partial_and_has_no_next() {
        let pagination = Pagination::new(4, 10, 47);
        assert!(!pagination.has_next());
        assert_eq!(pagination.next(), None);
        assert_eq!(pagination.previous(), Some(3));
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let pagination = Pagination::new(9, 10, 47).clamped();
        assert_eq!(pagination.page, 4);
        assert_eq!(Pagination::new(3, 10, 0).clamped().page, 0);
    }

    #[test]
    fn first_page_has_no_previous() {
        let pagination = Pagination::new(0, 10, 47);
        assert!(!pagination.has_previous());
        assert_eq!(pagination.next(), Some(1));
    }

    #[test]
    fn window_centres_and_shifts() {
        assert_eq!(Pagination::new(0, 10, 200).window(PAGE_WINDOW), Some(0..=4));
        assert_eq!(Pagination::new(10, 10, 200).window(PAGE_WINDOW), Some(8..=12));
        assert_eq!(Pagination::new(19, 10, 200).window(PAGE_WINDOW), Some(15..=19));
        assert_eq!(Pagination::new(1, 10, 25).window(PAGE_WINDOW), Some(0..=2));
        assert_eq!(Pagination::new(0, 10, 0).window(PAGE_WINDOW), None);
    }

    #[test]
    fn window_past_the_end_uses_last_page() {
        assert_eq!(Pagination::new(10, 10, 20).window(PAGE_WINDOW), Some(0..=1));
        assert_eq!(Pagination::new(99, 10, 200).window(PAGE_WINDOW), Some(15..=19));
    }
}
