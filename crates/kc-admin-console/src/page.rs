//! Page arithmetic for the paginated views.

/// Number of pages needed for `count` items, never less than one.
#[must_use]
pub fn number_of_pages(count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = count.div_ceil(u64::from(page_size)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Offset of the first item on a 1-based page.
#[must_use]
pub const fn page_offset(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Page-number navigation over a counted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    page_size: u32,
    number_of_pages: u32,
}

impl Pagination {
    /// Starts on page 1 of an unknown number of pages.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size,
            number_of_pages: 1,
        }
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Total pages as of the last count.
    #[must_use]
    pub const fn number_of_pages(&self) -> u32 {
        self.number_of_pages
    }

    /// Offset of the current page.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        page_offset(self.current_page, self.page_size)
    }

    /// Records a new total.
    pub fn set_count(&mut self, count: u64) {
        self.number_of_pages = number_of_pages(count, self.page_size);
    }

    /// Moves to `page` (at least 1). Returns `false` if already there.
    pub fn go_to(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }
}

/// Offset-based first/previous/next navigation for uncounted listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    first: u32,
    max: u32,
}

impl PageCursor {
    /// Starts at offset 0.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { first: 0, max }
    }

    /// Offset of the first item.
    #[must_use]
    pub const fn first(&self) -> u32 {
        self.first
    }

    /// Items per page.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Returns to offset 0.
    pub fn first_page(&mut self) {
        self.first = 0;
    }

    /// Steps back one page, stopping at 0.
    pub fn previous_page(&mut self) {
        self.first = self.first.saturating_sub(self.max);
    }

    /// Steps forward one page.
    pub fn next_page(&mut self) {
        self.first = self.first.saturating_add(self.max);
    }
}
