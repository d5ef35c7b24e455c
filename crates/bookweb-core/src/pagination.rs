//! One-based page cursor for paginated lists

use crate::models::PaginationMeta;

/// Current page plus what the server last reported about paging.
///
/// `total_pages` is 0 until the first successful fetch, which keeps Next
/// disabled before anything is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    limit: u32,
    total_items: u64,
    total_pages: u32,
}

impl PageCursor {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total_items: 0,
            total_pages: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Target page of "Previous", if enabled
    pub fn prev(&self) -> Option<u32> {
        self.can_prev().then(|| self.page - 1)
    }

    /// Target page of "Next", if enabled
    pub fn next(&self) -> Option<u32> {
        self.can_next().then(|| self.page + 1)
    }

    /// `page` if it is within the known range
    pub fn target(&self, page: u32) -> Option<u32> {
        (page >= 1 && page <= self.total_pages.max(1)).then_some(page)
    }

    pub(crate) fn move_to(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Take the latest server-reported totals and clamp the page into range.
    ///
    /// Returns true when the page had to move, i.e. the rows just fetched
    /// belong to a page that no longer exists.
    pub fn revalidate(&mut self, meta: &PaginationMeta) -> bool {
        self.total_items = meta.total_items;
        self.total_pages = meta.total_pages;
        if meta.limit > 0 {
            self.limit = meta.limit;
        }
        let last = self.total_pages.max(1);
        let clamped = self.page.clamp(1, last);
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }
}
