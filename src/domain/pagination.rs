//! Fixed-size pagination over the ordered car listing.

/// Rows per page.
pub const PAGE_SIZE: u32 = 10;

/// A requested page (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
}

impl PageRequest {
    /// Pages below 1 are clamped to 1.
    pub fn new(page: u32) -> Self {
        Self { page: page.max(1) }
    }

    pub fn limit(&self) -> u32 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(PAGE_SIZE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

/// Display state for the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub total_pages: u32,
    /// Rows matching the current filter.
    pub total_rows: u64,
}

impl PageWindow {
    pub fn new(request: PageRequest, total_rows: u64) -> Self {
        Self {
            page: request.page,
            total_pages: total_pages(total_rows),
            total_rows,
        }
    }

    /// First/Previous are disabled on page 1.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Next/Last are disabled on (or past) the last page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// `ceil(total / PAGE_SIZE)`, never less than 1 so an empty table still has a page.
pub fn total_pages(total_rows: u64) -> u32 {
    let pages = total_rows.div_ceil(u64::from(PAGE_SIZE)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
