use serde::Serialize;

/// Page size used when a listing does not ask for one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Page number (1-based) and page size applied to a listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of rows to skip for this page.
    pub fn offset(&self) -> i64 {
        let skipped = (self.page.max(1) - 1).saturating_mul(self.per_page);
        i64::try_from(skipped).unwrap_or(i64::MAX)
    }

    /// Maximum number of rows on this page.
    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

/// One page of results together with its position in the full listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total_items: usize, per_page: usize) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total_items.div_ceil(per_page)
        };

        Self {
            items,
            page: page.max(1),
            total_items,
            total_pages,
        }
    }
}
