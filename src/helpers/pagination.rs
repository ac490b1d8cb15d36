//! Listing pagination

use serde::Serialize;

/// Pagination state of one listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationData {
    pub per_page: usize,
    /// Number of pages in the listing
    pub total: usize,
    pub current: usize,
    pub current_url: String,
    /// 0 on the first page
    pub prev: usize,
    pub prev_link: String,
    /// 0 on the last page
    pub next: usize,
    pub next_link: String,
}

/// Splits a newest-first listing into fixed size pages, numbered from 1
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a, T> {
    items: &'a [T],
    per_page: usize,
}

impl<'a, T> Paginator<'a, T> {
    pub fn new(items: &'a [T], per_page: usize) -> Self {
        Self {
            items,
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Pages needed to hold every item; 0 for an empty listing
    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.per_page)
    }

    /// Highest valid page number. An empty listing still has an (empty) first page.
    pub fn last_page(&self) -> usize {
        self.page_count().max(1)
    }

    /// Items on page `page`, or `None` if the page does not exist
    pub fn page(&self, page: usize) -> Option<&'a [T]> {
        if page == 0 || page > self.last_page() {
            return None;
        }
        let start = (page - 1) * self.per_page;
        let end = (start + self.per_page).min(self.items.len());
        Some(&self.items[start.min(end)..end])
    }

    /// Pagination data for `page`, with links produced by `link`
    pub fn pagination<F>(&self, page: usize, link: F) -> PaginationData
    where
        F: Fn(usize) -> String,
    {
        let total = self.last_page();
        let prev = if page > 1 { page - 1 } else { 0 };
        let next = if page < total { page + 1 } else { 0 };

        PaginationData {
            per_page: self.per_page,
            total,
            current: page,
            current_url: link(page),
            prev,
            prev_link: if prev > 0 { link(prev) } else { String::new() },
            next,
            next_link: if next > 0 { link(next) } else { String::new() },
        }
    }
}
