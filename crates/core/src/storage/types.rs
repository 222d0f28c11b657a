use serde::{Deserialize, Serialize};

use crate::course::{Course, Difficulty};

/// Default page size for paginated course listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalized, paginated course search.
///
/// `page` is 1-based and `limit` is always within `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseQuery {
    pub page: u32,
    pub limit: u32,
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
    /// Matches courses with any of these difficulties. Empty matches all.
    pub difficulties: Vec<Difficulty>,
}

impl CourseQuery {
    /// Builds a query, applying defaults and clamping the page size.
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        search: Option<String>,
        difficulties: Vec<Difficulty>,
    ) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            page,
            limit,
            search,
            difficulties,
        }
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Whether a course passes the search and difficulty filters.
    pub fn matches(&self, course: &Course) -> bool {
        let difficulty_ok =
            self.difficulties.is_empty() || self.difficulties.contains(&course.difficulty);
        let search_ok = self.search.as_ref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            course.title.to_lowercase().contains(&needle)
                || course.description.to_lowercase().contains(&needle)
        });
        difficulty_ok && search_ok
    }
}

impl Default for CourseQuery {
    fn default() -> Self {
        Self::new(None, None, None, Vec::new())
    }
}

/// Pagination metadata returned with a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_count: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub limit: u32,
}

impl PaginationMeta {
    pub fn new(query: &CourseQuery, total_count: u64) -> Self {
        let limit = u64::from(query.limit);
        let total_pages = total_count.div_ceil(limit);
        Self {
            current_page: query.page,
            total_pages,
            total_count,
            has_next: u64::from(query.page) < total_pages,
            has_prev: query.page > 1,
            limit: query.limit,
        }
    }
}

/// One page of courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePage {
    pub data: Vec<Course>,
    pub pagination: PaginationMeta,
}
