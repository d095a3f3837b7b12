use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Raw `page` / `limit` query parameters, kept as strings so that
/// malformed values surface as validation errors with a readable message.
#[derive(Debug, Default, Deserialize)]
pub struct ListMessagesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A validated page request: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

/// Pagination metadata returned alongside a page of messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_messages: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, String> {
        if limit <= 0 {
            return Err("Invalid 'limit' parameter. It must be a positive integer.".to_string());
        }

        if limit > MAX_LIMIT {
            return Err(format!("'limit' parameter cannot exceed {}", MAX_LIMIT));
        }

        if page <= 0 {
            return Err("Invalid 'page' parameter. It must be a positive integer.".to_string());
        }

        Ok(PageRequest { page, limit })
    }

    /// Parse the raw query, applying defaults for absent or empty parameters.
    pub fn from_query(query: &ListMessagesQuery) -> Result<Self, String> {
        let limit = match non_empty(&query.limit) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| "Invalid 'limit' parameter. It must be a positive integer.".to_string())?,
            None => DEFAULT_LIMIT,
        };

        let page = match non_empty(&query.page) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| "Invalid 'page' parameter. It must be a positive integer.".to_string())?,
            None => DEFAULT_PAGE,
        };

        Self::new(page, limit)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip. Saturates instead of overflowing for absurd page numbers,
    /// which simply yields an empty page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`; zero when there are no rows.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }

    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            current_page: self.page,
            page_size: self.limit,
            total_pages: self.total_pages(total),
            total_messages: total,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
