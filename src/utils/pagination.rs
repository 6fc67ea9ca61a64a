//! Pagination of list results and RFC-5988 navigation links.
//!
//! Raw `page`/`per_page` query parameters are attacker-controlled: values
//! are parsed leniently (anything unparsable falls back to a default) and
//! clamped into safe ranges before they reach a SQL statement.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page size used when the client does not request one.
pub const DEFAULT_PAGE_SIZE: i64 = 100;
/// Upper bound on client-requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Query parameter carrying the 1-based page number.
pub const PAGE_VAR: &str = "page";
/// Query parameter carrying the page size.
pub const PER_PAGE_VAR: &str = "per_page";

/// A paginated list of items.
///
/// `total_count` and `page_count` are `-1` when the total is unknown.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pages<T> {
    pub page: i64,
    pub per_page: i64,
    pub page_count: i64,
    pub total_count: i64,
    pub items: Vec<T>,
}

/// Navigation links for a page; absent entries are not applicable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

impl<T> Pages<T> {
    /// Computes pagination metadata from raw inputs.
    ///
    /// `page` is 1-based. A non-positive `per_page` becomes
    /// [`DEFAULT_PAGE_SIZE`] and values above [`MAX_PAGE_SIZE`] are clamped
    /// down. `total < 0` means the total is unknown; the page number is then
    /// only floored at 1, never clamped from above.
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let mut per_page = per_page;
        if per_page <= 0 {
            per_page = DEFAULT_PAGE_SIZE;
        }
        if per_page > MAX_PAGE_SIZE {
            per_page = MAX_PAGE_SIZE;
        }

        let mut page = page;
        let mut page_count = -1;
        if total >= 0 {
            page_count = (total + per_page - 1) / per_page;
            if page > page_count {
                page = page_count;
            }
        }
        if page < 1 {
            page = 1;
        }

        Self {
            page,
            per_page,
            page_count,
            total_count: total,
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<T>) -> Self {
        self.items = items;
        self
    }

    /// OFFSET value for a SQL statement.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// LIMIT value for a SQL statement.
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Builds the first/prev/next/last links for this page.
    ///
    /// Links carry the page number, and the page size only when it differs
    /// from `default_per_page`, keeping default-case URLs minimal.
    pub fn build_links(&self, base_url: &str, default_per_page: i64) -> PageLinks {
        let mut page = self.page;
        if self.page_count >= 0 && page > self.page_count {
            page = self.page_count;
        }
        let sep = if base_url.contains('?') { '&' } else { '?' };
        let link = |target: i64| {
            let mut url = format!("{base_url}{sep}{PAGE_VAR}={target}");
            if self.per_page != default_per_page {
                url.push_str(&format!("&{PER_PAGE_VAR}={}", self.per_page));
            }
            url
        };

        let mut links = PageLinks::default();
        if page > 1 {
            links.first = Some(link(1));
            links.prev = Some(link(page - 1));
        }
        if self.page_count < 0 {
            links.next = Some(link(page + 1));
        } else if page < self.page_count {
            links.next = Some(link(page + 1));
            links.last = Some(link(self.page_count));
        }
        links
    }

    /// Renders the links as an RFC-5988 `Link` header value; empty when no
    /// link applies.
    pub fn build_link_header(&self, base_url: &str, default_per_page: i64) -> String {
        let links = self.build_links(base_url, default_per_page);
        let mut header = String::new();
        if let (Some(first), Some(prev)) = (&links.first, &links.prev) {
            header.push_str(&format!("<{first}>; rel=\"first\", "));
            header.push_str(&format!("<{prev}>; rel=\"prev\""));
        }
        if let Some(next) = &links.next {
            if !header.is_empty() {
                header.push_str(", ");
            }
            header.push_str(&format!("<{next}>; rel=\"next\""));
            if let Some(last) = &links.last {
                header.push_str(&format!(", <{last}>; rel=\"last\""));
            }
        }
        header
    }
}

/// Raw pagination query parameters.
///
/// Both values arrive as strings so that malformed input can fall back to
/// the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// 1-based page number.
    pub page: Option<String>,
    /// Items per page.
    pub per_page: Option<String>,
}

impl PaginationQuery {
    /// Resolves the raw parameters against a known item count (`-1` when
    /// unknown).
    pub fn pages<T>(&self, total: i64) -> Pages<T> {
        let page = parse_i64(self.page.as_deref(), 1);
        let per_page = parse_i64(self.per_page.as_deref(), DEFAULT_PAGE_SIZE);
        Pages::new(page, per_page, total)
    }
}

fn parse_i64(value: Option<&str>, default: i64) -> i64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
