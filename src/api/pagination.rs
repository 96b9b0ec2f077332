//! Page-number pagination envelope: `{count, next, previous, results}`

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, PageRequest, Paginated};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageParams {
    pub fn to_request(&self, default_limit: u64) -> Result<PageRequest, DomainError> {
        PageRequest::new(self.page, self.limit, default_limit)
    }
}

#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PageResponse<T> {
    /// `path` and `raw_query` are those of the current request; links keep
    /// every other query parameter.
    pub fn new(path: &str, raw_query: Option<&str>, page: PageRequest, data: Paginated<T>) -> Self {
        let current = page.page();
        let shown = current.saturating_mul(page.limit());
        let next = (shown < data.total).then(|| page_link(path, raw_query, current + 1));
        let previous = (current > 1).then(|| page_link(path, raw_query, current - 1));

        Self {
            count: data.total,
            next,
            previous,
            results: data.items,
        }
    }
}

/// Same path and query, with `page` replaced
pub fn page_link(path: &str, raw_query: Option<&str>, page: u64) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if let Some(query) = raw_query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key != "page" {
                serializer.append_pair(&key, &value);
            }
        }
    }
    serializer.append_pair("page", &page.to_string());
    format!("{}?{}", path, serializer.finish())
}
