//! Response envelopes, list pages and list queries
//!
//! Every list endpoint declares which of the two backend shapes it returns.
//! Decoding against the declared shape fails with [`crate::Error::Decode`]
//! instead of quietly producing an empty list.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Standard backend envelope `{ status, statusCode, message, data }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Backend success flag
    #[serde(default)]
    pub status: bool,

    /// Status code echoed in the body
    #[serde(rename = "statusCode", default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Human readable message
    #[serde(default)]
    pub message: String,

    /// Payload
    pub data: T,
}

/// Paginated payload `{ total, page, limit, data: [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of matching records
    pub total: u64,
    /// Page number (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Records on this page
    pub data: Vec<T>,
}

/// Which body a list endpoint returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// `Envelope<Paginated<T>>`
    Paged,
    /// A bare JSON array
    Bare,
}

/// A normalized list page, whatever the wire shape was
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// Total number of matching records
    pub total: u64,
    /// Page number (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` rows
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.limit)).max(1)
    }

    /// Whether a following page exists
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Whether a preceding page exists
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }
}

impl<T> From<Paginated<T>> for Page<T> {
    fn from(p: Paginated<T>) -> Self {
        Self {
            items: p.data,
            total: p.total,
            page: p.page,
            limit: p.limit,
        }
    }
}

impl ListShape {
    /// Decode a list body for `endpoint`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Decode`] when the body does not have this shape.
    pub fn decode<T: DeserializeOwned>(
        self,
        endpoint: &str,
        body: &[u8],
    ) -> crate::Result<Page<T>> {
        match self {
            Self::Paged => serde_json::from_slice::<Envelope<Paginated<T>>>(body)
                .map(|envelope| envelope.data.into())
                .map_err(|e| crate::Error::decode(endpoint, e.to_string())),
            Self::Bare => {
                let items: Vec<T> = serde_json::from_slice(body)
                    .map_err(|e| crate::Error::decode(endpoint, e.to_string()))?;
                let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
                Ok(Page {
                    total: u64::from(len),
                    page: 1,
                    limit: len,
                    items,
                })
            }
        }
    }
}

/// Decode `Envelope<T>` for `endpoint`
///
/// # Errors
///
/// Returns [`crate::Error::Decode`] when the body is not an envelope of `T`.
pub fn decode_envelope<T: DeserializeOwned>(
    endpoint: &str,
    body: &[u8],
) -> crate::Result<Envelope<T>> {
    serde_json::from_slice(body).map_err(|e| crate::Error::decode(endpoint, e.to_string()))
}

/// Pull the `message` field out of an error body, if it has one
#[must_use]
pub fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
}

/// Pagination and filter state of a list page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Page number (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Free-text search, sent under the resource's search key
    pub search: Option<String>,
    /// Status filter
    pub status: Option<String>,
    /// City filter
    pub city: Option<String>,
}

impl ListQuery {
    /// First page with `limit` rows
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            search: None,
            status: None,
            city: None,
        }
    }

    /// Set the page (clamped to 1)
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the search term; blank terms clear it
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = non_blank(term.into());
        self
    }

    /// Set the status filter; blank clears it
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = non_blank(status.into());
        self
    }

    /// Set the city filter; blank clears it
    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = non_blank(city.into());
        self
    }

    /// Query pairs in wire order: `page`, `limit`, search, `status`, `city`
    #[must_use]
    pub fn to_pairs(&self, search_key: &str) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push((search_key.to_string(), search.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        if let Some(city) = &self.city {
            pairs.push(("city".to_string(), city.clone()));
        }
        pairs
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(10)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
