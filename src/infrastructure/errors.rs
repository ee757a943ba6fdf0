//! Error types for fetching, parsing and storing catalog data
//!
//! Retailers surface every failure to the catalog loader, which never
//! recovers from them: the first error aborts the whole update run.

use thiserror::Error;

/// Transport-level failure of a single HTTP request
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Empty response from {url}")]
    EmptyBody { url: String },
}

#[derive(Error, Debug)]
pub enum RetailerError {
    #[error("could not fetch products from {retailer}: {source}")]
    Fetch {
        retailer: String,
        #[source]
        source: FetchError,
    },

    #[error("unexpected response structure from {retailer}: {reason}")]
    Parse { retailer: String, reason: String },

    #[error("page {requested} of category '{category}' is out of bounds (last page is {last_page})")]
    PageOutOfBounds {
        category: String,
        requested: u32,
        last_page: u32,
    },
}

impl RetailerError {
    pub fn fetch(retailer: &str, source: FetchError) -> Self {
        Self::Fetch {
            retailer: retailer.to_string(),
            source,
        }
    }

    pub fn parse(retailer: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            retailer: retailer.to_string(),
            reason: reason.into(),
        }
    }

    pub fn page_out_of_bounds(category: &str, requested: u32, last_page: u32) -> Self {
        Self::PageOutOfBounds {
            category: category.to_string(),
            requested,
            last_page,
        }
    }
}

/// Snapshot dump/load failure
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not a valid product map: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of a full catalog update run
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Retailer(#[from] RetailerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type RetailerResult<T> = Result<T, RetailerError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_fetch_error_keeps_source() {
        let err = RetailerError::fetch(
            "Thomann",
            FetchError::Status {
                status: 503,
                url: "https://www.thomann.de/de/x.html".into(),
            },
        );

        assert!(err.to_string().starts_with("could not fetch products from Thomann"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_page_out_of_bounds_message() {
        let err = RetailerError::page_out_of_bounds("e-bass-linkshaender", 1337, 6);
        assert_eq!(
            err.to_string(),
            "page 1337 of category 'e-bass-linkshaender' is out of bounds (last page is 6)"
        );
    }
}
