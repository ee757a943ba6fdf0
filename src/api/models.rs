// API request/response models

use serde::{Deserialize, Serialize};

use crate::domain::{CatalogPage, Filter, OrderBy, Product};

/// Search terms shorter than this are ignored
pub const MIN_SEARCH_LENGTH: usize = 3;

/// Query string of `GET /api/products`.
///
/// Numbers are taken as strings so that malformed values fall back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub retailer: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ProductQuery {
    pub fn to_filter(&self, default_per_page: u32) -> Filter {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| search.chars().count() >= MIN_SEARCH_LENGTH)
            .unwrap_or_default();

        Filter {
            search: search.to_string(),
            retailer: self.retailer.as_deref().map(str::trim).unwrap_or_default().to_string(),
            order_by: self.order.as_deref().map(OrderBy::from_token).unwrap_or_default(),
            page: parse_number(self.page.as_deref()).unwrap_or(1),
            products_per_page: parse_number(self.per_page.as_deref()).unwrap_or(default_per_page),
        }
    }
}

fn parse_number(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Pagination metadata of a product listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub overall_count: usize,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub data: Vec<Product>,
    pub meta: PageMeta,
}

impl From<CatalogPage> for ProductListResponse {
    fn from(page: CatalogPage) -> Self {
        let meta = PageMeta {
            current_page: page.current_page,
            last_page: page.last_page,
            overall_count: page.overall_count,
            count: page.products.len(),
        };
        Self {
            data: page.products,
            meta,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub products: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn query(search: Option<&str>, page: Option<&str>, per_page: Option<&str>) -> ProductQuery {
        ProductQuery {
            search: search.map(String::from),
            page: page.map(String::from),
            per_page: per_page.map(String::from),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(None, "")]
    #[case(Some("ja"), "")]
    #[case(Some("  ja  "), "")]
    #[case(Some("jaz"), "jaz")]
    #[case(Some(" Jazzmaster "), "Jazzmaster")]
    fn test_short_search_is_ignored(#[case] search: Option<&str>, #[case] expected: &str) {
        assert_eq!(query(search, None, None).to_filter(50).search, expected);
    }

    #[rstest]
    #[case(None, None, 1, 50)]
    #[case(Some("3"), Some("20"), 3, 20)]
    #[case(Some("abc"), Some("-5"), 1, 50)]
    #[case(Some("0"), Some("0"), 0, 0)]
    fn test_numbers_fall_back_to_defaults(
        #[case] page: Option<&str>,
        #[case] per_page: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_per_page: u32,
    ) {
        let filter = query(None, page, per_page).to_filter(50);
        assert_eq!(filter.page, expected_page);
        assert_eq!(filter.products_per_page, expected_per_page);
    }

    #[test]
    fn test_order_and_retailer() {
        let filter = ProductQuery {
            retailer: Some("Thomann".into()),
            order: Some("-availability".into()),
            ..Default::default()
        }
        .to_filter(50);

        assert_eq!(filter.retailer, "Thomann");
        assert_eq!(filter.order_by, OrderBy::AvailabilityDesc);
    }
}
