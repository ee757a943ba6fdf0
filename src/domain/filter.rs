//! Catalog query parameters

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Products per page when the caller does not ask for a specific size
pub const DEFAULT_PRODUCTS_PER_PAGE: u32 = 50;

/// Sort order for catalog queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderBy {
    #[default]
    PriceAsc,
    PriceDesc,
    AvailabilityAsc,
    AvailabilityDesc,
}

impl OrderBy {
    /// Parse the wire token used by the HTTP API.
    ///
    /// Unknown tokens fall back to the default order instead of failing.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "-price" => Self::PriceDesc,
            "availability" => Self::AvailabilityAsc,
            "-availability" => Self::AvailabilityDesc,
            _ => Self::PriceAsc,
        }
    }

    pub const fn as_token(self) -> &'static str {
        match self {
            Self::PriceAsc => "price",
            Self::PriceDesc => "-price",
            Self::AvailabilityAsc => "availability",
            Self::AvailabilityDesc => "-availability",
        }
    }
}

/// Filter, sort and pagination criteria for `find_all` / `count`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub search: String,
    pub retailer: String,
    pub order_by: OrderBy,
    /// 1-based; 0 means "first page"
    pub page: u32,
    /// 0 means [`DEFAULT_PRODUCTS_PER_PAGE`]
    pub products_per_page: u32,
}

impl Filter {
    pub fn has_filter_criteria(&self) -> bool {
        !self.search.is_empty() || !self.retailer.is_empty()
    }

    /// Whether a product passes the search and retailer criteria.
    /// Pagination and ordering are ignored here.
    pub fn matches(&self, product: &Product) -> bool {
        if !self.retailer.is_empty() && product.retailer != self.retailer {
            return false;
        }
        self.search.is_empty() || product.matches_search(&self.search)
    }
}
