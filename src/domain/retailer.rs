//! Retailer (source adapter) contract
//!
//! Every online shop we aggregate is one `Retailer`. Implementations differ
//! completely in how they read a listing page, but all of them answer the same
//! two questions: which categories exist, and what is on page N of a category.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::product::Product;
use crate::infrastructure::errors::RetailerResult;

/// Pagination request passed to a retailer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// 1-based page number, 0 is treated as 1
    pub page: u32,
    /// Only honored by retailers that support a page-size parameter
    pub products_per_page: u32,
}

impl RequestOptions {
    pub const fn for_page(page: u32) -> Self {
        Self {
            page,
            products_per_page: 0,
        }
    }

    /// Page number with the zero value mapped to the first page
    pub const fn normalized_page(&self) -> u32 {
        if self.page == 0 { 1 } else { self.page }
    }
}

/// One listing page as returned by a retailer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub products: Vec<Product>,
    pub current_page: u32,
    pub last_page: u32,
}

#[async_trait]
pub trait Retailer: Send + Sync {
    /// Display name written into `Product::retailer`
    fn name(&self) -> &str;

    /// Category identifiers this retailer is crawled for
    fn categories(&self) -> Vec<String>;

    /// Fetch and parse a single listing page of `category`
    async fn load_products(
        &self,
        category: &str,
        options: RequestOptions,
    ) -> RetailerResult<ProductResponse>;
}
