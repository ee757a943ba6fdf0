//! Repository interface for the product catalog

use serde::{Deserialize, Serialize};

use super::filter::Filter;
use super::product::Product;
use crate::infrastructure::errors::StoreResult;

/// A page of query results together with the numbers the API needs for its
/// pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    /// Effective page after out-of-range pages fell back to the first one
    pub current_page: u32,
    pub last_page: u32,
    pub overall_count: usize,
}

pub trait ProductRepository: Send + Sync {
    /// Insert or overwrite products by identity key in one batch
    fn upsert(&self, products: Vec<Product>) -> StoreResult<()>;

    /// Matching products, sorted and paginated according to `filter`
    fn find_all(&self, filter: &Filter) -> StoreResult<Vec<Product>>;

    /// Number of matching products, ignoring pagination
    fn count(&self, filter: &Filter) -> usize;

    /// `find_all` and `count` evaluated against the same state
    fn query(&self, filter: &Filter) -> StoreResult<CatalogPage>;
}
