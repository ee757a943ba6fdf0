//! Retailer implementations
//!
//! One module per shop. The shops share nothing but the [`Retailer`] contract
//! and the few helpers below.

pub mod musik_produktiv;
pub mod thomann;

pub use musik_produktiv::MusikProduktiv;
pub use thomann::Thomann;

use anyhow::{Result, anyhow};
use scraper::{ElementRef, Selector};
use std::sync::Arc;

use crate::domain::Retailer;
use crate::infrastructure::errors::{RetailerError, RetailerResult};
use crate::infrastructure::simple_http_client::PageFetcher;

/// Every retailer the catalog is built from, sharing one fetcher
pub fn default_retailers(fetcher: Arc<dyn PageFetcher>) -> Result<Vec<Arc<dyn Retailer>>> {
    Ok(vec![
        Arc::new(Thomann::new(Arc::clone(&fetcher))?),
        Arc::new(MusikProduktiv::new(fetcher)?),
    ])
}

pub(crate) fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Failed to compile selector '{}': {}", selector, e))
}

/// Trimmed text content of an element
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Reject a request for a page past the last one the shop reported
pub(crate) fn ensure_page_in_bounds(category: &str, requested: u32, last_page: u32) -> RetailerResult<()> {
    if requested > last_page {
        return Err(RetailerError::page_out_of_bounds(category, requested, last_page));
    }
    Ok(())
}
