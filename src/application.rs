//! Application layer: catalog ingestion workflows built on the domain
//! contracts.

pub mod catalog_loader;
pub mod catalog_updater;

pub use catalog_loader::load_all_products;
pub use catalog_updater::{CatalogUpdater, update_all};
