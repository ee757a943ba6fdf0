//! Lefty - catalog of left-handed instruments
//!
//! Listings are scraped from online retailers, normalized into one product
//! schema, kept in an in-memory store and served through a small JSON API.

// Module declarations
pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use api::ApiServer;
pub use application::{CatalogUpdater, load_all_products, update_all};
pub use domain::{Filter, OrderBy, Product, ProductRepository, Retailer};
pub use infrastructure::InMemoryProductStore;
