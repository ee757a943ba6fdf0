//! Infrastructure layer: retailer adapters, HTTP access, the product store and
//! the ambient plumbing (configuration, logging, errors).

pub mod config;
pub mod errors;
pub mod logging;
pub mod product_store;
pub mod retailers;
pub mod simple_http_client;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager};
pub use errors::{CatalogError, FetchError, RetailerError, StoreError};
pub use logging::{get_log_directory, init_logging_with_config};
pub use product_store::InMemoryProductStore;
pub use retailers::{MusikProduktiv, Thomann, default_retailers};
pub use simple_http_client::{HttpClient, HttpClientConfig, PageFetcher};
