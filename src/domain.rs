//! Domain layer: catalog entities and the contracts the rest of the crate is
//! written against.

pub mod filter;
pub mod product;
pub mod repositories;
pub mod retailer;

pub use filter::{DEFAULT_PRODUCTS_PER_PAGE, Filter, OrderBy};
pub use product::{AvailabilityScore, Product};
pub use repositories::{CatalogPage, ProductRepository};
pub use retailer::{ProductResponse, RequestOptions, Retailer};
