// HTTP request handlers for API endpoints

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use std::fmt;

use crate::api::models::{ErrorResponse, HealthResponse, ProductListResponse, ProductQuery};
use crate::domain::ProductRepository;
use crate::infrastructure::errors::StoreError;
use crate::infrastructure::product_store::InMemoryProductStore;

/// Settings shared by all handlers
#[derive(Debug, Clone, Copy)]
pub struct QuerySettings {
    /// Page size when the client does not send `per_page`
    pub products_per_page: u32,
}

/// Store failure surfaced as a JSON 500
#[derive(Debug)]
pub struct ApiError(StoreError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        Self(error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("Catalog query failed: {}", self.0);
        HttpResponse::InternalServerError().json(ErrorResponse::new("catalog query failed"))
    }
}

/// `GET /health`
pub async fn health_check(store: web::Data<InMemoryProductStore>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        products: store.len(),
    })
}

/// `GET /api/products`
pub async fn list_products(
    query: web::Query<ProductQuery>,
    store: web::Data<InMemoryProductStore>,
    settings: web::Data<QuerySettings>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.to_filter(settings.products_per_page);
    tracing::debug!(
        search = %filter.search,
        retailer = %filter.retailer,
        order = filter.order_by.as_token(),
        page = filter.page,
        per_page = filter.products_per_page,
        "Product query"
    );

    let page = store.query(&filter)?;
    Ok(HttpResponse::Ok().json(ProductListResponse::from(page)))
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("not found"))
}
