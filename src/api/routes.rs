// API route configuration

use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};

use crate::api::handlers;
use crate::api::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    }))
    .route("/health", web::get().to(handlers::health_check))
    .service(web::scope("/api").route("/products", web::get().to(handlers::list_products)))
    .default_service(web::to(handlers::not_found));
}
