// API server implementation using actix-web

use actix_web::middleware::{Compress, Logger};
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use std::sync::Arc;

use crate::api::handlers::QuerySettings;
use crate::api::routes;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::product_store::InMemoryProductStore;

pub struct ApiServer {
    pub host: String,
    pub port: u16,
    pub products_per_page: u32,
}

impl ApiServer {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            products_per_page: config.catalog.products_per_page,
        }
    }

    /// Serve the catalog until the server is stopped (Ctrl-C)
    pub async fn run(self, store: Arc<InMemoryProductStore>) -> Result<()> {
        let bind_addr = format!("{}:{}", self.host, self.port);

        tracing::info!(host = %self.host, port = %self.port, "Starting lefty API server");

        let store_data = web::Data::from(store);
        let settings = web::Data::new(QuerySettings {
            products_per_page: self.products_per_page,
        });

        HttpServer::new(move || {
            App::new()
                .app_data(store_data.clone())
                .app_data(settings.clone())
                .wrap(Logger::default())
                .wrap(Compress::default())
                .configure(routes::configure_routes)
        })
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind to {}", bind_addr))?
        .run()
        .await
        .context("HTTP server error")?;

        Ok(())
    }
}
