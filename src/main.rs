#![allow(missing_docs)]

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use lefty_lib::api::ApiServer;
use lefty_lib::application::CatalogUpdater;
use lefty_lib::infrastructure::config::ConfigManager;
use lefty_lib::infrastructure::logging::{init_logging_with_config, log_system_info};
use lefty_lib::infrastructure::product_store::InMemoryProductStore;
use lefty_lib::infrastructure::retailers::default_retailers;
use lefty_lib::infrastructure::simple_http_client::HttpClient;

#[actix_web::main]
async fn main() -> Result<()> {
    let config_manager = ConfigManager::new()?;
    let mut config = config_manager.load_config().await?;
    config.apply_env_overrides()?;

    init_logging_with_config(&config.logging)?;
    log_system_info();
    info!("Configuration: {:?}", config_manager.config_path());

    let store = Arc::new(InMemoryProductStore::new());

    let fetcher = Arc::new(
        HttpClient::from_http_config(&config.http).context("Failed to build HTTP client")?,
    );
    let retailers = default_retailers(fetcher)?;
    let updater = CatalogUpdater::new(
        Arc::clone(&store),
        retailers,
        config.catalog.snapshot_path.clone(),
    );

    if config.catalog.update_on_startup {
        // queries are served from whatever the catalog holds meanwhile
        let _background_update = updater.spawn();
    } else if !updater.seed_from_snapshot().await {
        warn!("Catalog updates are disabled and no snapshot was loaded; serving an empty catalog");
    }

    ApiServer::from_config(&config).run(store).await
}
