//! Catalog update orchestration and startup bootstrap

#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::catalog_loader::load_all_products;
use crate::domain::{ProductRepository, Retailer};
use crate::infrastructure::errors::CatalogResult;
use crate::infrastructure::product_store::InMemoryProductStore;

/// Load every retailer and write all products to `store` in one batch.
///
/// Retailers are walked one after another. Any failure aborts the run before
/// the store is touched. Returns the number of products written.
pub async fn update_all(
    store: &dyn ProductRepository,
    retailers: &[Arc<dyn Retailer>],
) -> CatalogResult<usize> {
    let mut all_products = Vec::new();

    for retailer in retailers {
        let products = load_all_products(retailer.as_ref()).await?;
        all_products.extend(products);
    }

    let count = all_products.len();
    store.upsert(all_products)?;
    Ok(count)
}

/// Keeps the shared catalog filled: seeds it from the snapshot file at
/// startup, otherwise refreshes it from the retailers and writes the snapshot.
pub struct CatalogUpdater {
    store: Arc<InMemoryProductStore>,
    retailers: Vec<Arc<dyn Retailer>>,
    snapshot_path: PathBuf,
}

impl CatalogUpdater {
    pub fn new(
        store: Arc<InMemoryProductStore>,
        retailers: Vec<Arc<dyn Retailer>>,
        snapshot_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            retailers,
            snapshot_path: snapshot_path.into(),
        }
    }

    /// Load the snapshot file into the store.
    ///
    /// Returns `false` when there is no usable snapshot; a corrupt one is
    /// logged and the store stays as it was.
    pub async fn seed_from_snapshot(&self) -> bool {
        if !tokio::fs::try_exists(&self.snapshot_path).await.unwrap_or(false) {
            info!("No catalog snapshot at {:?}", self.snapshot_path);
            return false;
        }

        match self.store.load_from_path(&self.snapshot_path).await {
            Ok(count) => {
                info!("Seeded catalog with {} products from {:?}", count, self.snapshot_path);
                true
            }
            Err(e) => {
                warn!("⚠️  Ignoring unreadable catalog snapshot {:?}: {}", self.snapshot_path, e);
                false
            }
        }
    }

    /// Reload all retailers and write the snapshot.
    ///
    /// On failure the current catalog is kept as is.
    pub async fn refresh(&self) -> CatalogResult<usize> {
        let started = Instant::now();
        info!("🔄 Updating catalog from {} retailers", self.retailers.len());

        let count = match update_all(self.store.as_ref(), &self.retailers).await {
            Ok(count) => count,
            Err(e) => {
                error!("❌ Catalog update failed after {:?}: {}", started.elapsed(), e);
                return Err(e);
            }
        };
        info!("✅ Catalog updated with {} products in {:?}", count, started.elapsed());

        if let Err(e) = self.store.dump_to_path(&self.snapshot_path).await {
            error!("Failed to write catalog snapshot {:?}: {}", self.snapshot_path, e);
        }

        Ok(count)
    }

    /// Seed from the snapshot, or refresh when there is none
    pub async fn run(&self) {
        if self.seed_from_snapshot().await {
            return;
        }
        // errors are logged by `refresh`; the catalog stays as it was
        let _ = self.refresh().await;
    }

    /// Run in a detached background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }
}
