//! In-memory product catalog
//!
//! A single map from identity key to product behind a reader/writer lock.
//! Every operation holds the lock for its whole duration and never awaits
//! while holding it, so a bulk upsert is either fully visible or not at all.
//! The map can be dumped to and loaded from a JSON snapshot.

use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::domain::{
    CatalogPage, DEFAULT_PRODUCTS_PER_PAGE, Filter, OrderBy, Product, ProductRepository,
};
use crate::infrastructure::errors::StoreResult;

type ProductMap = HashMap<String, Product>;

#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<ProductMap>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic inside an operation never leaves the map half-written, so a
    // poisoned lock is safe to keep using.
    fn read(&self) -> RwLockReadGuard<'_, ProductMap> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProductMap> {
        self.products.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Write the whole catalog as a JSON object keyed by identity key
    pub fn dump<W: Write>(&self, writer: W) -> StoreResult<()> {
        let products = self.read();
        serde_json::to_writer(writer, &*products)?;
        Ok(())
    }

    /// Replace the catalog with a snapshot.
    ///
    /// The snapshot is decoded completely before the lock is taken; a corrupt
    /// snapshot leaves the current catalog untouched.
    pub fn load<R: Read>(&self, reader: R) -> StoreResult<usize> {
        let snapshot: ProductMap = serde_json::from_reader(reader)?;
        let count = snapshot.len();

        *self.write() = snapshot;

        debug!("Loaded {} products from snapshot", count);
        Ok(count)
    }

    pub async fn dump_to_path(&self, path: &Path) -> StoreResult<()> {
        let mut buffer = Vec::new();
        self.dump(&mut buffer)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, buffer).await?;

        info!("Catalog snapshot written to {:?}", path);
        Ok(())
    }

    pub async fn load_from_path(&self, path: &Path) -> StoreResult<usize> {
        let bytes = tokio::fs::read(path).await?;
        self.load(bytes.as_slice())
    }
}

impl ProductRepository for InMemoryProductStore {
    fn upsert(&self, products: Vec<Product>) -> StoreResult<()> {
        let now = Utc::now();
        let count = products.len();

        let mut map = self.write();
        for mut product in products {
            let key = product.identity_key();
            product.created_at = map
                .get(&key)
                .and_then(|existing| existing.created_at)
                .or(Some(now));
            product.updated_at = Some(now);
            map.insert(key, product);
        }

        debug!("Upserted {} products, catalog holds {}", count, map.len());
        Ok(())
    }

    fn find_all(&self, filter: &Filter) -> StoreResult<Vec<Product>> {
        Ok(self.query(filter)?.products)
    }

    fn count(&self, filter: &Filter) -> usize {
        let map = self.read();
        if !filter.has_filter_criteria() {
            return map.len();
        }
        map.values().filter(|product| filter.matches(product)).count()
    }

    fn query(&self, filter: &Filter) -> StoreResult<CatalogPage> {
        let map = self.read();

        let mut matches: Vec<&Product> = map
            .values()
            .filter(|product| filter.matches(product))
            .collect();
        matches.sort_by(|a, b| compare_products(a, b, filter.order_by));

        let window = PageWindow::new(matches.len(), filter.page, filter.products_per_page);
        let products = matches
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .cloned()
            .collect();

        Ok(CatalogPage {
            products,
            current_page: window.page,
            last_page: window.last_page,
            overall_count: window.matched,
        })
    }
}

fn compare_products(a: &Product, b: &Product, order_by: OrderBy) -> Ordering {
    let primary = match order_by {
        OrderBy::PriceAsc => a.price.total_cmp(&b.price),
        OrderBy::PriceDesc => b.price.total_cmp(&a.price),
        OrderBy::AvailabilityAsc => a.availability_score.cmp(&b.availability_score),
        OrderBy::AvailabilityDesc => b.availability_score.cmp(&a.availability_score),
    };

    // identity order keeps results stable across calls
    primary.then_with(|| {
        (&a.retailer, &a.manufacturer, &a.model).cmp(&(&b.retailer, &b.manufacturer, &b.model))
    })
}

/// Slice of the matched products selected by page and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageWindow {
    matched: usize,
    page: u32,
    last_page: u32,
    offset: usize,
    limit: usize,
}

impl PageWindow {
    /// Page 0 is the first page, page size 0 the default size. A page size
    /// above the match count shrinks to it, and a page past the last one
    /// falls back to the first.
    fn new(matched: usize, page: u32, products_per_page: u32) -> Self {
        if matched == 0 {
            return Self {
                matched,
                page: 1,
                last_page: 1,
                offset: 0,
                limit: 0,
            };
        }

        let per_page = match products_per_page {
            0 => DEFAULT_PRODUCTS_PER_PAGE as usize,
            n => n as usize,
        }
        .min(matched);

        let last_page = matched.div_ceil(per_page);
        let mut page = match page {
            0 => 1,
            n => n as usize,
        };
        if page > last_page {
            page = 1;
        }

        let offset = (page - 1) * per_page;
        let limit = per_page.min(matched - offset);

        Self {
            matched,
            page: u32::try_from(page).unwrap_or(1),
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            offset,
            limit,
        }
    }
}
