//! Musik Produktiv: server-rendered listing pages read with CSS selectors

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use super::{compile_selector, element_text, ensure_page_in_bounds};
use crate::domain::{AvailabilityScore, Product, ProductResponse, RequestOptions, Retailer};
use crate::infrastructure::config::retailer_urls;
use crate::infrastructure::errors::{RetailerError, RetailerResult};
use crate::infrastructure::simple_http_client::PageFetcher;

const RETAILER_NAME: &str = "Musik Produktiv";

const CATEGORIES: &[&str] = &[
    "e-gitarre-linkshaender",
    "westerngitarre-linkshaender",
    "e-bass-linkshaender",
    "konzertgitarre-linkshaender",
];

struct ListingSelectors {
    title: Selector,
    manufacturer_menu: Selector,
    manufacturer_entry: Selector,
    item: Selector,
    name: Selector,
    price: Selector,
    availability: Selector,
    link: Selector,
    image: Selector,
    pagination: Selector,
}

impl ListingSelectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            title: compile_selector("div.list_title h1")?,
            manufacturer_menu: compile_selector(".mp-filtermenu ul")?,
            manufacturer_entry: compile_selector("li span")?,
            item: compile_selector("ul.artgrid li")?,
            name: compile_selector("b")?,
            price: compile_selector("i")?,
            availability: compile_selector(".ampel")?,
            link: compile_selector("a")?,
            image: compile_selector("img")?,
            pagination: compile_selector("ul.pagination li")?,
        })
    }
}

pub struct MusikProduktiv {
    fetcher: Arc<dyn PageFetcher>,
    base_url: Url,
    selectors: ListingSelectors,
}

impl MusikProduktiv {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Self::with_base_url(fetcher, retailer_urls::MUSIK_PRODUKTIV_BASE)
    }

    pub fn with_base_url(fetcher: Arc<dyn PageFetcher>, base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;

        Ok(Self {
            fetcher,
            base_url,
            selectors: ListingSelectors::compile()?,
        })
    }

    /// `<base>/<category>/?p=<page>`; the shop has no page size parameter
    fn listing_url(&self, category: &str, page: u32) -> String {
        format!(
            "{}/{}/?p={}",
            self.base_url.as_str().trim_end_matches('/'),
            category,
            page
        )
    }

    fn parse_listing(
        &self,
        html: &str,
        category: &str,
        requested_page: u32,
    ) -> RetailerResult<ProductResponse> {
        let document = Html::parse_document(html);

        let (current_page, last_page) = self.parse_pagination(&document);
        ensure_page_in_bounds(category, requested_page, last_page)?;

        let category_label = document
            .select(&self.selectors.title)
            .next()
            .map(|title| element_text(&title))
            .unwrap_or_default();
        let manufacturers = self.known_manufacturers(&document);

        let items: Vec<ElementRef> = document.select(&self.selectors.item).collect();
        if items.is_empty() {
            return Err(RetailerError::parse(
                RETAILER_NAME,
                format!("no products found in listing of '{}'", category),
            ));
        }

        let products: Vec<Product> = items
            .iter()
            .filter_map(|item| self.parse_item(item, &category_label, &manufacturers))
            .collect();

        debug!(
            "{} '{}' page {}/{}: {} of {} items parsed",
            RETAILER_NAME,
            category,
            current_page,
            last_page,
            products.len(),
            items.len()
        );

        Ok(ProductResponse {
            products,
            current_page,
            last_page,
        })
    }

    /// A widget with a single entry (or no widget at all) means a single page
    fn parse_pagination(&self, document: &Html) -> (u32, u32) {
        let entries: Vec<ElementRef> = document.select(&self.selectors.pagination).collect();
        if entries.len() <= 1 {
            return (1, 1);
        }

        let current = entries
            .iter()
            .find(|entry| entry.value().classes().any(|class| class == "active"))
            .and_then(|entry| element_text(entry).parse::<u32>().ok())
            .unwrap_or(1);
        let last = entries
            .iter()
            .filter_map(|entry| element_text(entry).parse::<u32>().ok())
            .max()
            .unwrap_or(current);

        (current, last.max(current))
    }

    /// Manufacturer names offered in the first filter menu
    fn known_manufacturers(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.selectors.manufacturer_menu)
            .next()
            .map(|menu| {
                menu.select(&self.selectors.manufacturer_entry)
                    .map(|entry| element_text(&entry))
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parse_item(
        &self,
        item: &ElementRef<'_>,
        category: &str,
        manufacturers: &[String],
    ) -> Option<Product> {
        let name = item
            .select(&self.selectors.name)
            .next()
            .map(|name| element_text(&name))
            .filter(|name| !name.is_empty());
        let Some(name) = name else {
            warn!("Skipping {} item without a name in '{}'", RETAILER_NAME, category);
            return None;
        };

        let price_text = item
            .select(&self.selectors.price)
            .next()
            .map(|price| element_text(&price))
            .unwrap_or_default();
        let Some(price) = parse_price(&price_text) else {
            warn!("Skipping '{}': no price in '{}'", name, price_text);
            return None;
        };

        let (manufacturer, model) = split_name(&name, manufacturers);

        let (is_available, availability_info, availability_score) = item
            .select(&self.selectors.availability)
            .next()
            .map(|ampel| {
                let classes: Vec<&str> = ampel.value().classes().collect();
                (
                    !classes.contains(&"zzz"),
                    ampel.value().attr("title").unwrap_or_default().to_string(),
                    availability_from_classes(&classes),
                )
            })
            .unwrap_or((true, String::new(), AvailabilityScore::Unknown));

        let product_url = item
            .select(&self.selectors.link)
            .next()
            .and_then(|link| link.value().attr("href"))
            .map(|href| self.resolve_url(href))
            .unwrap_or_default();
        let thumbnail_url = item
            .select(&self.selectors.image)
            .next()
            .and_then(|image| image.value().attr("src"))
            .map(|src| self.resolve_url(src))
            .unwrap_or_default();

        Some(Product {
            retailer: RETAILER_NAME.to_string(),
            manufacturer,
            model,
            category: category.to_string(),
            is_available,
            availability_info,
            availability_score,
            price,
            product_url,
            thumbnail_url,
            ..Default::default()
        })
    }

    fn resolve_url(&self, link: &str) -> String {
        self.base_url
            .join(link)
            .map(String::from)
            .unwrap_or_else(|_| link.to_string())
    }
}

#[async_trait]
impl Retailer for MusikProduktiv {
    fn name(&self) -> &str {
        RETAILER_NAME
    }

    fn categories(&self) -> Vec<String> {
        CATEGORIES.iter().map(|c| (*c).to_string()).collect()
    }

    async fn load_products(
        &self,
        category: &str,
        options: RequestOptions,
    ) -> RetailerResult<ProductResponse> {
        let page = options.normalized_page();
        let url = self.listing_url(category, page);

        let html = self
            .fetcher
            .fetch_html_string(&url)
            .await
            .map_err(|e| RetailerError::fetch(RETAILER_NAME, e))?;

        // `Html` is not Send, so parsing stays out of the await points
        self.parse_listing(&html, category, page)
    }
}

/// Split "<manufacturer> <model>".
///
/// The longest known manufacturer that prefixes the name wins, so multi-word
/// brands like "Gretsch Guitars" survive. Otherwise the first word is taken.
fn split_name(name: &str, manufacturers: &[String]) -> (String, String) {
    let known = manufacturers
        .iter()
        .filter(|manufacturer| {
            name.strip_prefix(manufacturer.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        })
        .max_by_key(|manufacturer| manufacturer.len());

    if let Some(manufacturer) = known {
        let model = name[manufacturer.len()..].trim_start();
        return (manufacturer.clone(), model.to_string());
    }

    match name.split_once(char::is_whitespace) {
        Some((manufacturer, model)) => (manufacturer.to_string(), model.trim_start().to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// "1.299,- €" -> 1299. Prices without digits yield `None`.
fn parse_price(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn availability_from_classes(classes: &[&str]) -> AvailabilityScore {
    if classes.contains(&"gruen") {
        AvailabilityScore::Available
    } else if classes.contains(&"gelb") {
        AvailabilityScore::WithinDays
    } else if classes.contains(&"orange") {
        AvailabilityScore::WithinWeeks
    } else {
        AvailabilityScore::Unknown
    }
}
