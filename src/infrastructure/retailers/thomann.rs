//! Thomann: listing pages carry their data as a JSON object inside a script

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::ensure_page_in_bounds;
use crate::domain::{AvailabilityScore, Product, ProductResponse, RequestOptions, Retailer};
use crate::infrastructure::config::retailer_urls;
use crate::infrastructure::errors::{RetailerError, RetailerResult};
use crate::infrastructure::simple_http_client::PageFetcher;

const RETAILER_NAME: &str = "Thomann";

const CATEGORIES: &[&str] = &[
    "linkshaender_e-gitarren.html",
    "linkshaender_westerngitarren.html",
    "linkshaender_konzertgitarren.html",
    "4_saitige_linkshaender_e-baesse.html",
    "5_saitige_linkshaender_e-baesse.html",
    "6_saitige_linkshaender_e-baesse.html",
];

/// Page sizes the shop accepts; anything else gets the largest one
const PAGE_SIZES: [u32; 3] = [25, 50, 100];
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Listing state object, terminated by the start of the next array element
const LISTING_STATE_PATTERN: &str = r#"(?s)(\{"headline":.+?"\})\], \{"general"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingState {
    #[serde(default)]
    headline: String,
    article_lists_settings: ArticleListsSettings,
}

#[derive(Debug, Deserialize)]
struct ArticleListsSettings {
    #[serde(default)]
    articles: Vec<Article>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    current_page: u32,
    last_page: u32,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    manufacturer: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    availability: ArticleAvailability,
    #[serde(default)]
    price: ArticlePrice,
    #[serde(default)]
    link: String,
    #[serde(default)]
    image: ArticleImage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleAvailability {
    #[serde(default)]
    is_available: bool,
    #[serde(default)]
    text: String,
    #[serde(default)]
    status: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ArticlePrice {
    #[serde(default)]
    primary: PrimaryPrice,
}

#[derive(Debug, Default, Deserialize)]
struct PrimaryPrice {
    #[serde(default)]
    raw: String,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleImage {
    #[serde(default)]
    fname: String,
    #[serde(default)]
    exists: bool,
}

pub struct Thomann {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    thumbnail_base_url: String,
    listing_state: Regex,
}

impl Thomann {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Self::with_base_url(fetcher, retailer_urls::THOMANN_BASE)
    }

    pub fn with_base_url(fetcher: Arc<dyn PageFetcher>, base_url: &str) -> Result<Self> {
        let listing_state =
            Regex::new(LISTING_STATE_PATTERN).context("Failed to compile listing state pattern")?;

        Ok(Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            thumbnail_base_url: retailer_urls::THOMANN_THUMBNAIL_BASE.to_string(),
            listing_state,
        })
    }

    fn listing_url(&self, category: &str, options: RequestOptions) -> String {
        format!(
            "{}/{}?ls={}&pg={}",
            self.base_url,
            category,
            page_size(options.products_per_page),
            options.normalized_page()
        )
    }

    fn parse_listing(
        &self,
        html: &str,
        category: &str,
        requested_page: u32,
    ) -> RetailerResult<ProductResponse> {
        let json = self
            .listing_state
            .captures(html)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| {
                RetailerError::parse(RETAILER_NAME, format!("no listing data in '{}'", category))
            })?
            .as_str();

        let state: ListingState = serde_json::from_str(json).map_err(|e| {
            RetailerError::parse(RETAILER_NAME, format!("invalid listing data: {}", e))
        })?;

        let pagination = &state.article_lists_settings.pagination;
        ensure_page_in_bounds(category, requested_page, pagination.last_page)?;

        let products: Vec<Product> = state
            .article_lists_settings
            .articles
            .iter()
            .map(|article| self.to_product(article, &state.headline))
            .collect();

        debug!(
            "{} '{}' page {}/{}: {} products",
            RETAILER_NAME,
            category,
            pagination.current_page,
            pagination.last_page,
            products.len()
        );

        Ok(ProductResponse {
            products,
            current_page: pagination.current_page,
            last_page: pagination.last_page,
        })
    }

    fn to_product(&self, article: &Article, category: &str) -> Product {
        let thumbnail_url = if article.image.exists {
            format!("{}/{}", self.thumbnail_base_url, article.image.fname)
        } else {
            String::new()
        };

        Product {
            retailer: RETAILER_NAME.to_string(),
            manufacturer: article.manufacturer.clone(),
            model: article.name.clone(),
            category: category.to_string(),
            is_available: article.availability.is_available,
            availability_info: article.availability.text.clone(),
            availability_score: availability_from_status(article.availability.status),
            price: article.price.primary.raw.trim().parse().unwrap_or(0.0),
            product_url: article.link.clone(),
            thumbnail_url,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Retailer for Thomann {
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
        let url = self.listing_url(category, options);

        let html = self
            .fetcher
            .fetch_html_string(&url)
            .await
            .map_err(|e| RetailerError::fetch(RETAILER_NAME, e))?;

        self.parse_listing(&html, category, options.normalized_page())
    }
}

fn page_size(requested: u32) -> u32 {
    if PAGE_SIZES.contains(&requested) {
        requested
    } else {
        DEFAULT_PAGE_SIZE
    }
}

fn availability_from_status(status: i64) -> AvailabilityScore {
    match status {
        1 => AvailabilityScore::Available,
        2 => AvailabilityScore::WithinDays,
        4 => AvailabilityScore::WithinWeeks,
        _ => AvailabilityScore::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::retailers::test_support::FixtureFetcher;
    use rstest::rstest;

    const SIX_STRINGS: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/thomann_basses_six_strings.html"
    ));
    const FOUR_STRINGS_SECOND_PAGE: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/thomann_basses_four_strings_second_page.html"
    ));
    const WITHOUT_LISTING_STATE: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/thomann_without_listing_state.html"
    ));

    fn retailer_with(body: &str) -> (Arc<FixtureFetcher>, Thomann) {
        let fetcher = Arc::new(FixtureFetcher::new(body));
        let retailer = Thomann::new(fetcher.clone()).unwrap();
        (fetcher, retailer)
    }

    #[tokio::test]
    async fn test_load_products() {
        let (_, retailer) = retailer_with(SIX_STRINGS);

        let response = retailer
            .load_products("6_saitige_linkshaender_e-baesse.html", RequestOptions::default())
            .await
            .unwrap();

        assert_eq!(response.current_page, 1);
        assert_eq!(response.last_page, 1);
        assert_eq!(response.products.len(), 2);

        let esp = &response.products[0];
        assert_eq!(esp.retailer, "Thomann");
        assert_eq!(esp.manufacturer, "ESP");
        assert_eq!(esp.model, "LTD B206SM Natural Satin Left");
        assert_eq!(esp.category, "6 saitige Linkshänder E-Bässe");
        assert!(esp.is_available);
        assert_eq!(esp.availability_info, "In 4–5 Wochen lieferbar");
        assert_eq!(esp.availability_score, AvailabilityScore::WithinWeeks);
        assert_eq!(esp.price, 599.0);
        assert_eq!(
            esp.product_url,
            "https://www.thomann.de/de/esp_ltd_b206sm_natural_satin_left_443915.htm?listPosition=0"
        );
        assert_eq!(
            esp.thumbnail_url,
            "https://thumbs.static-thomann.de/thumb/thumb220x220/pics/prod/443915.jpg"
        );

        assert_eq!(response.products[1].manufacturer, "Warwick");
        assert_eq!(response.products[1].price, 925.0);
    }

    #[tokio::test]
    async fn test_article_quirks() {
        let (_, retailer) = retailer_with(FOUR_STRINGS_SECOND_PAGE);

        let response = retailer
            .load_products("4_saitige_linkshaender_e-baesse.html", RequestOptions::for_page(2))
            .await
            .unwrap();

        assert_eq!(response.current_page, 2);
        assert_eq!(response.last_page, 5);

        let scores: Vec<AvailabilityScore> = response
            .products
            .iter()
            .map(|p| p.availability_score)
            .collect();
        assert_eq!(
            scores,
            vec![
                AvailabilityScore::Available,
                AvailabilityScore::WithinDays,
                AvailabilityScore::Unknown
            ]
        );

        // missing image
        assert_eq!(response.products[1].manufacturer, "Harley Benton");
        assert_eq!(response.products[1].thumbnail_url, "");

        // price on request
        let sandberg = &response.products[2];
        assert!(!sandberg.is_available);
        assert_eq!(sandberg.price, 0.0);
    }

    #[rstest]
    #[case(RequestOptions::default(), "?ls=100&pg=1")]
    #[case(RequestOptions::for_page(2), "?ls=100&pg=2")]
    #[case(RequestOptions { page: 1, products_per_page: 25 }, "?ls=25&pg=1")]
    #[case(RequestOptions { page: 3, products_per_page: 50 }, "?ls=50&pg=3")]
    #[case(RequestOptions { page: 1, products_per_page: 30 }, "?ls=100&pg=1")]
    #[tokio::test]
    async fn test_listing_url(#[case] options: RequestOptions, #[case] expected_suffix: &str) {
        let (fetcher, retailer) = retailer_with(FOUR_STRINGS_SECOND_PAGE);

        retailer
            .load_products("4_saitige_linkshaender_e-baesse.html", options)
            .await
            .unwrap();

        assert_eq!(
            fetcher.last_url().unwrap(),
            format!(
                "https://www.thomann.de/de/4_saitige_linkshaender_e-baesse.html{}",
                expected_suffix
            )
        );
    }

    #[tokio::test]
    async fn test_page_out_of_bounds() {
        let (_, retailer) = retailer_with(FOUR_STRINGS_SECOND_PAGE);

        let result = retailer
            .load_products("4_saitige_linkshaender_e-baesse.html", RequestOptions::for_page(1337))
            .await;

        assert!(matches!(
            result,
            Err(RetailerError::PageOutOfBounds { requested: 1337, last_page: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_listing_state() {
        let (_, retailer) = retailer_with(WITHOUT_LISTING_STATE);

        let result = retailer
            .load_products("linkshaender_e-gitarren.html", RequestOptions::default())
            .await;

        assert!(matches!(result, Err(RetailerError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_malformed_listing_state() {
        let html = r#"<script>var s = [{"headline":"E-Gitarren","articleListsSettings":"x"}], {"general":{}};</script>"#;
        let (_, retailer) = retailer_with(html);

        let result = retailer
            .load_products("linkshaender_e-gitarren.html", RequestOptions::default())
            .await;

        assert!(matches!(result, Err(RetailerError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_article_without_names_keeps_the_page() {
        let html = r#"<script>var s = [{"headline":"E-Gitarren","articleListsSettings":{"articles":[{"availability":{"isAvailable":true,"text":"Sofort lieferbar","status":1},"price":{"primary":{"raw":"249"}},"link":"https://www.thomann.de/de/x.htm"},{"manufacturer":"Ibanez","name":"GRG170DXL","price":{"primary":{"raw":"299"}}}],"pagination":{"currentPage":1,"lastPage":1}},"listId":"lh"}], {"general":{}};</script>"#;
        let (_, retailer) = retailer_with(html);

        let response = retailer
            .load_products("linkshaender_e-gitarren.html", RequestOptions::default())
            .await
            .unwrap();

        assert_eq!(response.products.len(), 2);
        assert_eq!(response.products[0].manufacturer, "");
        assert_eq!(response.products[0].model, "");
        assert_eq!(response.products[0].price, 249.0);
        assert_eq!(response.products[1].manufacturer, "Ibanez");
        assert_eq!(response.products[1].availability_score, AvailabilityScore::Unknown);
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let retailer = Thomann::new(Arc::new(FixtureFetcher::unavailable())).unwrap();

        let result = retailer
            .load_products("linkshaender_e-gitarren.html", RequestOptions::default())
            .await;

        assert!(matches!(result, Err(RetailerError::Fetch { .. })));
    }

    #[rstest]
    #[case(1, AvailabilityScore::Available)]
    #[case(2, AvailabilityScore::WithinDays)]
    #[case(3, AvailabilityScore::Unknown)]
    #[case(4, AvailabilityScore::WithinWeeks)]
    #[case(0, AvailabilityScore::Unknown)]
    fn test_availability_from_status(#[case] status: i64, #[case] expected: AvailabilityScore) {
        assert_eq!(availability_from_status(status), expected);
    }
}
