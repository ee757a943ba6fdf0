//! Walks every category and page of one retailer

#![allow(clippy::uninlined_format_args)]

use tracing::{debug, info};

use crate::domain::{Product, RequestOptions, Retailer};
use crate::infrastructure::errors::RetailerResult;

/// Load every product of every category of `retailer`.
///
/// The last page reported by a category's first page bounds the walk. The
/// first failing request aborts the whole walk and discards what was loaded.
pub async fn load_all_products(retailer: &dyn Retailer) -> RetailerResult<Vec<Product>> {
    let mut products = Vec::new();

    for category in retailer.categories() {
        let first = retailer
            .load_products(&category, RequestOptions::for_page(1))
            .await?;
        let last_page = first.last_page;
        products.extend(first.products);

        for page in 2..=last_page {
            debug!("{} '{}': page {}/{}", retailer.name(), category, page, last_page);
            let response = retailer
                .load_products(&category, RequestOptions::for_page(page))
                .await?;
            products.extend(response.products);
        }
    }

    info!("{}: loaded {} products", retailer.name(), products.len());
    Ok(products)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::errors::RetailerError;
    use test_support::StubRetailer;

    #[tokio::test]
    async fn test_single_page_category() {
        let stub = StubRetailer::new("Thomann");
        let page = vec![stub.product("Fender", "Player Stratocaster LH", 699.0)];
        let retailer = stub.with_category("linkshaender_e-gitarren.html", vec![page]);

        let products = load_all_products(&retailer).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(
            retailer.requests(),
            vec![("linkshaender_e-gitarren.html".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_walks_all_pages_of_all_categories() {
        let stub = StubRetailer::new("Musik Produktiv");
        let guitars = vec![
            vec![stub.product("Fender", "A", 1.0), stub.product("Fender", "B", 2.0)],
            vec![stub.product("Gibson", "C", 3.0)],
            vec![stub.product("PRS", "D", 4.0)],
        ];
        let basses = vec![vec![stub.product("Warwick", "E", 5.0)]];
        let retailer = stub
            .with_category("e-gitarre-linkshaender", guitars)
            .with_category("e-bass-linkshaender", basses);

        let products = load_all_products(&retailer).await.unwrap();

        let models: Vec<&str> = products.iter().map(|p| p.model.as_str()).collect();
        assert_eq!(models, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(retailer.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_first_failure_aborts_the_walk() {
        let stub = StubRetailer::new("Thomann");
        let pages = vec![
            vec![stub.product("Fender", "A", 1.0)],
            vec![stub.product("Fender", "B", 2.0)],
            vec![stub.product("Fender", "C", 3.0)],
        ];
        let second = vec![vec![stub.product("Ibanez", "D", 4.0)]];
        let retailer = stub
            .with_category("linkshaender_e-gitarren.html", pages)
            .with_category("linkshaender_westerngitarren.html", second)
            .failing_at("linkshaender_e-gitarren.html", 2);

        let result = load_all_products(&retailer).await;

        assert!(matches!(result, Err(RetailerError::Fetch { .. })));
        // nothing after the failing page was requested
        assert_eq!(retailer.requests().len(), 2);
    }
}
