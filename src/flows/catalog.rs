//! Catalog browser: a stateless query projection over the product list.
//!
//! The only query state is (search term, category filter), kept in sync
//! with a shareable query string so a bookmarked URL reproduces the same
//! result set.

use std::sync::Arc;

use crate::dto::products::{CategoryFilter, ProductQuery};
use crate::gateway::MarketGateway;
use crate::models::Product;

/// Serialize the query for the address bar. Defaults are omitted, so an
/// unfiltered view maps to an empty string.
pub fn query_string(query: &ProductQuery) -> String {
    let mut params: Vec<(&str, &str)> = Vec::new();
    if let CategoryFilter::Only(category) = query.category {
        params.push(("category", category.as_str()));
    }
    if !query.search.is_empty() {
        params.push(("search", &query.search));
    }
    serde_urlencoded::to_string(params).unwrap_or_default()
}

/// Restore query state from a query string. Unknown keys and unknown
/// category names fall back to the defaults.
pub fn parse_query_string(raw: &str) -> ProductQuery {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(raw.trim_start_matches('?')).unwrap_or_default();
    let mut query = ProductQuery::default();
    for (key, value) in pairs {
        match key.as_str() {
            "category" => {
                query.category = CategoryFilter::parse(&value).unwrap_or_default();
            }
            "search" => query.search = value,
            _ => {}
        }
    }
    query
}

pub struct CatalogBrowser<G> {
    gateway: Arc<G>,
    query: ProductQuery,
    products: Vec<Product>,
}

impl<G: MarketGateway> CatalogBrowser<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            query: ProductQuery::default(),
            products: Vec::new(),
        }
    }

    pub fn query(&self) -> &ProductQuery {
        &self.query
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn query_string(&self) -> String {
        query_string(&self.query)
    }

    /// Replace the query and re-fetch, as when either input changes.
    pub async fn apply(&mut self, query: ProductQuery) {
        self.query = query;
        self.reload().await;
    }

    /// Navigate to a (possibly shared) URL query string.
    pub async fn apply_query_string(&mut self, raw: &str) {
        self.apply(parse_query_string(raw)).await;
    }

    pub async fn search(&mut self, term: impl Into<String>) {
        let query = ProductQuery {
            search: term.into(),
            category: self.query.category,
        };
        self.apply(query).await;
    }

    pub async fn select_category(&mut self, category: CategoryFilter) {
        let query = ProductQuery {
            search: self.query.search.clone(),
            category,
        };
        self.apply(query).await;
    }

    /// Read failure degrades to an empty result set.
    pub async fn reload(&mut self) {
        match self.gateway.list_products(&self.query).await {
            Ok(products) => self.products = products,
            Err(err) => {
                tracing::warn!(error = %err, "product fetch failed");
                self.products.clear();
            }
        }
    }
}

impl<G> std::fmt::Debug for CatalogBrowser<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogBrowser")
            .field("query", &self.query)
            .field("products", &self.products.len())
            .finish()
    }
}
