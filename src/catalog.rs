//! Product catalog client
//!
//! Fetches `GET <base_url>/products`, a JSON array of products. `ureq` is
//! blocking, so requests run on tokio's blocking pool.

use crate::cart::Product;
use crate::config::schema::CatalogConfig;
use crate::error::{MarketError, MarketResult};
use std::time::Duration;
use tracing::debug;

/// HTTP client for the product catalog
#[derive(Clone)]
pub struct CatalogClient {
    base_url: String,
    agent: ureq::Agent,
}

impl CatalogClient {
    /// Create a client from the `[catalog]` config section
    pub fn new(config: &CatalogConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    /// URL of the products resource
    pub fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    /// Fetch the full product list
    pub async fn fetch_products(&self) -> MarketResult<Vec<Product>> {
        let agent = self.agent.clone();
        let url = self.products_url();

        tokio::task::spawn_blocking(move || fetch_blocking(&agent, &url))
            .await
            .map_err(|e| MarketError::Internal(format!("catalog request task failed: {}", e)))?
    }

    /// Fetch the catalog and return the product with `id`
    pub async fn find(&self, id: &str) -> MarketResult<Product> {
        let products = self.fetch_products().await?;
        find_product(&products, id)
            .cloned()
            .ok_or_else(|| MarketError::ProductNotFound(id.to_string()))
    }
}

fn fetch_blocking(agent: &ureq::Agent, url: &str) -> MarketResult<Vec<Product>> {
    debug!("GET {}", url);

    let mut response = agent.get(url).call().map_err(|e| match e {
        ureq::Error::StatusCode(status) => MarketError::CatalogStatus {
            url: url.to_string(),
            status,
        },
        other => MarketError::CatalogRequest {
            url: url.to_string(),
            reason: other.to_string(),
        },
    })?;

    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| MarketError::CatalogRequest {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let products = parse_products(url, &body)?;
    debug!("Catalog returned {} product(s)", products.len());
    Ok(products)
}

/// Decode a products response body
pub fn parse_products(url: &str, body: &str) -> MarketResult<Vec<Product>> {
    serde_json::from_str(body).map_err(|source| MarketError::CatalogDecode {
        url: url.to_string(),
        source,
    })
}

/// First product with `id`
pub fn find_product<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|product| product.id == id)
}
