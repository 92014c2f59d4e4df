use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;
use crate::data::catalog::{PriceCatalog, PriceRecord};

pub const DEFAULT_FEED_URL: &str = "https://csgobackpack.net/api/GetItemsList/v2/";

pub struct PriceFeedClient {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    items_list: HashMap<String, PriceRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Price feed reported an unsuccessful response")]
    Unsuccessful,
}

impl PriceFeedClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, url })
    }

    /// Download the whole feed and snapshot it into a catalog
    pub async fn fetch_catalog(&self) -> Result<PriceCatalog> {
        info!("Fetching price feed from {}", self.url);

        let body = self.client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch price feed")?
            .error_for_status()
            .context("Price feed returned an error status")?
            .text()
            .await
            .context("Failed to read price feed body")?;

        let catalog = parse_feed(&body)?;
        info!("Price catalog loaded with {} entries", catalog.len());

        Ok(catalog)
    }
}

/// Parse a `GetItemsList/v2` response body into a catalog stamped with the
/// current time
pub fn parse_feed(body: &str) -> Result<PriceCatalog> {
    let response: FeedResponse = serde_json::from_str(body)
        .context("Failed to parse price feed response")?;

    if !response.success {
        return Err(FeedError::Unsuccessful.into());
    }

    Ok(PriceCatalog::new(response.items_list, Utc::now()))
}
