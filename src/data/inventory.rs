use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use crate::data::types::{Item, ItemExterior, ItemType};

pub const DEFAULT_COMMUNITY_URL: &str = "https://steamcommunity.com";

/// CS2 app id and the context that holds its tradable items
const CSGO_APPID: u32 = 730;
const CSGO_CONTEXTID: &str = "2";
const PAGE_SIZE: u32 = 2000;

pub struct InventoryClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct InventoryResponse {
    #[serde(default)]
    assets: Vec<Asset>,
    #[serde(default)]
    descriptions: Vec<Description>,
    #[serde(default)]
    total_inventory_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    appid: u32,
    contextid: String,
    assetid: String,
    classid: String,
    instanceid: String,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct Description {
    classid: String,
    instanceid: String,
    market_hash_name: String,
    #[serde(default)]
    tradable: u8,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    category: String,
    localized_tag_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Asset {0} has no matching description")]
    MissingDescription(String),

    #[error("Invalid {field} on asset {assetid}: {value}")]
    InvalidNumber {
        assetid: String,
        field: &'static str,
        value: String,
    },
}

impl InventoryClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch a public CS2 inventory. Only the first page is requested.
    pub async fn fetch_inventory(&self, steam_id64: &str) -> Result<Vec<Item>> {
        let url = format!(
            "{}/inventory/{}/{}/{}?l=english&count={}",
            self.base_url, steam_id64, CSGO_APPID, CSGO_CONTEXTID, PAGE_SIZE
        );

        let body = self.client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch inventory")?
            .error_for_status()
            .context("Inventory request returned an error status")?
            .text()
            .await
            .context("Failed to read inventory body")?;

        parse_inventory(&body)
    }
}

/// Load an inventory document saved to disk
pub fn load_inventory_file(path: impl AsRef<Path>) -> Result<Vec<Item>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read inventory file: {}", path.display()))?;

    parse_inventory(&contents)
}

/// Convert a Steam inventory document into tradable items
pub fn parse_inventory(body: &str) -> Result<Vec<Item>> {
    let response: InventoryResponse = serde_json::from_str(body)
        .context("Failed to parse inventory response")?;

    let descriptions: HashMap<(&str, &str), &Description> = response.descriptions
        .iter()
        .map(|d| ((d.classid.as_str(), d.instanceid.as_str()), d))
        .collect();

    let names = MarketNameParser::new()?;
    let mut items = Vec::with_capacity(response.assets.len());

    for asset in &response.assets {
        let description = descriptions
            .get(&(asset.classid.as_str(), asset.instanceid.as_str()))
            .ok_or_else(|| InventoryError::MissingDescription(asset.assetid.clone()))?;

        if description.tradable == 0 {
            debug!("Skipping untradable item: {}", description.market_hash_name);
            continue;
        }

        items.push(convert_asset(&names, asset, description)?);
    }

    info!(
        "Parsed {} tradable items ({} assets, {} reported by Steam)",
        items.len(),
        response.assets.len(),
        response.total_inventory_count.unwrap_or(response.assets.len() as u64)
    );

    Ok(items)
}

fn convert_asset(names: &MarketNameParser, asset: &Asset, description: &Description) -> Result<Item> {
    let assetid = parse_number(&asset.assetid, "assetid", &asset.assetid)?;
    let amount = parse_number(&asset.assetid, "amount", &asset.amount)?;

    let (base_name, suffix_exterior) = names.split(&description.market_hash_name)?;

    // "Not Painted" and other unknown labels leave the field unset
    let tag_exterior = tag_value(description, "Exterior").and_then(|t| t.parse::<ItemExterior>().ok());
    let item_type = tag_value(description, "Type").and_then(|t| t.parse::<ItemType>().ok());

    let mut item = Item::new(base_name, asset.appid, asset.contextid.clone(), amount, assetid);
    if let Some(exterior) = tag_exterior.or(suffix_exterior) {
        item = item.with_exterior(exterior);
    }
    if let Some(item_type) = item_type {
        item = item.with_type(item_type);
    }

    Ok(item)
}

fn tag_value<'a>(description: &'a Description, category: &str) -> Option<&'a str> {
    description.tags
        .iter()
        .find(|tag| tag.category == category)
        .map(|tag| tag.localized_tag_name.as_str())
}

fn parse_number<T: std::str::FromStr>(assetid: &str, field: &'static str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        InventoryError::InvalidNumber {
            assetid: assetid.to_string(),
            field,
            value: value.to_string(),
        }
        .into()
    })
}

/// Splits `AK-47 | Redline (Field-Tested)` into its base name and exterior.
/// Compiled once per inventory.
pub struct MarketNameParser {
    re: regex::Regex,
}

impl MarketNameParser {
    pub fn new() -> Result<Self> {
        let re = regex::Regex::new(
            r"^(.+) \((Factory New|Minimal Wear|Field-Tested|Well-Worn|Battle-Scarred)\)$",
        )?;

        Ok(Self { re })
    }

    /// Names without a wear suffix are returned whole
    pub fn split(&self, market_hash_name: &str) -> Result<(String, Option<ItemExterior>)> {
        if let Some(cap) = self.re.captures(market_hash_name) {
            let exterior = cap[2].parse::<ItemExterior>()?;
            Ok((cap[1].to_string(), Some(exterior)))
        } else {
            Ok((market_hash_name.to_string(), None))
        }
    }
}
