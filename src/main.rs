mod config;
mod data;
mod monitoring;
mod trading;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use config::{Config, EnvConfig};
use data::inventory::{load_inventory_file, InventoryClient};
use data::price_feed::PriceFeedClient;
use monitoring::logger::CsvLogger;
use trading::planner::TradePlanner;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Steam inventory manager starting...");

    // Load configuration
    let env_config = EnvConfig::load()?;
    tracing::info!("Loading configuration from {}", env_config.config_path);
    let mut config = Config::load(&env_config.config_path)?;
    config.apply_env(&env_config);
    config.validate()?;

    tracing::info!("Minimum price: ${:.2}", config.options.min_price);
    tracing::info!("Always trade graffiti: {}", config.options.always_trade_graffities);
    tracing::info!("Always trade stickers: {}", config.options.always_trade_stickers);
    tracing::info!("Always trade agents: {}", config.options.always_trade_agents);
    tracing::info!("Always trade containers: {}", config.options.always_trade_containers);
    tracing::info!("Always trade collectibles: {}", config.options.always_trade_collectibles);
    tracing::info!("Always trade patches: {}", config.options.always_trade_patches);

    // Snapshot the price feed once; it is not refreshed for the rest of the run
    let feed = PriceFeedClient::new(
        config.feed.url.clone(),
        Duration::from_secs(config.feed.timeout_secs),
    )?;
    let catalog = Arc::new(feed.fetch_catalog().await?);
    tracing::info!("Price snapshot taken at {}", catalog.fetched_at().to_rfc3339());
    if catalog.is_empty() {
        tracing::warn!("Price feed is empty, only always-trade categories can be traded");
    }

    let items = match (&config.inventory.path, &config.inventory.steam_id64) {
        (Some(path), _) => {
            tracing::info!("Loading inventory from {}", path);
            load_inventory_file(path)?
        }
        (None, Some(steam_id64)) => {
            tracing::info!("Fetching inventory of {}", steam_id64);
            InventoryClient::new(env_config.steam_community_url.clone())
                .fetch_inventory(steam_id64)
                .await?
        }
        (None, None) => anyhow::bail!("No inventory source configured"),
    };

    let planner = TradePlanner::new(Arc::clone(&catalog), config.options.clone());
    let plan = planner.plan(&items);

    for kept in plan.kept_items() {
        tracing::debug!("Keeping {} ({})", kept.market_name, kept.decision);
    }

    if config.monitoring.csv_logging {
        let logger = CsvLogger::new(config.monitoring.csv_log_path.clone())?;
        logger.log_plan(&plan)?;
        tracing::info!("Decisions written to {}", config.monitoring.csv_log_path);
    }

    if plan.is_empty() {
        tracing::info!("Nothing to trade");
    } else {
        tracing::info!(
            "{} items ready to trade, worth ${:.2} at catalog prices",
            plan.assets.len(),
            plan.total_value()
        );
        // Hand-off to the trade offer sender
        println!("{}", serde_json::to_string_pretty(&plan.assets)?);
    }

    Ok(())
}
