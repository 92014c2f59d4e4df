use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use crate::data::inventory::DEFAULT_COMMUNITY_URL;
use crate::data::price_feed::DEFAULT_FEED_URL;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub options: Options,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

/// Trade policy. Every key is required, there are no implicit defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Options {
    pub min_price: f64,
    pub always_trade_graffities: bool,
    pub always_trade_stickers: bool,
    pub always_trade_agents: bool,
    pub always_trade_containers: bool,
    pub always_trade_collectibles: bool,
    pub always_trade_patches: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub url: String,
    #[serde(default = "default_feed_timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_feed_timeout(),
        }
    }
}

fn default_feed_url() -> String { DEFAULT_FEED_URL.to_string() }
fn default_feed_timeout() -> u64 { 60 }

/// Where the inventory comes from: a public Steam profile or a saved file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryConfig {
    #[serde(default)]
    pub steam_id64: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub csv_logging: bool,
    #[serde(default = "default_csv_log_path")]
    pub csv_log_path: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            csv_logging: false,
            csv_log_path: default_csv_log_path(),
        }
    }
}

fn default_csv_log_path() -> String { "decisions.csv".to_string() }

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub config_path: String,
    pub price_feed_url: Option<String>,
    pub steam_community_url: String,
    pub steam_id64: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let min_price = self.options.min_price;
        if !min_price.is_finite() || min_price < 0.0 {
            anyhow::bail!("min-price must be a non-negative number, got {}", min_price);
        }

        if self.inventory.steam_id64.is_none() && self.inventory.path.is_none() {
            anyhow::bail!("[inventory] needs either steam_id64 or path");
        }

        Ok(())
    }

    /// Environment values win over the file
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.price_feed_url {
            self.feed.url = url.clone();
        }
        if let Some(steam_id64) = &env.steam_id64 {
            self.inventory.steam_id64 = Some(steam_id64.clone());
        }
    }
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            config_path: std::env::var("CONFIG_PATH")
                .unwrap_or_else(|_| "config.toml".to_string()),
            price_feed_url: std::env::var("PRICE_FEED_URL").ok(),
            steam_community_url: std::env::var("STEAM_COMMUNITY_URL")
                .unwrap_or_else(|_| DEFAULT_COMMUNITY_URL.to_string()),
            steam_id64: std::env::var("STEAM_ID64").ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: &str = r#"
        [options]
        min-price = 0.5
        always-trade-graffities = true
        always-trade-stickers = false
        always-trade-agents = false
        always-trade-containers = true
        always-trade-collectibles = false
        always-trade-patches = false
    "#;

    #[test]
    fn test_parse_full_config() {
        let contents = format!(
            r#"{}
            [feed]
            url = "http://localhost:8080/prices"
            timeout_secs = 5

            [inventory]
            steam_id64 = "76561198000000000"

            [monitoring]
            csv_logging = true
            csv_log_path = "/tmp/decisions.csv"
            "#,
            OPTIONS
        );

        let config = Config::parse(&contents).unwrap();
        config.validate().unwrap();

        assert_eq!(config.options.min_price, 0.5);
        assert!(config.options.always_trade_graffities);
        assert!(config.options.always_trade_containers);
        assert!(!config.options.always_trade_patches);
        assert_eq!(config.feed.url, "http://localhost:8080/prices");
        assert_eq!(config.feed.timeout_secs, 5);
        assert_eq!(config.inventory.steam_id64.as_deref(), Some("76561198000000000"));
        assert!(config.monitoring.csv_logging);
    }

    #[test]
    fn test_defaults_outside_options() {
        let contents = format!("{}\n[inventory]\npath = \"inventory.json\"\n", OPTIONS);
        let config = Config::parse(&contents).unwrap();

        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.feed.timeout_secs, 60);
        assert!(!config.monitoring.csv_logging);
        assert_eq!(config.monitoring.csv_log_path, "decisions.csv");
    }

    #[test]
    fn test_missing_option_is_rejected() {
        let contents = r#"
            [options]
            min-price = 0.5
            always-trade-graffities = true

            [inventory]
            path = "inventory.json"
        "#;

        assert!(Config::parse(contents).is_err());
    }

    #[test]
    fn test_negative_min_price_is_rejected() {
        let contents = OPTIONS.replace("min-price = 0.5", "min-price = -2.0")
            + "\n[inventory]\npath = \"inventory.json\"\n";

        let config = Config::parse(&contents).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min-price"));
    }

    #[test]
    fn test_inventory_source_required() {
        let contents = format!("{}\n[inventory]\n", OPTIONS);
        let mut config = Config::parse(&contents).unwrap();
        assert!(config.validate().is_err());

        config.apply_env(&EnvConfig {
            config_path: "config.toml".to_string(),
            price_feed_url: None,
            steam_community_url: DEFAULT_COMMUNITY_URL.to_string(),
            steam_id64: Some("76561198000000000".to_string()),
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let contents = format!("{}\n[inventory]\nsteam_id64 = \"1\"\n", OPTIONS);
        let mut config = Config::parse(&contents).unwrap();

        config.apply_env(&EnvConfig {
            config_path: "config.toml".to_string(),
            price_feed_url: Some("http://mirror/prices".to_string()),
            steam_community_url: DEFAULT_COMMUNITY_URL.to_string(),
            steam_id64: Some("2".to_string()),
        });

        assert_eq!(config.feed.url, "http://mirror/prices");
        assert_eq!(config.inventory.steam_id64.as_deref(), Some("2"));
    }
}
