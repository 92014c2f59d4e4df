use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Returned by `PriceCatalog::lookup` when no price can be resolved.
/// Never a real traded price.
pub const UNKNOWN_PRICE: f64 = -1.0;

/// One entry of the feed's `items_list`. Only the medians are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceRecord {
    #[serde(default)]
    pub price: Option<PriceWindows>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceWindows {
    #[serde(rename = "24_hours", default)]
    pub last_24_hours: Option<WindowStats>,
    #[serde(rename = "7_days", default)]
    pub last_7_days: Option<WindowStats>,
    #[serde(rename = "30_days", default)]
    pub last_30_days: Option<WindowStats>,
    #[serde(default)]
    pub all_time: Option<WindowStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowStats {
    #[serde(default)]
    pub median: Option<f64>,
}

impl PriceWindows {
    /// Median of the first window present, in the order
    /// 30 days, all time, 7 days, 24 hours.
    ///
    /// Medians are used over averages so a few extreme undercuts or
    /// overpriced sales don't skew the result.
    pub fn representative_median(&self) -> Option<f64> {
        [
            &self.last_30_days,
            &self.all_time,
            &self.last_7_days,
            &self.last_24_hours,
        ]
        .into_iter()
        .flatten()
        .find_map(|window| window.median)
    }
}

/// Read-only snapshot of market name -> price statistics.
///
/// Built once from the feed and shared behind an `Arc`; nothing mutates it
/// after construction.
#[derive(Debug, Clone)]
pub struct PriceCatalog {
    entries: HashMap<String, PriceRecord>,
    fetched_at: DateTime<Utc>,
}

impl PriceCatalog {
    pub fn new(entries: HashMap<String, PriceRecord>, fetched_at: DateTime<Utc>) -> Self {
        Self { entries, fetched_at }
    }

    /// Build a catalog from an already-parsed `items_list` value
    #[cfg(test)]
    pub fn from_json(items_list: serde_json::Value, fetched_at: DateTime<Utc>) -> serde_json::Result<Self> {
        let entries: HashMap<String, PriceRecord> = serde_json::from_value(items_list)?;
        Ok(Self::new(entries, fetched_at))
    }

    /// Representative price of a market name, `None` if the feed has no
    /// usable price for it
    pub fn median_price(&self, market_name: &str) -> Option<f64> {
        self.entries
            .get(market_name)?
            .price
            .as_ref()?
            .representative_median()
    }

    /// Same as `median_price`, with `UNKNOWN_PRICE` standing in for `None`
    pub fn lookup(&self, market_name: &str) -> f64 {
        self.median_price(market_name).unwrap_or(UNKNOWN_PRICE)
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
