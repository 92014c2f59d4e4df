use std::sync::Arc;
use tracing::{debug, info};
use crate::config::Options;
use crate::data::catalog::PriceCatalog;
use crate::data::types::{Item, ItemType, TradeAsset};
use crate::trading::eligibility::{evaluate, should_be_traded, TradeDecision};

/// Outcome for a single inventory item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDecision {
    pub assetid: u64,
    pub market_name: String,
    pub item_type: Option<ItemType>,
    pub decision: TradeDecision,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradePlan {
    /// Assets to put in the offer, in inventory order
    pub assets: Vec<TradeAsset>,
    /// One entry per item, traded or not
    pub decisions: Vec<ItemDecision>,
    pub overridden: usize,
    pub below_min_price: usize,
    pub unknown_price: usize,
    pub kept: usize,
}

impl TradePlan {
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Items staying in the inventory
    pub fn kept_items(&self) -> impl Iterator<Item = &ItemDecision> {
        self.decisions.iter().filter(|d| !d.decision.is_eligible())
    }

    /// Sum of known prices of the items being traded. Overridden items
    /// are not priced and don't count.
    pub fn total_value(&self) -> f64 {
        self.decisions
            .iter()
            .filter(|d| d.decision.is_eligible())
            .filter_map(|d| d.decision.price())
            .sum()
    }

    fn record(&mut self, item: &Item, decision: TradeDecision) {
        match decision {
            TradeDecision::Override(_) => self.overridden += 1,
            TradeDecision::BelowMinPrice(_) => self.below_min_price += 1,
            TradeDecision::UnknownPrice => {
                self.unknown_price += 1;
                self.kept += 1;
            }
            TradeDecision::AtOrAboveMinPrice(_) => self.kept += 1,
        }

        self.decisions.push(ItemDecision {
            assetid: item.assetid,
            market_name: item.market_name(),
            item_type: item.item_type,
            decision,
        });
    }
}

/// Runs the eligibility policy over a whole inventory.
///
/// Holds a shared snapshot of the catalog; every item in a plan is priced
/// against the same snapshot.
#[derive(Debug, Clone)]
pub struct TradePlanner {
    catalog: Arc<PriceCatalog>,
    options: Options,
}

impl TradePlanner {
    pub fn new(catalog: Arc<PriceCatalog>, options: Options) -> Self {
        Self { catalog, options }
    }

    pub fn plan(&self, items: &[Item]) -> TradePlan {
        let mut plan = TradePlan::default();

        for item in items {
            if should_be_traded(item, &self.options, &self.catalog) {
                plan.assets.push(item.trade_asset());
            }

            let decision = evaluate(item, &self.options, &self.catalog);
            debug!(
                "{} [{}{}]: {}",
                item.market_name(),
                item.item_type.map_or("Unclassified", |t| t.label()),
                if item.is_weapon() { ", weapon" } else { "" },
                decision
            );
            plan.record(item, decision);
        }

        info!(
            "Trade plan: {} of {} items to trade ({} by override, {} below ${:.2}), {} kept ({} without price)",
            plan.assets.len(),
            items.len(),
            plan.overridden,
            plan.below_min_price,
            self.options.min_price,
            plan.kept,
            plan.unknown_price
        );

        plan
    }
}
