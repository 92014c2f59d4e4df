use std::fmt;
use crate::config::Options;
use crate::data::catalog::{PriceCatalog, UNKNOWN_PRICE};
use crate::data::types::{Item, ItemType};

/// Why an item was or wasn't picked for trading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradeDecision {
    /// Category has an always-trade flag set; price is never consulted
    Override(ItemType),
    BelowMinPrice(f64),
    AtOrAboveMinPrice(f64),
    /// Feed has no usable price for the item
    UnknownPrice,
}

impl TradeDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, TradeDecision::Override(_) | TradeDecision::BelowMinPrice(_))
    }

    /// Price the decision was based on, if one was looked up and known
    pub fn price(&self) -> Option<f64> {
        match self {
            TradeDecision::BelowMinPrice(price) | TradeDecision::AtOrAboveMinPrice(price) => Some(*price),
            TradeDecision::Override(_) | TradeDecision::UnknownPrice => None,
        }
    }
}

impl fmt::Display for TradeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDecision::Override(item_type) => write!(f, "override({})", item_type),
            TradeDecision::BelowMinPrice(price) => write!(f, "below_min_price(${:.2})", price),
            TradeDecision::AtOrAboveMinPrice(price) => write!(f, "above_min_price(${:.2})", price),
            TradeDecision::UnknownPrice => write!(f, "unknown_price"),
        }
    }
}

impl Options {
    /// Whether the category has its always-trade flag set. Weapon skins
    /// have no override and always go through the price check.
    pub fn always_trades(&self, item_type: ItemType) -> bool {
        match item_type {
            ItemType::Graffiti => self.always_trade_graffities,
            ItemType::Sticker => self.always_trade_stickers,
            ItemType::Agent => self.always_trade_agents,
            ItemType::Container => self.always_trade_containers,
            ItemType::Collectible => self.always_trade_collectibles,
            ItemType::Patch => self.always_trade_patches,
            ItemType::Knife
            | ItemType::Gloves
            | ItemType::Pistol
            | ItemType::Rifle
            | ItemType::SniperRifle
            | ItemType::Shotgun
            | ItemType::Smg
            | ItemType::Machinegun => false,
        }
    }
}

/// Decide whether an item should go into the trade, and why.
///
/// Category overrides are checked first. Everything else is traded only
/// when its price is known and strictly below `min_price`.
pub fn evaluate(item: &Item, options: &Options, catalog: &PriceCatalog) -> TradeDecision {
    if let Some(item_type) = item.item_type {
        if options.always_trades(item_type) {
            return TradeDecision::Override(item_type);
        }
    }

    // A missing price is most likely a feed gap, not a worthless item
    let price = item.price(catalog);
    if price == UNKNOWN_PRICE {
        TradeDecision::UnknownPrice
    } else if price < options.min_price {
        TradeDecision::BelowMinPrice(price)
    } else {
        TradeDecision::AtOrAboveMinPrice(price)
    }
}

pub fn should_be_traded(item: &Item, options: &Options, catalog: &PriceCatalog) -> bool {
    evaluate(item, options, catalog).is_eligible()
}
