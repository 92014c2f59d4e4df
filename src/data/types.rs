use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::data::catalog::PriceCatalog;

/// Wear grade of a skin, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemExterior {
    FactoryNew,
    MinimalWear,
    FieldTested,
    WellWorn,
    BattleScarred,
}

impl ItemExterior {
    pub const ALL: [ItemExterior; 5] = [
        ItemExterior::FactoryNew,
        ItemExterior::MinimalWear,
        ItemExterior::FieldTested,
        ItemExterior::WellWorn,
        ItemExterior::BattleScarred,
    ];

    /// Label used by the Steam market and the price feed
    pub fn label(&self) -> &'static str {
        match self {
            ItemExterior::FactoryNew => "Factory New",
            ItemExterior::MinimalWear => "Minimal Wear",
            ItemExterior::FieldTested => "Field-Tested",
            ItemExterior::WellWorn => "Well-Worn",
            ItemExterior::BattleScarred => "Battle-Scarred",
        }
    }
}

impl fmt::Display for ItemExterior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemExterior {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|exterior| exterior.label() == s)
            .ok_or_else(|| ParseLabelError::Exterior(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    // weapon skins
    Knife,
    Gloves,
    Pistol,
    Rifle,
    SniperRifle,
    Shotgun,
    Smg,
    Machinegun,
    // everything else
    Graffiti,
    Sticker,
    Agent,
    Container,
    Collectible,
    Patch,
}

impl ItemType {
    pub const ALL: [ItemType; 14] = [
        ItemType::Knife,
        ItemType::Gloves,
        ItemType::Pistol,
        ItemType::Rifle,
        ItemType::SniperRifle,
        ItemType::Shotgun,
        ItemType::Smg,
        ItemType::Machinegun,
        ItemType::Graffiti,
        ItemType::Sticker,
        ItemType::Agent,
        ItemType::Container,
        ItemType::Collectible,
        ItemType::Patch,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Knife => "Knife",
            ItemType::Gloves => "Gloves",
            ItemType::Pistol => "Pistol",
            ItemType::Rifle => "Rifle",
            ItemType::SniperRifle => "Sniper Rifle",
            ItemType::Shotgun => "Shotgun",
            ItemType::Smg => "SMG",
            ItemType::Machinegun => "Machinegun",
            ItemType::Graffiti => "Graffiti",
            ItemType::Sticker => "Sticker",
            ItemType::Agent => "Agent",
            ItemType::Container => "Container",
            ItemType::Collectible => "Collectible",
            ItemType::Patch => "Patch",
        }
    }

    /// Gloves aren't a weapon, but they are priced like weapon skins.
    pub fn is_weapon(&self) -> bool {
        matches!(
            self,
            ItemType::Knife
                | ItemType::Gloves
                | ItemType::Pistol
                | ItemType::Rifle
                | ItemType::SniperRifle
                | ItemType::Shotgun
                | ItemType::Smg
                | ItemType::Machinegun
        )
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|item_type| item_type.label() == s)
            .ok_or_else(|| ParseLabelError::Type(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseLabelError {
    #[error("Unknown exterior: {0}")]
    Exterior(String),

    #[error("Unknown item type: {0}")]
    Type(String),
}

/// One tradable entry of an inventory.
///
/// The trade fields mirror what the Steam trading API expects; none of them
/// take part in pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub appid: u32,
    pub contextid: String,
    pub amount: u32,
    pub assetid: u64,
    pub exterior: Option<ItemExterior>,
    pub item_type: Option<ItemType>,
}

impl Item {
    pub fn new(name: impl Into<String>, appid: u32, contextid: impl Into<String>, amount: u32, assetid: u64) -> Self {
        Self {
            name: name.into(),
            appid,
            contextid: contextid.into(),
            amount,
            assetid,
            exterior: None,
            item_type: None,
        }
    }

    pub fn with_exterior(mut self, exterior: ItemExterior) -> Self {
        self.exterior = Some(exterior);
        self
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    /// False for unclassified items.
    pub fn is_weapon(&self) -> bool {
        self.item_type.map_or(false, |t| t.is_weapon())
    }

    /// Key used against the price feed, e.g. `AK-47 | Redline (Field-Tested)`
    pub fn market_name(&self) -> String {
        match self.exterior {
            Some(exterior) => format!("{} ({})", self.name, exterior.label()),
            None => self.name.clone(),
        }
    }

    pub fn trade_asset(&self) -> TradeAsset {
        TradeAsset {
            appid: self.appid,
            contextid: self.contextid.clone(),
            amount: self.amount,
            assetid: self.assetid,
        }
    }

    /// Catalog price for this item, or `UNKNOWN_PRICE` (-1)
    pub fn price(&self, catalog: &PriceCatalog) -> f64 {
        catalog.lookup(&self.market_name())
    }
}

/// Everything a trade offer needs to reference an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAsset {
    pub appid: u32,
    pub contextid: String,
    pub amount: u32,
    pub assetid: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redline() -> Item {
        Item::new("AK-47 | Redline", 730, "2", 1, 27348562891)
    }

    #[test]
    fn test_market_name_without_exterior() {
        let item = redline();
        assert_eq!(item.market_name(), "AK-47 | Redline");
    }

    #[test]
    fn test_market_name_with_exterior() {
        for exterior in ItemExterior::ALL {
            let item = redline().with_exterior(exterior);
            assert_eq!(
                item.market_name(),
                format!("AK-47 | Redline ({})", exterior.label())
            );
        }

        let item = redline().with_exterior(ItemExterior::FieldTested);
        assert_eq!(item.market_name(), "AK-47 | Redline (Field-Tested)");
    }

    #[test]
    fn test_is_weapon() {
        let weapons = [
            ItemType::Knife,
            ItemType::Gloves,
            ItemType::Pistol,
            ItemType::Rifle,
            ItemType::SniperRifle,
            ItemType::Shotgun,
            ItemType::Smg,
            ItemType::Machinegun,
        ];

        for item_type in ItemType::ALL {
            let item = redline().with_type(item_type);
            assert_eq!(item.is_weapon(), weapons.contains(&item_type), "{}", item_type);
        }

        // unclassified is not a weapon
        assert!(!redline().is_weapon());
    }

    #[test]
    fn test_trade_asset_serialization() {
        let asset = redline().with_type(ItemType::Rifle).trade_asset();
        let json = serde_json::to_value(&asset).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "appid": 730,
                "contextid": "2",
                "amount": 1,
                "assetid": 27348562891u64,
            })
        );
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("Field-Tested".parse::<ItemExterior>(), Ok(ItemExterior::FieldTested));
        assert_eq!("Sniper Rifle".parse::<ItemType>(), Ok(ItemType::SniperRifle));
        assert_eq!("SMG".parse::<ItemType>(), Ok(ItemType::Smg));

        assert_eq!(
            "Music Kit".parse::<ItemType>(),
            Err(ParseLabelError::Type("Music Kit".to_string()))
        );
        assert!("Not Painted".parse::<ItemExterior>().is_err());
    }

    #[test]
    fn test_exterior_ordering() {
        assert!(ItemExterior::FactoryNew < ItemExterior::MinimalWear);
        assert!(ItemExterior::WellWorn < ItemExterior::BattleScarred);
    }
}
