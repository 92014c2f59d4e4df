pub mod catalog;
pub mod inventory;
pub mod price_feed;
pub mod types;
