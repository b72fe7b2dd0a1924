use std::fs;

use anyhow::Context;
use serde::Deserialize;

use crate::storage::AccountType;
use crate::types::{BiddingConfig, Dollars, SliderConfig};

/// One user interaction fed to a bidding session.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayEvent {
    Drag { position: f64 },
    Release { position: f64 },
    QuickAdd { increment: Dollars },
    Custom { text: String },
    LeadingBid { amount: Dollars },
    CloseAuction,
    Submit,
}

fn default_bidder_id() -> String {
    "viewer".to_string()
}

fn default_account_type() -> AccountType {
    AccountType::Viewer
}

/// Scripted bidding session for a single item.
#[derive(Clone, Debug, Deserialize)]
pub struct ReplaySession {
    pub item_id: String,
    #[serde(default = "default_bidder_id")]
    pub bidder_id: String,
    #[serde(default = "default_account_type")]
    pub account_type: AccountType,
    /// Leading bid the session opens against, unless the ledger already
    /// holds a higher one for the item.
    #[serde(default)]
    pub leading_bid: Dollars,
    pub events: Vec<ReplayEvent>,
}

/// Top-level replay configuration loaded from TOML.
#[derive(Clone, Debug, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub bidding: BiddingConfig,
    pub slider: SliderConfig,
    pub sessions: Vec<ReplaySession>,
}

impl ReplayConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read replay config file at {path}"))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to deserialize replay TOML at {path}"))?;
        Ok(cfg)
    }
}
