use std::fs;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Whole-dollar amount used for auction bounds and leading bids.
pub type Dollars = u64;

/// Candidate bid amount held by a bidding session.
///
/// Slider-driven amounts are always whole dollars; custom entry may carry
/// a fractional part which is kept as typed.
pub type BidAmount = f64;

pub const DEFAULT_BASE_MINIMUM: Dollars = 50;
pub const DEFAULT_MAXIMUM_BID: Dollars = 250_000;
pub const DEFAULT_OPENING_MARGIN: Dollars = 50;
pub const DEFAULT_QUICK_INCREMENTS: [Dollars; 4] = [50, 100, 250, 500];

fn default_base_minimum() -> Dollars {
    DEFAULT_BASE_MINIMUM
}

fn default_maximum_bid() -> Dollars {
    DEFAULT_MAXIMUM_BID
}

fn default_opening_margin() -> Dollars {
    DEFAULT_OPENING_MARGIN
}

fn default_quick_increments() -> Vec<Dollars> {
    DEFAULT_QUICK_INCREMENTS.to_vec()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BiddingConfig {
    /// Platform-wide floor for any bid.
    #[serde(default = "default_base_minimum")]
    pub base_minimum: Dollars,
    /// Ceiling for any single item.
    #[serde(default = "default_maximum_bid")]
    pub maximum_bid: Dollars,
    /// How far above the dynamic minimum a fresh session starts.
    #[serde(default = "default_opening_margin")]
    pub opening_margin: Dollars,
    #[serde(default = "default_quick_increments")]
    pub quick_increments: Vec<Dollars>,
}

impl Default for BiddingConfig {
    fn default() -> Self {
        Self {
            base_minimum: DEFAULT_BASE_MINIMUM,
            maximum_bid: DEFAULT_MAXIMUM_BID,
            opening_margin: DEFAULT_OPENING_MARGIN,
            quick_increments: default_quick_increments(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SliderConfig {
    /// Draggable distance of the knob, in layout units.
    pub track_extent: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub bidding: BiddingConfig,
    pub slider: SliderConfig,
}

impl AppConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {path}"))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to deserialize TOML config at {path}"))?;
        Ok(cfg)
    }
}
