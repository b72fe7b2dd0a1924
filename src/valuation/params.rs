use crate::types::{BiddingConfig, Dollars};

/// Platform bidding rules, derived from the `[bidding]` config section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BidParams {
    /// Floor for any bid regardless of the leading bid.
    pub base_minimum: Dollars,
    /// Ceiling for any single item.
    pub maximum_bid: Dollars,
    /// Distance above the dynamic minimum where a new session starts.
    pub opening_margin: Dollars,
    /// One-tap increments offered next to the slider.
    pub quick_increments: Vec<Dollars>,
}

impl Default for BidParams {
    fn default() -> Self {
        Self::from(&BiddingConfig::default())
    }
}

impl From<&BiddingConfig> for BidParams {
    fn from(cfg: &BiddingConfig) -> Self {
        Self {
            base_minimum: cfg.base_minimum,
            maximum_bid: cfg.maximum_bid,
            opening_margin: cfg.opening_margin,
            quick_increments: cfg.quick_increments.clone(),
        }
    }
}
