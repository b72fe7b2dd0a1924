use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::BidAmount;

/// Identifier for a placed bid.
pub type BidId = Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Viewer,
    Creator,
}

/// The account placing a bid.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bidder {
    pub id: String,
    pub account_type: AccountType,
}

impl Bidder {
    pub fn viewer(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account_type: AccountType::Viewer,
        }
    }
}

/// Lifecycle of a placed bid.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Active,
    Outbid,
    Won,
    Lost,
}

/// A bid accepted by the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacedBid {
    pub id: BidId,
    pub bidder_id: String,
    pub item_id: String,
    pub amount: BidAmount,
    pub status: BidStatus,
    pub placed_at: DateTime<Utc>,
}
