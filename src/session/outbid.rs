use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    types::{BidAmount, Dollars},
    utils::time::{format_time_left, AuctionClock},
    valuation::{
        apply_quick_increment, compute_dynamic_minimum, parse_custom_amount, validate_amount,
        BidError, BidParams,
    },
};

/// How long an outbid notice stays up without interaction.
pub const AUTO_DISMISS_SECS: i64 = 10;
/// How long "snooze" hides a notice for.
pub const SNOOZE_SECS: i64 = 5 * 60;

/// A one-tap re-bid offered on the outbid notice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestedBid {
    pub increment: Dollars,
    pub amount: BidAmount,
}

/// Notice shown to a bidder whose bid on an item was overtaken.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutbidNotice {
    pub item_id: String,
    pub item_title: String,
    pub creator_name: String,
    pub your_bid: BidAmount,
    pub current_bid: Dollars,
    pub ends_at: DateTime<Utc>,
    pub shown_at: DateTime<Utc>,
}

impl OutbidNotice {
    /// Lowest amount that re-takes the lead.
    pub fn minimum_bid(&self, params: &BidParams) -> Dollars {
        compute_dynamic_minimum(params.base_minimum, self.current_bid)
    }

    /// Leading bid plus each quick increment, skipping any past the ceiling.
    pub fn suggested_bids(&self, params: &BidParams) -> Vec<SuggestedBid> {
        params
            .quick_increments
            .iter()
            .filter_map(|&increment| {
                apply_quick_increment(self.current_bid as f64, increment, params.maximum_bid)
                    .ok()
                    .map(|amount| SuggestedBid { increment, amount })
            })
            .collect()
    }

    /// Validate a re-bid typed into the notice.
    pub fn update_bid(&self, raw: &str, params: &BidParams) -> Result<BidAmount, BidError> {
        let amount = parse_custom_amount(raw)?;
        validate_amount(amount, self.minimum_bid(params), params.maximum_bid)
    }

    /// Remaining auction time in short form, e.g. `2h 15m`.
    pub fn time_left(&self, now: DateTime<Utc>) -> String {
        format_time_left(AuctionClock::new(self.ends_at).seconds_remaining(now))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.shown_at >= Duration::seconds(AUTO_DISMISS_SECS)
    }

    /// When a notice snoozed at `now` should be shown again.
    pub fn resurfaces_at(now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::seconds(SNOOZE_SECS)
    }

    /// Snooze: the same notice, re-shown five minutes from `now`.
    pub fn snooze(&self, now: DateTime<Utc>) -> Self {
        Self {
            shown_at: Self::resurfaces_at(now),
            ..self.clone()
        }
    }
}
