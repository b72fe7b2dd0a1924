use serde::{Deserialize, Serialize};

use crate::types::{BidAmount, Dollars};

pub mod error;
pub mod params;
pub mod quality;

pub use crate::utils::math::{amount_to_position, position_to_amount};
pub use error::BidError;
pub use params::BidParams;
pub use quality::{classify_bid, BidQuality};

/// Auction bounds a bidding session is opened against.
///
/// `current_leading_bid` is never shown to the bidder; it only moves the
/// floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidContext {
    pub base_minimum: Dollars,
    pub current_leading_bid: Dollars,
    pub maximum_bid: Dollars,
}

impl BidContext {
    pub fn new(params: &BidParams, current_leading_bid: Dollars) -> Self {
        Self {
            base_minimum: params.base_minimum,
            current_leading_bid,
            maximum_bid: params.maximum_bid,
        }
    }

    pub fn dynamic_minimum(&self) -> Dollars {
        compute_dynamic_minimum(self.base_minimum, self.current_leading_bid)
    }

    /// False when the floor has been pushed past the ceiling.
    pub fn is_biddable(&self) -> bool {
        self.dynamic_minimum() <= self.maximum_bid
    }
}

/// Effective floor for a new bid: the platform minimum, or one dollar
/// above the leading bid, whichever is higher.
pub fn compute_dynamic_minimum(base_minimum: Dollars, current_leading_bid: Dollars) -> Dollars {
    base_minimum.max(current_leading_bid.saturating_add(1))
}

/// Add a quick increment to the displayed amount.
///
/// Nothing is applied when the result would pass `maximum_bid`.
pub fn apply_quick_increment(
    current_amount: BidAmount,
    increment: Dollars,
    maximum_bid: Dollars,
) -> Result<BidAmount, BidError> {
    let next = current_amount + increment as f64;
    if next > maximum_bid as f64 {
        return Err(BidError::TooHigh {
            maximum: maximum_bid,
        });
    }
    Ok(next)
}

/// Parse free-form text typed into the custom amount field.
///
/// Everything but digits and `.` is dropped (so `"$1,234.50"` reads as
/// `1234.5`), then the longest leading decimal number is taken.
pub fn parse_custom_amount(raw: &str) -> Result<BidAmount, BidError> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut seen_dot = false;
    let end = stripped
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' {
                if seen_dot {
                    return true;
                }
                seen_dot = true;
            }
            false
        })
        .map(|(i, _)| i)
        .unwrap_or(stripped.len());

    let amount: f64 = stripped[..end]
        .parse()
        .map_err(|_| BidError::InvalidAmount)?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BidError::InvalidAmount);
    }
    Ok(amount)
}

/// Check `amount` against the floor and ceiling, returning it untouched.
pub fn validate_amount(
    amount: BidAmount,
    dynamic_minimum: Dollars,
    maximum_bid: Dollars,
) -> Result<BidAmount, BidError> {
    if !amount.is_finite() {
        return Err(BidError::InvalidAmount);
    }
    if amount < dynamic_minimum as f64 {
        return Err(BidError::TooLow {
            minimum: dynamic_minimum,
        });
    }
    if amount > maximum_bid as f64 {
        return Err(BidError::TooHigh {
            maximum: maximum_bid,
        });
    }
    Ok(amount)
}

pub fn can_submit(
    amount: BidAmount,
    dynamic_minimum: Dollars,
    maximum_bid: Dollars,
    auction_closed: bool,
) -> bool {
    !auction_closed && amount >= dynamic_minimum as f64 && amount <= maximum_bid as f64
}
