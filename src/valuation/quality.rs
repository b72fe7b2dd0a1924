use serde::{Deserialize, Serialize};

use crate::types::{BidAmount, Dollars};

/// Offset above the dynamic minimum where a bid stops being "minimum".
pub const GOOD_BID_OFFSET: Dollars = 100;
/// Offset above the dynamic minimum where a bid becomes "excellent".
pub const EXCELLENT_BID_OFFSET: Dollars = 500;

/// Cosmetic grading of a candidate bid. Never used to gate submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidQuality {
    TooLow,
    Minimum,
    Good,
    Excellent,
}

impl BidQuality {
    pub fn label(self) -> &'static str {
        match self {
            BidQuality::TooLow => "Bid too low",
            BidQuality::Minimum => "Minimum bid",
            BidQuality::Good => "Good bid",
            BidQuality::Excellent => "Excellent bid",
        }
    }

    /// Feedback colour as an RGB hex string.
    pub fn color(self) -> &'static str {
        match self {
            BidQuality::TooLow => "#FF6B6B",
            BidQuality::Minimum => "#FF9800",
            BidQuality::Good => "#FFD700",
            BidQuality::Excellent => "#4CAF50",
        }
    }
}

/// Grade `amount` against the dynamic minimum.
///
/// Bands are half-open and contiguous: `[dmin, dmin+100)` is `Minimum`,
/// `[dmin+100, dmin+500)` is `Good`, everything from `dmin+500` up is
/// `Excellent`. Anything below `dmin`, NaN included, is `TooLow`.
pub fn classify_bid(amount: BidAmount, dynamic_minimum: Dollars) -> BidQuality {
    let floor = dynamic_minimum as f64;
    if amount >= floor + EXCELLENT_BID_OFFSET as f64 {
        BidQuality::Excellent
    } else if amount >= floor + GOOD_BID_OFFSET as f64 {
        BidQuality::Good
    } else if amount >= floor {
        BidQuality::Minimum
    } else {
        BidQuality::TooLow
    }
}
