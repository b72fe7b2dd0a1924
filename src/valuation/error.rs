use thiserror::Error;

use crate::types::Dollars;

/// Why a bid amount or slider configuration was rejected.
///
/// Every variant carries the bound that was violated so the caller can
/// render its own message.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BidError {
    /// Auction bounds or slider geometry cannot support a slider.
    #[error("invalid bid range: minimum {minimum}, maximum {maximum}, track extent {track_extent}")]
    InvalidRange {
        minimum: Dollars,
        maximum: Dollars,
        track_extent: f64,
    },

    #[error("please enter a valid bid amount")]
    InvalidAmount,

    #[error("bid must be at least ${minimum}")]
    TooLow { minimum: Dollars },

    #[error("maximum bid is ${maximum}")]
    TooHigh { maximum: Dollars },

    #[error("auction is no longer accepting bids")]
    Closed,

    #[error("bid already submitted for this session")]
    AlreadySubmitted,

    /// Submit attempted before the slider knob was released.
    #[error("release the slider before placing a bid")]
    StillDragging,
}

impl BidError {
    /// Stable short name for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BidError::InvalidRange { .. } => "invalid_range",
            BidError::InvalidAmount => "invalid_amount",
            BidError::TooLow { .. } => "too_low",
            BidError::TooHigh { .. } => "too_high",
            BidError::Closed => "closed",
            BidError::AlreadySubmitted => "already_submitted",
            BidError::StillDragging => "still_dragging",
        }
    }
}
