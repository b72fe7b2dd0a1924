use crate::{
    types::{BidAmount, Dollars},
    valuation::BidError,
};

fn invalid_range(track_extent: f64, minimum: Dollars, maximum: Dollars) -> BidError {
    BidError::InvalidRange {
        minimum,
        maximum,
        track_extent,
    }
}

fn usable_extent(track_extent: f64) -> bool {
    track_extent.is_finite() && track_extent > 0.0
}

/// Map a knob offset on the slider track to a whole-dollar bid.
///
/// `position` may overshoot either end of the track while dragging; it is
/// clamped into `[0, track_extent]` first, so the result always lies in
/// `[dynamic_minimum, maximum_bid]`. Rounding is half-up.
pub fn position_to_amount(
    position: f64,
    track_extent: f64,
    dynamic_minimum: Dollars,
    maximum_bid: Dollars,
) -> Result<Dollars, BidError> {
    if !usable_extent(track_extent) || maximum_bid < dynamic_minimum {
        return Err(invalid_range(track_extent, dynamic_minimum, maximum_bid));
    }

    let clamped = if position.is_nan() {
        0.0
    } else {
        position.clamp(0.0, track_extent)
    };
    let percentage = clamped / track_extent;
    let range = (maximum_bid - dynamic_minimum) as f64;

    // Both operands are non-negative, so floor(x + 0.5) is round-half-up.
    let raw = (dynamic_minimum as f64 + percentage * range + 0.5).floor();
    Ok((raw as Dollars).clamp(dynamic_minimum, maximum_bid))
}

/// Inverse of [`position_to_amount`]: where the knob sits for `amount`.
///
/// The amount is not clamped; callers pass a validated amount.
pub fn amount_to_position(
    amount: BidAmount,
    track_extent: f64,
    dynamic_minimum: Dollars,
    maximum_bid: Dollars,
) -> Result<f64, BidError> {
    if !usable_extent(track_extent) || maximum_bid <= dynamic_minimum {
        return Err(invalid_range(track_extent, dynamic_minimum, maximum_bid));
    }

    let range = (maximum_bid - dynamic_minimum) as f64;
    let percentage = (amount - dynamic_minimum as f64) / range;
    Ok(percentage * track_extent)
}
