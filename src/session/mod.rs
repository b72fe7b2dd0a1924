use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    types::{BidAmount, Dollars},
    utils::time::AuctionClock,
    valuation::{
        self, amount_to_position, classify_bid, parse_custom_amount, position_to_amount,
        validate_amount, BidContext, BidError, BidParams, BidQuality,
    },
};

pub mod outbid;

pub use outbid::{OutbidNotice, SuggestedBid};

/// Where a bidding session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Dragging,
    Settled,
    Submitted,
}

/// A validated bid handed to the submission sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BidSubmission {
    pub item_id: String,
    pub amount: BidAmount,
}

/// One bidder's interaction with the slider, quick-add buttons and custom
/// amount field for a single auction item.
///
/// Nothing here outlives the session; placing the bid is the caller's job.
#[derive(Clone, Debug)]
pub struct BidSession {
    context: BidContext,
    opening_margin: Dollars,
    track_extent: f64,
    amount: BidAmount,
    state: SessionState,
    auction_closed: bool,
}

impl BidSession {
    pub fn open(context: BidContext, params: &BidParams, track_extent: f64) -> Result<Self, BidError> {
        let dynamic_minimum = context.dynamic_minimum();
        // Same bounds the slider needs; anything else cannot be rendered.
        position_to_amount(0.0, track_extent, dynamic_minimum, context.maximum_bid)?;

        let amount = opening_amount(dynamic_minimum, params.opening_margin);
        debug!(
            target: "bid",
            dynamic_minimum,
            maximum_bid = context.maximum_bid,
            amount,
            "bidding session opened"
        );

        Ok(Self {
            context,
            opening_margin: params.opening_margin,
            track_extent,
            amount,
            state: SessionState::Idle,
            auction_closed: false,
        })
    }

    pub fn context(&self) -> &BidContext {
        &self.context
    }

    pub fn amount(&self) -> BidAmount {
        self.amount
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_auction_closed(&self) -> bool {
        self.auction_closed
    }

    pub fn dynamic_minimum(&self) -> Dollars {
        self.context.dynamic_minimum()
    }

    pub fn quality(&self) -> BidQuality {
        classify_bid(self.amount, self.dynamic_minimum())
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, SessionState::Idle | SessionState::Settled)
            && valuation::can_submit(
                self.amount,
                self.dynamic_minimum(),
                self.context.maximum_bid,
                self.auction_closed,
            )
    }

    /// Where the slider knob should rest for the current amount.
    pub fn knob_position(&self) -> Result<f64, BidError> {
        amount_to_position(
            self.amount,
            self.track_extent,
            self.dynamic_minimum(),
            self.context.maximum_bid,
        )
    }

    /// Follow the knob mid-drag. Overshoot is clamped, never rejected.
    pub fn drag(&mut self, position: f64) -> Result<Dollars, BidError> {
        self.ensure_open()?;
        let amount = self.amount_at(position)?;
        self.amount = amount as f64;
        self.state = SessionState::Dragging;
        Ok(amount)
    }

    /// Knob released: settle on the clamped, rounded amount.
    pub fn release(&mut self, position: f64) -> Result<Dollars, BidError> {
        self.ensure_open()?;
        let amount = self.amount_at(position)?;
        self.amount = amount as f64;
        self.state = SessionState::Settled;
        debug!(target: "bid", amount, "slider settled");
        Ok(amount)
    }

    pub fn quick_add(&mut self, increment: Dollars) -> Result<BidAmount, BidError> {
        self.ensure_open()?;
        self.amount = valuation::apply_quick_increment(
            self.amount,
            increment,
            self.context.maximum_bid,
        )?;
        self.state = SessionState::Settled;
        debug!(target: "bid", increment, amount = self.amount, "quick increment applied");
        Ok(self.amount)
    }

    /// Take an amount typed into the custom field.
    ///
    /// Unlike slider amounts the value is not rounded.
    pub fn enter_custom(&mut self, raw: &str) -> Result<BidAmount, BidError> {
        self.ensure_open()?;
        let parsed = parse_custom_amount(raw)?;
        self.amount = validate_amount(parsed, self.dynamic_minimum(), self.context.maximum_bid)?;
        self.state = SessionState::Settled;
        debug!(target: "bid", amount = self.amount, "custom amount accepted");
        Ok(self.amount)
    }

    /// Move the floor after a new leading bid arrived.
    ///
    /// The displayed amount stays put and may now classify as too low.
    pub fn update_leading_bid(&mut self, current_leading_bid: Dollars) {
        self.context.current_leading_bid = current_leading_bid;
        debug!(
            target: "bid",
            dynamic_minimum = self.dynamic_minimum(),
            biddable = self.context.is_biddable(),
            "leading bid changed"
        );
    }

    pub fn close_auction(&mut self) {
        self.auction_closed = true;
    }

    /// Close the auction once its countdown has run out.
    pub fn observe_clock(&mut self, clock: &AuctionClock, now: DateTime<Utc>) {
        if !self.auction_closed && clock.is_closed(now) {
            debug!(target: "bid", ends_at = %clock.ends_at(), "auction countdown finished");
            self.close_auction();
        }
    }

    /// Turn the current amount into a submission.
    ///
    /// Only a resting amount can be submitted, never a mid-drag sample.
    /// On failure the session is left exactly as it was.
    pub fn submit(&mut self, item_id: &str) -> Result<BidSubmission, BidError> {
        self.ensure_open()?;
        if self.state == SessionState::Dragging {
            return Err(BidError::StillDragging);
        }
        if self.auction_closed {
            return Err(BidError::Closed);
        }
        let amount = validate_amount(self.amount, self.dynamic_minimum(), self.context.maximum_bid)?;

        self.state = SessionState::Submitted;
        debug!(target: "bid", item_id, amount, "bid submitted");
        Ok(BidSubmission {
            item_id: item_id.to_string(),
            amount,
        })
    }

    /// Bidding UI dismissed: back to `Idle` with the opening amount.
    pub fn close(&mut self) {
        self.amount = opening_amount(self.dynamic_minimum(), self.opening_margin);
        self.state = SessionState::Idle;
    }

    fn ensure_open(&self) -> Result<(), BidError> {
        if self.state == SessionState::Submitted {
            return Err(BidError::AlreadySubmitted);
        }
        Ok(())
    }

    fn amount_at(&self, position: f64) -> Result<Dollars, BidError> {
        position_to_amount(
            position,
            self.track_extent,
            self.dynamic_minimum(),
            self.context.maximum_bid,
        )
    }
}

fn opening_amount(dynamic_minimum: Dollars, opening_margin: Dollars) -> BidAmount {
    dynamic_minimum.saturating_add(opening_margin) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: f64 = 295.0;

    fn session(leading_bid: Dollars) -> BidSession {
        let params = BidParams::default();
        BidSession::open(BidContext::new(&params, leading_bid), &params, EXTENT).unwrap()
    }

    #[test]
    fn opens_fifty_above_the_floor() {
        let s = session(0);
        assert_eq!(s.dynamic_minimum(), 50);
        assert_eq!(s.amount(), 100.0);
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.quality(), BidQuality::Minimum);
        assert!(s.can_submit());
    }

    #[test]
    fn rejects_unusable_bounds() {
        let params = BidParams::default();
        let ctx = BidContext::new(&params, 250_000);
        assert!(matches!(
            BidSession::open(ctx, &params, EXTENT),
            Err(BidError::InvalidRange { .. })
        ));
        let ctx = BidContext::new(&params, 0);
        assert!(matches!(
            BidSession::open(ctx, &params, 0.0),
            Err(BidError::InvalidRange { .. })
        ));
    }

    #[test]
    fn drag_then_release_settles_clamped() {
        let mut s = session(2500);
        assert_eq!(s.drag(-30.0).unwrap(), 2501);
        assert_eq!(s.state(), SessionState::Dragging);
        assert_eq!(s.release(EXTENT + 80.0).unwrap(), 250_000);
        assert_eq!(s.state(), SessionState::Settled);
        assert_eq!(s.knob_position().unwrap(), EXTENT);
    }

    #[test]
    fn quick_add_too_high_leaves_amount() {
        let mut s = session(2500);
        s.release(EXTENT).unwrap();
        let err = s.quick_add(50).unwrap_err();
        assert_eq!(err, BidError::TooHigh { maximum: 250_000 });
        assert_eq!(s.amount(), 250_000.0);
        assert_eq!(s.state(), SessionState::Settled);
    }

    #[test]
    fn custom_entry_keeps_fraction() {
        let mut s = session(0);
        assert_eq!(s.enter_custom("$1,234.50").unwrap(), 1234.5);
        assert_eq!(s.state(), SessionState::Settled);
        assert_eq!(s.enter_custom("10"), Err(BidError::TooLow { minimum: 50 }));
        assert_eq!(s.amount(), 1234.5);
    }

    #[test]
    fn raised_floor_blocks_submission() {
        let mut s = session(0);
        s.update_leading_bid(1_000);
        assert_eq!(s.dynamic_minimum(), 1_001);
        assert_eq!(s.quality(), BidQuality::TooLow);
        assert!(!s.can_submit());
        assert_eq!(s.submit("i1"), Err(BidError::TooLow { minimum: 1_001 }));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn floor_past_ceiling_fails_closed() {
        let mut s = session(0);
        s.update_leading_bid(250_000);
        assert!(!s.can_submit());
        assert!(matches!(s.drag(10.0), Err(BidError::InvalidRange { .. })));
        assert!(s.submit("i1").is_err());
    }

    #[test]
    fn mid_drag_amount_cannot_be_submitted() {
        let mut s = session(0);
        s.drag(100.0).unwrap();
        assert!(!s.can_submit());
        assert_eq!(s.submit("i1"), Err(BidError::StillDragging));
        assert_eq!(s.state(), SessionState::Dragging);

        let amount = s.release(100.0).unwrap();
        assert!(s.can_submit());
        let submission = s.submit("i1").unwrap();
        assert_eq!(submission.amount, amount as f64);
        assert_eq!(s.state(), SessionState::Submitted);
    }

    #[test]
    fn closed_auction_rejects_submit() {
        let mut s = session(0);
        s.close_auction();
        assert!(!s.can_submit());
        assert_eq!(s.submit("i1"), Err(BidError::Closed));
    }

    #[test]
    fn expired_countdown_closes_auction() {
        let start = DateTime::parse_from_rfc3339("2024-12-28T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let clock = AuctionClock::starting_at(start, 60);
        let mut s = session(0);

        s.observe_clock(&clock, start + chrono::Duration::seconds(59));
        assert!(!s.is_auction_closed());
        s.observe_clock(&clock, start + chrono::Duration::seconds(60));
        assert!(s.is_auction_closed());
        assert_eq!(s.submit("i1"), Err(BidError::Closed));
    }

    #[test]
    fn submitted_session_is_terminal_until_closed() {
        let mut s = session(0);
        let submission = s.submit("i1").unwrap();
        assert_eq!(submission.amount, 100.0);
        assert_eq!(s.state(), SessionState::Submitted);
        assert_eq!(s.quick_add(50), Err(BidError::AlreadySubmitted));
        assert!(!s.can_submit());

        s.close();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.amount(), 100.0);
        assert!(s.can_submit());
    }
}
