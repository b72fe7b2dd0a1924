use chrono::{DateTime, Utc};

use crate::session::BidSubmission;

pub mod ledger;
pub mod models;

pub use ledger::InMemoryBidLedger;
pub use models::{AccountType, BidStatus, Bidder, PlacedBid};

/// Receiver of validated bids.
///
/// Sessions never talk to a sink themselves; callers forward the
/// [`BidSubmission`] a session produced.
pub trait BidSink {
    fn record(
        &mut self,
        bidder: &Bidder,
        submission: &BidSubmission,
        now: DateTime<Utc>,
    ) -> anyhow::Result<PlacedBid>;
}
