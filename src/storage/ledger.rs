use std::collections::HashMap;

use anyhow::bail;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::session::BidSubmission;
use crate::storage::{
    models::{AccountType, BidStatus, Bidder, PlacedBid},
    BidSink,
};
use crate::types::{BidAmount, Dollars};

/// Bids kept in process memory, grouped by auction item.
///
/// Stands in for the auction backend: it accepts submissions and reports
/// the leading bid that seeds the next bidding session.
#[derive(Debug, Default)]
pub struct InMemoryBidLedger {
    items: HashMap<String, Vec<PlacedBid>>,
}

impl InMemoryBidLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest recorded amount for `item_id`, in whole dollars; 0 if none.
    pub fn leading_bid(&self, item_id: &str) -> Dollars {
        self.top_amount(item_id)
            .map(|amount| amount.floor() as Dollars)
            .unwrap_or(0)
    }

    fn top_amount(&self, item_id: &str) -> Option<BidAmount> {
        self.items
            .get(item_id)
            .and_then(|bids| bids.iter().map(|b| b.amount).reduce(f64::max))
    }

    pub fn is_settled(&self, item_id: &str) -> bool {
        self.bids_for_item(item_id)
            .iter()
            .any(|b| matches!(b.status, BidStatus::Won | BidStatus::Lost))
    }

    /// Close bidding on `item_id`: the active bid wins, every other bid loses.
    ///
    /// Returns the winning bid, or `None` if the item had no bids or was
    /// already settled.
    pub fn settle(&mut self, item_id: &str) -> Option<PlacedBid> {
        if self.is_settled(item_id) {
            return None;
        }
        let bids = self.items.get_mut(item_id)?;

        let mut winner = None;
        for bid in bids.iter_mut() {
            if bid.status == BidStatus::Active {
                bid.status = BidStatus::Won;
                winner = Some(bid.clone());
            } else {
                bid.status = BidStatus::Lost;
            }
        }

        if let Some(won) = &winner {
            info!(
                target: "bid",
                item = %item_id,
                bid_id = %won.id,
                bidder = %won.bidder_id,
                amount = won.amount,
                "auction settled"
            );
        }
        winner
    }

    pub fn bids_for_item(&self, item_id: &str) -> &[PlacedBid] {
        self.items.get(item_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bids_for_bidder(&self, bidder_id: &str) -> Vec<&PlacedBid> {
        let mut bids: Vec<&PlacedBid> = self
            .items
            .values()
            .flatten()
            .filter(|b| b.bidder_id == bidder_id)
            .collect();
        bids.sort_by_key(|b| b.placed_at);
        bids
    }

    pub fn len(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BidSink for InMemoryBidLedger {
    fn record(
        &mut self,
        bidder: &Bidder,
        submission: &BidSubmission,
        now: DateTime<Utc>,
    ) -> anyhow::Result<PlacedBid> {
        if bidder.account_type == AccountType::Creator {
            bail!("creator account {} cannot place bids", bidder.id);
        }

        if self.is_settled(&submission.item_id) {
            bail!("auction for item {} is already settled", submission.item_id);
        }
        if let Some(leading) = self.top_amount(&submission.item_id) {
            if submission.amount <= leading {
                bail!(
                    "bid {} on item {} does not beat leading bid {}",
                    submission.amount,
                    submission.item_id,
                    leading
                );
            }
        }

        let bids = self.items.entry(submission.item_id.clone()).or_default();
        for previous in bids.iter_mut() {
            if previous.status == BidStatus::Active {
                previous.status = BidStatus::Outbid;
            }
        }

        let placed = PlacedBid {
            id: Uuid::new_v4(),
            bidder_id: bidder.id.clone(),
            item_id: submission.item_id.clone(),
            amount: submission.amount,
            status: BidStatus::Active,
            placed_at: now,
        };
        bids.push(placed.clone());

        info!(
            target: "bid",
            bid_id = %placed.id,
            item = %placed.item_id,
            bidder = %placed.bidder_id,
            amount = placed.amount,
            "bid recorded"
        );
        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(item_id: &str, amount: f64) -> BidSubmission {
        BidSubmission {
            item_id: item_id.to_string(),
            amount,
        }
    }

    #[test]
    fn tracks_leading_bid_and_outbids() {
        let mut ledger = InMemoryBidLedger::new();
        let now = Utc::now();
        assert_eq!(ledger.leading_bid("i1"), 0);

        ledger
            .record(&Bidder::viewer("v1"), &submission("i1", 2_500.0), now)
            .unwrap();
        ledger
            .record(&Bidder::viewer("v2"), &submission("i1", 2_750.5), now)
            .unwrap();

        assert_eq!(ledger.leading_bid("i1"), 2_750);
        assert_eq!(ledger.len(), 2);
        let v1 = ledger.bids_for_bidder("v1");
        assert_eq!(v1.len(), 1);
        assert_eq!(v1[0].status, BidStatus::Outbid);
        assert_eq!(ledger.bids_for_item("i1")[1].status, BidStatus::Active);
    }

    #[test]
    fn bids_must_beat_the_leader() {
        let mut ledger = InMemoryBidLedger::new();
        let now = Utc::now();
        ledger
            .record(&Bidder::viewer("v1"), &submission("i1", 3_000.0), now)
            .unwrap();

        assert!(ledger
            .record(&Bidder::viewer("v2"), &submission("i1", 200.0), now)
            .is_err());
        assert!(ledger
            .record(&Bidder::viewer("v3"), &submission("i1", 3_000.0), now)
            .is_err());

        let bids = ledger.bids_for_item("i1");
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].status, BidStatus::Active);
    }

    #[test]
    fn settling_picks_one_winner() {
        let mut ledger = InMemoryBidLedger::new();
        let now = Utc::now();
        for (bidder, amount) in [("v1", 500.0), ("v2", 900.0), ("v3", 1_400.0)] {
            ledger
                .record(&Bidder::viewer(bidder), &submission("i1", amount), now)
                .unwrap();
        }

        let won = ledger.settle("i1").unwrap();
        assert_eq!(won.bidder_id, "v3");
        assert!(ledger.is_settled("i1"));
        let statuses: Vec<_> = ledger.bids_for_item("i1").iter().map(|b| b.status).collect();
        assert_eq!(statuses, vec![BidStatus::Lost, BidStatus::Lost, BidStatus::Won]);

        assert!(ledger.settle("i1").is_none());
        assert!(ledger
            .record(&Bidder::viewer("v4"), &submission("i1", 5_000.0), now)
            .is_err());
        assert!(ledger.settle("unknown").is_none());
    }

    #[test]
    fn creators_cannot_bid() {
        let mut ledger = InMemoryBidLedger::new();
        let creator = Bidder {
            id: "c1".to_string(),
            account_type: AccountType::Creator,
        };
        assert!(ledger
            .record(&creator, &submission("i1", 500.0), Utc::now())
            .is_err());
        assert!(ledger.is_empty());
    }
}
