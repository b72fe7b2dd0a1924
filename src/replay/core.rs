use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    monitoring::metrics::Metrics,
    replay::config::{ReplayEvent, ReplaySession},
    session::{BidSession, BidSubmission},
    storage::{BidSink, Bidder, InMemoryBidLedger, PlacedBid},
    types::BiddingConfig,
    valuation::{BidContext, BidError, BidParams},
};

/// Why a scripted step did not go through.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectionCause {
    Bid(String),
    Sink(String),
}

#[derive(Clone, Debug, Serialize)]
pub struct ReplayRejection {
    pub item_id: String,
    pub bidder_id: String,
    /// `None` when the session could not be opened at all.
    pub event_index: Option<usize>,
    pub cause: RejectionCause,
}

#[derive(Debug)]
pub struct ReplayResult {
    pub sessions: usize,
    pub bids: Vec<PlacedBid>,
    /// Winning bids of items whose auction closed during the replay.
    pub winners: Vec<PlacedBid>,
    pub rejections: Vec<ReplayRejection>,
    pub ledger: InMemoryBidLedger,
}

/// Play scripted bidding sessions in order against a shared ledger.
///
/// A session opens against the higher of its scripted leading bid and the
/// best bid the ledger already holds for the item, so earlier sessions
/// raise the floor for later ones. A session that closes the auction
/// settles the item in the ledger. Apart from bid ids the result depends
/// only on the inputs.
pub fn run_replay_sessions(
    sessions: &[ReplaySession],
    bidding: &BiddingConfig,
    track_extent: f64,
    now: DateTime<Utc>,
    metrics: &Metrics,
) -> ReplayResult {
    let params = BidParams::from(bidding);
    let mut ledger = InMemoryBidLedger::new();
    let mut bids = Vec::new();
    let mut winners = Vec::new();
    let mut rejections = Vec::new();

    for script in sessions {
        let bidder = Bidder {
            id: script.bidder_id.clone(),
            account_type: script.account_type,
        };
        let reject = |event_index: Option<usize>, cause: RejectionCause| ReplayRejection {
            item_id: script.item_id.clone(),
            bidder_id: script.bidder_id.clone(),
            event_index,
            cause,
        };

        let leading_bid = script.leading_bid.max(ledger.leading_bid(&script.item_id));
        let context = BidContext::new(&params, leading_bid);
        let mut session = match BidSession::open(context, &params, track_extent) {
            Ok(session) => session,
            Err(err) => {
                metrics.record_bid_rejected(&script.item_id, &err);
                rejections.push(reject(None, RejectionCause::Bid(err.to_string())));
                continue;
            }
        };
        metrics.record_session_opened(&script.item_id);

        for (index, event) in script.events.iter().enumerate() {
            match apply_event(&mut session, &script.item_id, event) {
                Ok(Some(submission)) => match ledger.record(&bidder, &submission, now) {
                    Ok(placed) => {
                        metrics.record_bid_submitted(&placed.item_id, placed.amount);
                        bids.push(placed);
                    }
                    Err(err) => {
                        metrics.record_sink_rejected(&script.item_id);
                        rejections.push(reject(Some(index), RejectionCause::Sink(err.to_string())));
                    }
                },
                Ok(None) => {}
                Err(err) => {
                    metrics.record_bid_rejected(&script.item_id, &err);
                    rejections.push(reject(Some(index), RejectionCause::Bid(err.to_string())));
                }
            }
        }

        if session.is_auction_closed() {
            winners.extend(ledger.settle(&script.item_id));
        }
    }

    ReplayResult {
        sessions: sessions.len(),
        bids,
        winners,
        rejections,
        ledger,
    }
}

fn apply_event(
    session: &mut BidSession,
    item_id: &str,
    event: &ReplayEvent,
) -> Result<Option<BidSubmission>, BidError> {
    match event {
        ReplayEvent::Drag { position } => session.drag(*position).map(|_| None),
        ReplayEvent::Release { position } => session.release(*position).map(|_| None),
        ReplayEvent::QuickAdd { increment } => session.quick_add(*increment).map(|_| None),
        ReplayEvent::Custom { text } => session.enter_custom(text).map(|_| None),
        ReplayEvent::LeadingBid { amount } => {
            session.update_leading_bid(*amount);
            Ok(None)
        }
        ReplayEvent::CloseAuction => {
            session.close_auction();
            Ok(None)
        }
        ReplayEvent::Submit => session.submit(item_id).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{AccountType, BidStatus};

    fn script(item_id: &str, leading_bid: u64, events: Vec<ReplayEvent>) -> ReplaySession {
        ReplaySession {
            item_id: item_id.to_string(),
            bidder_id: "v1".to_string(),
            account_type: AccountType::Viewer,
            leading_bid,
            events,
        }
    }

    #[test]
    fn records_default_bid() {
        let result = run_replay_sessions(
            &[script("i1", 0, vec![ReplayEvent::Submit])],
            &BiddingConfig::default(),
            295.0,
            Utc::now(),
            &Metrics::default(),
        );
        assert_eq!(result.bids.len(), 1);
        assert_eq!(result.bids[0].amount, 100.0);
        assert!(result.rejections.is_empty());
        assert_eq!(result.ledger.leading_bid("i1"), 100);
    }

    #[test]
    fn later_sessions_open_above_earlier_bids() {
        let sessions = vec![
            script("i1", 2_500, vec![ReplayEvent::QuickAdd { increment: 500 }, ReplayEvent::Submit]),
            // Opens against 3_051 from the ledger, so 3_000 is too low.
            script(
                "i1",
                0,
                vec![
                    ReplayEvent::Custom {
                        text: "3000".to_string(),
                    },
                    ReplayEvent::Submit,
                ],
            ),
        ];
        let result = run_replay_sessions(
            &sessions,
            &BiddingConfig::default(),
            295.0,
            Utc::now(),
            &Metrics::default(),
        );

        assert_eq!(result.bids.len(), 2);
        assert_eq!(result.bids[0].amount, 3_051.0);
        assert_eq!(result.bids[1].amount, 3_102.0);
        assert_eq!(result.rejections.len(), 1);
        assert_eq!(result.rejections[0].event_index, Some(0));
        assert_eq!(
            result.rejections[0].cause,
            RejectionCause::Bid(BidError::TooLow { minimum: 3_052 }.to_string())
        );
    }

    #[test]
    fn unbiddable_item_is_rejected_up_front() {
        let result = run_replay_sessions(
            &[script("i1", 250_000, vec![ReplayEvent::Submit])],
            &BiddingConfig::default(),
            295.0,
            Utc::now(),
            &Metrics::default(),
        );
        assert!(result.bids.is_empty());
        assert_eq!(result.rejections.len(), 1);
        assert_eq!(result.rejections[0].event_index, None);
    }

    #[test]
    fn sink_rejections_are_counted() {
        let metrics = Metrics::default();
        let mut creator = script("i1", 0, vec![ReplayEvent::Submit]);
        creator.account_type = AccountType::Creator;
        let sessions = vec![
            creator,
            script("i1", 0, vec![ReplayEvent::Submit]),
        ];
        let result = run_replay_sessions(
            &sessions,
            &BiddingConfig::default(),
            295.0,
            Utc::now(),
            &metrics,
        );

        assert_eq!(result.bids.len(), 1);
        assert_eq!(result.rejections.len(), 1);
        assert!(matches!(result.rejections[0].cause, RejectionCause::Sink(_)));
        let snap = metrics.snapshot();
        assert_eq!(snap.bids_submitted, 1);
        assert_eq!(snap.bids_rejected, result.rejections.len() as u64);
    }

    #[test]
    fn closing_the_auction_settles_the_item() {
        let sessions = vec![
            script("i1", 0, vec![ReplayEvent::QuickAdd { increment: 100 }, ReplayEvent::Submit]),
            script(
                "i1",
                0,
                vec![
                    ReplayEvent::QuickAdd { increment: 500 },
                    ReplayEvent::Submit,
                    ReplayEvent::CloseAuction,
                ],
            ),
            script("i1", 0, vec![ReplayEvent::QuickAdd { increment: 500 }, ReplayEvent::Submit]),
        ];
        let result = run_replay_sessions(
            &sessions,
            &BiddingConfig::default(),
            295.0,
            Utc::now(),
            &Metrics::default(),
        );

        assert_eq!(result.winners.len(), 1);
        assert_eq!(result.winners[0].amount, 751.0);
        let statuses: Vec<_> = result
            .ledger
            .bids_for_item("i1")
            .iter()
            .map(|b| b.status)
            .collect();
        assert_eq!(statuses, vec![BidStatus::Lost, BidStatus::Won]);
        // The settled item refuses the late bid.
        assert_eq!(result.rejections.len(), 1);
        assert!(matches!(result.rejections[0].cause, RejectionCause::Sink(_)));
    }
}
