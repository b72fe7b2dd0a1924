use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::info;

use crate::valuation::BidError;

/// Global metrics registry for bidding activity.
pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::default);

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs()
}

#[derive(Default)]
struct MetricsInner {
    sessions_opened: AtomicU64,
    bids_submitted: AtomicU64,
    bids_rejected: AtomicU64,
    last_event_ts: AtomicU64,
}

/// Lightweight metrics handle backed by atomics so it can be cloned cheaply.
#[derive(Clone, Default)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

impl Metrics {
    pub fn record_session_opened(&self, item_id: &str) {
        self.inner.sessions_opened.fetch_add(1, Ordering::Relaxed);
        self.touch();

        info!(
            target: "metrics",
            event = "session_opened",
            item = %item_id,
            total_sessions = self.inner.sessions_opened.load(Ordering::Relaxed),
            "bidding session opened"
        );
    }

    pub fn record_bid_submitted(&self, item_id: &str, amount: f64) {
        self.inner.bids_submitted.fetch_add(1, Ordering::Relaxed);
        self.touch();

        info!(
            target: "metrics",
            event = "bid_submitted",
            item = %item_id,
            amount,
            total_bids = self.inner.bids_submitted.load(Ordering::Relaxed),
            "bid submitted"
        );
    }

    pub fn record_bid_rejected(&self, item_id: &str, error: &BidError) {
        self.record_rejection(item_id, error.kind());
    }

    /// A bid the session accepted but the ledger refused.
    pub fn record_sink_rejected(&self, item_id: &str) {
        self.record_rejection(item_id, "sink");
    }

    fn record_rejection(&self, item_id: &str, reason: &str) {
        self.inner.bids_rejected.fetch_add(1, Ordering::Relaxed);
        self.touch();

        info!(
            target: "metrics",
            event = "bid_rejected",
            item = %item_id,
            reason,
            total_rejections = self.inner.bids_rejected.load(Ordering::Relaxed),
            "bid rejected"
        );
    }

    fn touch(&self) {
        self.inner
            .last_event_ts
            .store(now_unix_secs(), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sessions_opened: self.inner.sessions_opened.load(Ordering::Relaxed),
            bids_submitted: self.inner.bids_submitted.load(Ordering::Relaxed),
            bids_rejected: self.inner.bids_rejected.load(Ordering::Relaxed),
            last_event_ts: self.inner.last_event_ts.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of current metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub sessions_opened: u64,
    pub bids_submitted: u64,
    pub bids_rejected: u64,
    pub last_event_ts: u64,
}

pub fn log_metrics_snapshot(snapshot: &MetricsSnapshot) {
    info!(
        target: "metrics",
        event = "metrics_snapshot",
        sessions_opened = snapshot.sessions_opened,
        bids_submitted = snapshot.bids_submitted,
        bids_rejected = snapshot.bids_rejected,
        last_event_ts = snapshot.last_event_ts,
        "metrics snapshot"
    );
}
