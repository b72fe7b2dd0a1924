use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    monitoring::metrics::{log_metrics_snapshot, METRICS},
    replay::{
        config::ReplayConfig,
        core::{run_replay_sessions, ReplayResult},
    },
};

/// Replay every scripted session from `cfg` and log a summary.
pub fn run_replay(cfg: ReplayConfig) -> anyhow::Result<ReplayResult> {
    let started_at = Utc::now();
    let result = run_replay_sessions(
        &cfg.sessions,
        &cfg.bidding,
        cfg.slider.track_extent,
        started_at,
        &METRICS,
    );

    for rejection in &result.rejections {
        warn!(
            target: "replay",
            item = %rejection.item_id,
            bidder = %rejection.bidder_id,
            event_index = ?rejection.event_index,
            cause = ?rejection.cause,
            "scripted step rejected"
        );
    }

    log_summary(&result, started_at.to_rfc3339());
    log_metrics_snapshot(&METRICS.snapshot());

    Ok(result)
}

#[derive(Serialize)]
struct ReplaySummary<'a> {
    event: &'a str,
    started_at: String,
    finished_at: String,
    sessions: usize,
    bids_placed: usize,
    auctions_settled: usize,
    rejections: usize,
    total_bid_value: f64,
}

fn log_summary(result: &ReplayResult, started_at: String) {
    let summary = ReplaySummary {
        event: "replay_summary",
        started_at,
        finished_at: Utc::now().to_rfc3339(),
        sessions: result.sessions,
        bids_placed: result.bids.len(),
        auctions_settled: result.winners.len(),
        rejections: result.rejections.len(),
        total_bid_value: result.bids.iter().map(|b| b.amount).sum(),
    };

    let payload = serde_json::to_string(&summary)
        .unwrap_or_else(|_| "{\"event\":\"replay_summary_error\"}".to_string());
    info!(target: "replay", "{payload}");
}
