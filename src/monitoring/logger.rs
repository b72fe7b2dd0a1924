use serde::Serialize;
use tracing::info;

use crate::types::{AppConfig, Dollars};

#[derive(Serialize)]
struct StartupLog<'a> {
    event: &'a str,
    base_minimum: Dollars,
    maximum_bid: Dollars,
    opening_margin: Dollars,
    quick_increments: &'a [Dollars],
    track_extent: f64,
}

pub fn log_startup(cfg: &AppConfig) {
    let payload = StartupLog {
        event: "startup",
        base_minimum: cfg.bidding.base_minimum,
        maximum_bid: cfg.bidding.maximum_bid,
        opening_margin: cfg.bidding.opening_margin,
        quick_increments: &cfg.bidding.quick_increments,
        track_extent: cfg.slider.track_extent,
    };
    info!(target: "bid", startup = serde_json::to_string(&payload).unwrap_or_default().as_str());
}
