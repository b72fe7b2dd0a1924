use chrono::{DateTime, Duration, Utc};

/// Countdown the auction room opens with.
pub const AUCTION_ROOM_COUNTDOWN_SECS: i64 = 50 * 60 + 21;

/// Wall-clock deadline of a single auction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuctionClock {
    ends_at: DateTime<Utc>,
}

impl AuctionClock {
    pub fn new(ends_at: DateTime<Utc>) -> Self {
        Self { ends_at }
    }

    /// Clock for an auction starting at `start` and running `duration_secs`.
    pub fn starting_at(start: DateTime<Utc>, duration_secs: i64) -> Self {
        Self::new(start + Duration::seconds(duration_secs))
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Returns seconds remaining until the deadline, never negative.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.ends_at - now).num_seconds().max(0)
    }

    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }
}

/// Short human form of a remaining duration: `2h 15m`, `50m 21s` or `9s`.
pub fn format_time_left(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
