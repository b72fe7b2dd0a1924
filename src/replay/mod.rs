pub mod config;
pub mod core;
pub mod runner;

pub use config::{ReplayConfig, ReplayEvent, ReplaySession};
pub use self::core::{RejectionCause, ReplayRejection, ReplayResult};
