pub mod monitoring;
pub mod replay;
pub mod session;
pub mod storage;
pub mod types;
pub mod utils;
pub mod valuation;

pub use crate::types::*;
