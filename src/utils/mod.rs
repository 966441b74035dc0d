//! Utility types shared by the crawl engine.
//!
//! This module provides:
//! - A single-use stopwatch for request and phase timing
//! - A bounded worker pool used for page and asset fan-out

mod pool;
mod timing;

pub use pool::{Pool, Slot};
pub use timing::{duration_to_ms, Timer, TimerResult};
