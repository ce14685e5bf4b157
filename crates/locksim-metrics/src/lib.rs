//! # locksim-metrics
//!
//! Run counters and report export for the locksim simulator.
//!
//! Features:
//! - Counter accumulator for requests, grants and blocks
//! - Safety-check cost accounting (call count + elapsed nanoseconds)
//! - Deadlock occurrence tracking
//! - JSON report export

#![warn(missing_docs)]
#![warn(clippy::all)]

mod accumulator;
mod report;

pub use accumulator::Metrics;
pub use report::MetricsReport;
