//! Metrics report snapshot and JSON export

use crate::Metrics;
use serde::{Deserialize, Serialize};

/// Snapshot of the run counters, annotated with the run configuration.
///
/// This is the shape written to the optional `--metrics` JSON file and
/// embedded in the run report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricsReport {
    /// Active policy name (`avoidance` or `permissive`)
    pub policy: String,
    /// Number of processes
    pub n: usize,
    /// Number of resource types
    pub m: usize,
    /// Total arbitration calls
    pub total_requests: u64,
    /// Granted requests
    pub grants: u64,
    /// Denied requests
    pub blocks: u64,
    /// Safety-algorithm invocations (avoidance policy only)
    pub safety_calls: u64,
    /// Cumulative nanoseconds spent in the safety algorithm
    pub safety_ns_total: u64,
    /// Confirmed deadlocks (permissive policy only)
    pub deadlocks_found: u64,
    /// Logical clock of the first confirmed deadlock (0 = never)
    pub first_deadlock_tick: u64,
}

impl MetricsReport {
    /// Snapshot an accumulator for a run with the given configuration
    pub fn new(policy: &str, n: usize, m: usize, metrics: &Metrics) -> Self {
        Self {
            policy: policy.to_string(),
            n,
            m,
            total_requests: metrics.total_requests(),
            grants: metrics.grants(),
            blocks: metrics.blocks(),
            safety_calls: metrics.safety_calls(),
            safety_ns_total: metrics.safety_ns_total(),
            deadlocks_found: metrics.deadlocks_found(),
            first_deadlock_tick: metrics.first_deadlock_tick(),
        }
    }

    /// Mean safety-check cost in nanoseconds, if any call was made
    pub fn safety_ns_avg(&self) -> Option<u64> {
        if self.safety_calls == 0 {
            None
        } else {
            Some(self.safety_ns_total / self.safety_calls)
        }
    }

    /// Export the report as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
