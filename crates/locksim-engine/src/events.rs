//! Arbitration event stream: what happened, when, and what was left
//! available afterwards.

use crate::ledger::Policy;
use crate::process::ProcId;
use serde::Serialize;

/// One arbitration decision, emitted after the ledger settled
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestEvent {
    /// Logical clock at the time of the decision
    pub clock: u64,
    /// Requesting process
    pub pid: ProcId,
    /// Policy the decision was made under
    pub policy: Policy,
    /// Whether the request was granted
    pub granted: bool,
    /// The request vector as submitted
    pub request: Vec<u32>,
    /// The available pool after the decision
    pub available: Vec<u32>,
}

/// Append-only, best-effort sink for arbitration events.
///
/// Sinks must never influence simulation outcomes; a sink that fails
/// internally should swallow the failure and report it out of band.
pub trait EventSink {
    /// Record one arbitration decision
    fn record(&mut self, event: &RequestEvent);
}

/// Sink that drops every event
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &RequestEvent) {}
}

/// Sink that keeps every event in memory, mainly for tests and inspection
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Recorded events, oldest first
    pub events: Vec<RequestEvent>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &RequestEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> RequestEvent {
        RequestEvent {
            clock: 1,
            pid: ProcId::new(0),
            policy: Policy::Permissive,
            granted: true,
            request: vec![1, 0],
            available: vec![2, 3],
        }
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let mut sink = MemorySink::new();
        let mut second = sample_event();
        second.clock = 2;
        second.granted = false;

        sink.record(&sample_event());
        sink.record(&second);

        assert_eq!(sink.events.len(), 2);
        assert!(sink.events[0].granted);
        assert_eq!(sink.events[1].clock, 2);
    }

    #[test]
    fn test_null_sink_accepts_events() {
        let mut sink = NullSink;
        sink.record(&sample_event());
    }
}
