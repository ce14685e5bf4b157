//! Counter accumulator for one simulation run

/// Counters collected over one simulation run.
///
/// The accumulator is owned by the simulated system and mutated only by the
/// request arbiter and the scheduler, so plain integers are enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    total_requests: u64,
    grants: u64,
    blocks: u64,
    safety_calls: u64,
    safety_ns_total: u64,
    deadlocks_found: u64,
    first_deadlock_tick: u64,
}

impl Metrics {
    /// Create a zeroed accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Count one arbitration call, granted or not
    pub fn record_request(&mut self) {
        self.total_requests += 1;
    }

    /// Count one granted request
    pub fn record_grant(&mut self) {
        self.grants += 1;
    }

    /// Count one denied request
    pub fn record_block(&mut self) {
        self.blocks += 1;
    }

    /// Count one safety-algorithm invocation and its elapsed time
    pub fn record_safety_call(&mut self, elapsed_ns: u64) {
        self.safety_calls += 1;
        self.safety_ns_total += elapsed_ns;
    }

    /// Count one confirmed deadlock; the logical clock of the first one is kept
    pub fn record_deadlock(&mut self, clock: u64) {
        self.deadlocks_found += 1;
        if self.first_deadlock_tick == 0 {
            self.first_deadlock_tick = clock;
        }
    }

    /// Total arbitration calls
    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    /// Granted requests
    pub fn grants(&self) -> u64 {
        self.grants
    }

    /// Denied requests
    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    /// Safety-algorithm invocations
    pub fn safety_calls(&self) -> u64 {
        self.safety_calls
    }

    /// Cumulative nanoseconds spent in the safety algorithm
    pub fn safety_ns_total(&self) -> u64 {
        self.safety_ns_total
    }

    /// Confirmed deadlocks
    pub fn deadlocks_found(&self) -> u64 {
        self.deadlocks_found
    }

    /// Logical clock of the first confirmed deadlock (0 = never)
    pub fn first_deadlock_tick(&self) -> u64 {
        self.first_deadlock_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_counters() {
        let mut metrics = Metrics::new();
        metrics.record_request();
        metrics.record_grant();
        metrics.record_request();
        metrics.record_block();

        assert_eq!(metrics.total_requests(), 2);
        assert_eq!(metrics.grants(), 1);
        assert_eq!(metrics.blocks(), 1);
    }

    #[test]
    fn test_safety_accounting() {
        let mut metrics = Metrics::new();
        metrics.record_safety_call(100);
        metrics.record_safety_call(250);

        assert_eq!(metrics.safety_calls(), 2);
        assert_eq!(metrics.safety_ns_total(), 350);
    }

    #[test]
    fn test_first_deadlock_tick_is_sticky() {
        let mut metrics = Metrics::new();
        metrics.record_deadlock(7);
        metrics.record_deadlock(12);

        assert_eq!(metrics.deadlocks_found(), 2);
        assert_eq!(metrics.first_deadlock_tick(), 7);
    }

    #[test]
    fn test_reset() {
        let mut metrics = Metrics::new();
        metrics.record_request();
        metrics.record_grant();
        metrics.record_deadlock(3);

        metrics.reset();
        assert_eq!(metrics, Metrics::new());
    }
}
