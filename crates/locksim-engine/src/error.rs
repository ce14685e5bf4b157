//! Error types for the decision engine

use crate::process::ProcId;
use thiserror::Error;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Process count exceeds the supported maximum
    #[error("process count {got} exceeds maximum {max}")]
    TooManyProcesses {
        /// Requested process count
        got: usize,
        /// Supported maximum
        max: usize,
    },

    /// Resource type count outside the supported range
    #[error("resource type count {got} outside 1..={max}")]
    BadResourceCount {
        /// Requested resource type count
        got: usize,
        /// Supported maximum
        max: usize,
    },

    /// Process id not present in the process table
    #[error("process {0} not found")]
    ProcessNotFound(ProcId),

    /// A resource vector has the wrong number of components
    #[error("vector of length {got}, expected {expected} resource types")]
    VectorLength {
        /// Actual length
        got: usize,
        /// Expected length (`m`)
        expected: usize,
    },

    /// A request script is longer than the supported maximum
    #[error("script for process {pid} has {got} requests, maximum is {max}")]
    ScriptTooLong {
        /// Offending process
        pid: ProcId,
        /// Script length
        got: usize,
        /// Supported maximum
        max: usize,
    },

    /// A unit count exceeds the supported per-component maximum
    #[error("unit count {got} for resource {resource} exceeds maximum {max}")]
    UnitCountTooLarge {
        /// Supplied unit count
        got: u32,
        /// Resource type index
        resource: usize,
        /// Supported maximum
        max: u32,
    },

    /// Loaded allocation exceeds the declared maximum claim
    #[error("process {pid}: allocation exceeds max for resource {resource}")]
    AllocationExceedsMax {
        /// Offending process
        pid: ProcId,
        /// Resource type index
        resource: usize,
    },

    /// Load count does not match the configured process table
    #[error("{got} process loads for a table of {expected}")]
    LoadCountMismatch {
        /// Loads supplied
        got: usize,
        /// Table size (`n`)
        expected: usize,
    },

    /// Post-mutation ledger inconsistency; the run must not continue
    #[error("ledger invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::ProcessNotFound(ProcId::new(9));
        assert!(err.to_string().contains('9'));

        let err = EngineError::VectorLength { got: 3, expected: 2 };
        assert!(err.to_string().contains("expected 2"));

        let err = EngineError::InvariantViolation("need mismatch".into());
        assert!(err.to_string().contains("need mismatch"));
    }
}
