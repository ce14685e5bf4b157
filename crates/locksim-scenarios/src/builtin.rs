//! The built-in scenarios.
//!
//! Each keeps the contract `max = allocation + Σ script` so the avoidance
//! policy has an accurate claim to reason about.

use crate::{ProcessSpec, Scenario};

/// Two processes, two resource types, completes under both policies
pub(crate) fn tiny() -> Scenario {
    Scenario {
        name: "tiny".to_string(),
        available: vec![3, 3],
        processes: vec![
            ProcessSpec {
                max: vec![3, 2],
                allocation: vec![0, 1],
                script: vec![vec![1, 0], vec![2, 1]],
            },
            ProcessSpec {
                max: vec![2, 2],
                allocation: vec![2, 0],
                script: vec![vec![0, 2]],
            },
        ],
    }
}

/// Two processes holding one unit each and wanting the other's: a
/// guaranteed circular wait under the permissive policy
pub(crate) fn deadlock() -> Scenario {
    Scenario {
        name: "deadlock".to_string(),
        available: vec![0, 0],
        processes: vec![
            ProcessSpec {
                max: vec![1, 1],
                allocation: vec![1, 0],
                script: vec![vec![0, 1]],
            },
            ProcessSpec {
                max: vec![1, 1],
                allocation: vec![0, 1],
                script: vec![vec![1, 0]],
            },
        ],
    }
}

/// Six processes over three resource types with moderate contention:
/// enough units for progress, not enough for everything at once, so the
/// avoidance policy blocks some requests until others release
pub(crate) fn medium() -> Scenario {
    Scenario {
        name: "medium".to_string(),
        available: vec![2, 2, 1],
        processes: vec![
            ProcessSpec {
                max: vec![2, 1, 1],
                allocation: vec![1, 0, 0],
                script: vec![vec![1, 0, 1], vec![0, 1, 0]],
            },
            ProcessSpec {
                max: vec![1, 1, 1],
                allocation: vec![0, 1, 0],
                script: vec![vec![1, 0, 0], vec![0, 0, 1]],
            },
            ProcessSpec {
                max: vec![1, 1, 1],
                allocation: vec![0, 0, 1],
                script: vec![vec![1, 1, 0]],
            },
            ProcessSpec {
                max: vec![1, 1, 2],
                allocation: vec![1, 0, 1],
                script: vec![vec![0, 1, 0], vec![0, 0, 1]],
            },
            ProcessSpec {
                max: vec![1, 1, 1],
                allocation: vec![0, 1, 1],
                script: vec![vec![1, 0, 0]],
            },
            ProcessSpec {
                max: vec![1, 1, 1],
                allocation: vec![0, 0, 0],
                script: vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]],
            },
        ],
    }
}
