//! Deadlock detection: the Work/Finish fixed point applied to the actual
//! allocation state.

use crate::ledger::System;
use crate::safety;

/// True iff at least one process can never complete under the current
/// allocation.
///
/// Structurally the same fixed point as [`crate::is_safe`], but run
/// against the actual state rather than a hypothetical post-grant one, and
/// used purely as a diagnostic under the permissive policy: it never
/// grants, denies or mutates anything.
pub fn detect_deadlock(system: &System) -> bool {
    safety::finishable_set(system).iter().any(|&f| !f)
}
