//! Request arbiter: applies the active policy to a single request and
//! performs the ledger mutation, or rejects with no trace.

use crate::error::{EngineError, EngineResult};
use crate::ledger::{Policy, System};
use crate::process::ProcId;
use crate::safety::is_safe;
use std::time::Instant;

/// Outcome of one arbitration call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Request applied to the ledger
    Granted,
    /// Request refused; the ledger is untouched
    Denied,
}

impl Verdict {
    /// True for [`Verdict::Granted`]
    pub fn is_granted(&self) -> bool {
        matches!(self, Verdict::Granted)
    }
}

impl System {
    /// Arbitrate one request from `pid` under the active policy.
    ///
    /// Preconditions, checked before any mutation: the request must not
    /// exceed the process's remaining `need` nor the `available` pool in
    /// any component. A violation is an immediate deny.
    ///
    /// Under [`Policy::Permissive`] a request passing the preconditions is
    /// granted outright. Under [`Policy::Avoidance`] the mutation is
    /// applied tentatively and kept only if the resulting state passes the
    /// safety check; otherwise it is rolled back exactly. The safety call
    /// is timed and counted whether or not it approves the grant.
    ///
    /// A wrong-length request vector or an unknown `pid` is a caller bug,
    /// not a deny, and reports an error without counting a request.
    pub fn handle_request(&mut self, pid: ProcId, request: &[u32]) -> EngineResult<Verdict> {
        let idx = self.index_of(pid)?;
        if request.len() != self.resource_types() {
            return Err(EngineError::VectorLength {
                got: request.len(),
                expected: self.resource_types(),
            });
        }

        self.metrics.record_request();

        let p = &self.processes()[idx];
        for j in 0..self.resource_types() {
            if request[j] > p.need()[j] || request[j] > self.available()[j] {
                tracing::debug!(
                    pid = %pid,
                    resource = j,
                    requested = request[j],
                    need = p.need()[j],
                    available = self.available()[j],
                    "request denied: precondition"
                );
                self.metrics.record_block();
                return Ok(Verdict::Denied);
            }
        }

        match self.policy() {
            Policy::Permissive => {
                self.apply_request(idx, request);
                self.metrics.record_grant();
                self.check_invariants()?;
                Ok(Verdict::Granted)
            }
            Policy::Avoidance => {
                self.apply_request(idx, request);
                let start = Instant::now();
                let safe = is_safe(self);
                self.metrics
                    .record_safety_call(start.elapsed().as_nanos() as u64);

                if safe {
                    self.metrics.record_grant();
                    self.check_invariants()?;
                    Ok(Verdict::Granted)
                } else {
                    self.rollback_request(idx, request);
                    tracing::debug!(pid = %pid, "request denied: unsafe state");
                    self.metrics.record_block();
                    Ok(Verdict::Denied)
                }
            }
        }
    }
}
