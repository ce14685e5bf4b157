//! The resource ledger: available pool, process table and the invariants
//! that must hold between rounds.

use crate::error::{EngineError, EngineResult};
use crate::process::{ProcId, ProcState, Process, RequestScript};
use crate::units;
use crate::{M_MAX, N_MAX, UNITS_MAX};
use locksim_metrics::Metrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating policy applied by the request arbiter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Grant only requests that provably keep the state safe (Banker's)
    Avoidance,
    /// Grant whatever is physically available; deadlock stays possible
    Permissive,
}

impl Policy {
    /// Stable lowercase name, used in reports and event rows
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Avoidance => "avoidance",
            Policy::Permissive => "permissive",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial ledger entry and script for one process, consumed by [`System::load`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessLoad {
    /// Maximum claim per resource type
    pub max: Vec<u32>,
    /// Units already held at load time
    pub allocation: Vec<u32>,
    /// Scripted requests, front first
    pub script: Vec<Vec<u32>>,
}

/// The shared allocation state: `available` plus the process table.
///
/// All mutation goes through [`System::load`], the request arbiter and
/// [`System::finalize`], each of which leaves the global invariants
/// satisfied or fails fast.
#[derive(Clone, Debug)]
pub struct System {
    m: usize,
    policy: Policy,
    clock: u64,
    available: Vec<u32>,
    procs: Vec<Process>,
    pub(crate) metrics: Metrics,
}

impl System {
    /// Construct a zeroed system for `n` processes over `m` resource types.
    ///
    /// Every process starts in `New` with empty vectors and no script;
    /// [`System::load`] moves them to `Ready`.
    pub fn new(n: usize, m: usize, policy: Policy) -> EngineResult<Self> {
        if n > N_MAX {
            return Err(EngineError::TooManyProcesses { got: n, max: N_MAX });
        }
        if m == 0 || m > M_MAX {
            return Err(EngineError::BadResourceCount { got: m, max: M_MAX });
        }
        let procs = (0..n).map(|i| Process::idle(ProcId::from(i), m)).collect();
        Ok(Self {
            m,
            policy,
            clock: 0,
            available: vec![0; m],
            procs,
            metrics: Metrics::new(),
        })
    }

    /// Clear all execution state, preserving `n`, `m` and the policy
    pub fn reset(&mut self) {
        self.clock = 0;
        self.metrics.reset();
        self.available = vec![0; self.m];
        for (i, p) in self.procs.iter_mut().enumerate() {
            *p = Process::idle(ProcId::from(i), self.m);
        }
    }

    /// Bulk-load the initial available pool and per-process entries.
    ///
    /// Validates every vector length, the `allocation <= max` contract,
    /// the [`UNITS_MAX`] magnitude cap and the script limits before
    /// touching any state, recomputes `need`, sets
    /// every loaded process to `Ready` and re-checks the global invariants.
    pub fn load(&mut self, available: Vec<u32>, loads: Vec<ProcessLoad>) -> EngineResult<()> {
        if available.len() != self.m {
            return Err(EngineError::VectorLength {
                got: available.len(),
                expected: self.m,
            });
        }
        if loads.len() != self.procs.len() {
            return Err(EngineError::LoadCountMismatch {
                got: loads.len(),
                expected: self.procs.len(),
            });
        }
        for (j, &v) in available.iter().enumerate() {
            if v > UNITS_MAX {
                return Err(EngineError::UnitCountTooLarge {
                    got: v,
                    resource: j,
                    max: UNITS_MAX,
                });
            }
        }
        for (i, load) in loads.iter().enumerate() {
            let pid = ProcId::from(i);
            for v in [&load.max, &load.allocation] {
                if v.len() != self.m {
                    return Err(EngineError::VectorLength {
                        got: v.len(),
                        expected: self.m,
                    });
                }
            }
            for j in 0..self.m {
                // The cap on max also bounds allocation and need, which
                // keeps every release and Work fold inside u32.
                if load.max[j] > UNITS_MAX {
                    return Err(EngineError::UnitCountTooLarge {
                        got: load.max[j],
                        resource: j,
                        max: UNITS_MAX,
                    });
                }
                if load.allocation[j] > load.max[j] {
                    return Err(EngineError::AllocationExceedsMax { pid, resource: j });
                }
            }
            let script = RequestScript::new(load.script.clone());
            Process::check_script(pid, &script, self.m)?;
        }

        self.available = available;
        for (p, load) in self.procs.iter_mut().zip(loads) {
            p.max = load.max;
            p.allocation = load.allocation;
            p.script = RequestScript::new(load.script);
            p.blocked_rounds = 0;
            p.compute_need();
            p.state = ProcState::Ready;
        }
        self.check_invariants()?;
        tracing::debug!(
            n = self.procs.len(),
            m = self.m,
            policy = %self.policy,
            "ledger loaded"
        );
        Ok(())
    }

    /// Return a process's entire allocation to the pool and clear its claim.
    ///
    /// Used when a process finishes; afterwards its `need` is the zero
    /// vector, so the fixed-point algorithms treat it as finishable.
    pub fn release_all(&mut self, pid: ProcId) -> EngineResult<()> {
        let idx = self.index_of(pid)?;
        let p = &mut self.procs[idx];
        units::add_assign(&mut self.available, &p.allocation);
        p.allocation.fill(0);
        p.need.fill(0);
        p.max.fill(0);
        Ok(())
    }

    /// Mark a process `Finished` and release everything it holds
    pub(crate) fn finalize(&mut self, pid: ProcId) -> EngineResult<()> {
        self.release_all(pid)?;
        let idx = pid.as_index();
        self.procs[idx].state = ProcState::Finished;
        tracing::debug!(pid = %pid, clock = self.clock, "process finished");
        Ok(())
    }

    /// Verify the global invariants of a well-formed ledger.
    ///
    /// Called after every load and after every mutation that is not
    /// immediately rolled back; a failure here is fatal to the run.
    pub fn check_invariants(&self) -> EngineResult<()> {
        if self.available.len() != self.m {
            return Err(EngineError::InvariantViolation(format!(
                "available vector of length {}, expected {}",
                self.available.len(),
                self.m
            )));
        }
        for p in &self.procs {
            p.check_invariants(self.m)?;
        }
        Ok(())
    }

    /// Number of processes (`n`)
    pub fn process_count(&self) -> usize {
        self.procs.len()
    }

    /// Number of resource types (`m`)
    pub fn resource_types(&self) -> usize {
        self.m
    }

    /// Active arbitration policy
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Logical clock, one tick per simulation round
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Advance the logical clock by one tick
    pub(crate) fn tick(&mut self) {
        self.clock += 1;
    }

    /// Units of each resource type currently unallocated
    pub fn available(&self) -> &[u32] {
        &self.available
    }

    /// The process table, in id order
    pub fn processes(&self) -> &[Process] {
        &self.procs
    }

    /// One process table entry
    pub fn process(&self, pid: ProcId) -> EngineResult<&Process> {
        let idx = self.index_of(pid)?;
        Ok(&self.procs[idx])
    }

    /// Run counters accumulated so far
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub(crate) fn index_of(&self, pid: ProcId) -> EngineResult<usize> {
        let idx = pid.as_index();
        if idx < self.procs.len() {
            Ok(idx)
        } else {
            Err(EngineError::ProcessNotFound(pid))
        }
    }

    pub(crate) fn procs_mut(&mut self) -> &mut [Process] {
        &mut self.procs
    }

    pub(crate) fn set_state(&mut self, pid: ProcId, state: ProcState) {
        self.procs[pid.as_index()].state = state;
    }

    /// Apply a granted request: `available -= r; allocation += r; need -= r`
    pub(crate) fn apply_request(&mut self, idx: usize, request: &[u32]) {
        units::sub_assign(&mut self.available, request);
        let p = &mut self.procs[idx];
        units::add_assign(&mut p.allocation, request);
        units::sub_assign(&mut p.need, request);
    }

    /// Exact inverse of [`System::apply_request`]
    pub(crate) fn rollback_request(&mut self, idx: usize, request: &[u32]) {
        units::add_assign(&mut self.available, request);
        let p = &mut self.procs[idx];
        units::sub_assign(&mut p.allocation, request);
        units::add_assign(&mut p.need, request);
    }
}
