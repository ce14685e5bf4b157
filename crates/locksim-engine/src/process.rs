//! Process table entries: identity, lifecycle state, resource vectors and
//! the request script.

use crate::error::{EngineError, EngineResult};
use crate::SCRIPT_MAX;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process identifier, stable for the lifetime of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcId(pub u32);

impl ProcId {
    /// Create a new process ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Position of this process in the process table
    pub fn as_index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ProcId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<usize> for ProcId {
    fn from(id: usize) -> Self {
        Self(id as u32)
    }
}

impl fmt::Display for ProcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Process lifecycle state.
///
/// `Running` exists only while a single request is being arbitrated; no
/// process is `Running` between rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcState {
    /// Constructed, ledger entry not yet loaded
    New,
    /// Ready to issue its next scripted request
    Ready,
    /// A request is being arbitrated (transient within a step)
    Running,
    /// Last request was denied; retried every round
    Blocked,
    /// Script exhausted, resources released; terminal
    Finished,
}

/// An ordered, replayable sequence of request vectors.
///
/// Requests are consumed from the front via a cursor; the items themselves
/// are never mutated, so a blocked process retries exactly the vector it
/// first submitted, and `rewind` restores the script for a fresh run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestScript {
    items: Vec<Vec<u32>>,
    cursor: usize,
}

impl RequestScript {
    /// Script with no requests
    pub fn empty() -> Self {
        Self::default()
    }

    /// Script over the given request vectors, cursor at the front
    pub fn new(items: Vec<Vec<u32>>) -> Self {
        Self { items, cursor: 0 }
    }

    /// The pending front request, if any remains
    pub fn peek(&self) -> Option<&[u32]> {
        self.items.get(self.cursor).map(Vec::as_slice)
    }

    /// Consume the front request; false if already exhausted
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.items.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor back to the front without touching the items
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Requests not yet consumed
    pub fn remaining(&self) -> usize {
        self.items.len() - self.cursor
    }

    /// True once every request has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    /// Total requests in the script, consumed or not
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the script never had any request
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One process table entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Process {
    pub(crate) id: ProcId,
    pub(crate) state: ProcState,
    pub(crate) max: Vec<u32>,
    pub(crate) allocation: Vec<u32>,
    pub(crate) need: Vec<u32>,
    pub(crate) script: RequestScript,
    pub(crate) blocked_rounds: u64,
}

impl Process {
    /// A zeroed entry in the `New` state, with `m`-component vectors
    pub(crate) fn idle(id: ProcId, m: usize) -> Self {
        Self {
            id,
            state: ProcState::New,
            max: vec![0; m],
            allocation: vec![0; m],
            need: vec![0; m],
            script: RequestScript::empty(),
            blocked_rounds: 0,
        }
    }

    /// Process identifier
    pub fn id(&self) -> ProcId {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> ProcState {
        self.state
    }

    /// Maximum claim per resource type
    pub fn max(&self) -> &[u32] {
        &self.max
    }

    /// Units currently held per resource type
    pub fn allocation(&self) -> &[u32] {
        &self.allocation
    }

    /// Remaining claim, `max - allocation`
    pub fn need(&self) -> &[u32] {
        &self.need
    }

    /// The request script
    pub fn script(&self) -> &RequestScript {
        &self.script
    }

    /// Rounds spent re-submitting a denied request
    pub fn blocked_rounds(&self) -> u64 {
        self.blocked_rounds
    }

    /// Recompute `need = max - allocation`
    pub(crate) fn compute_need(&mut self) {
        for j in 0..self.need.len() {
            self.need[j] = self.max[j] - self.allocation[j];
        }
    }

    /// Verify the per-process ledger invariants for `m` resource types
    pub(crate) fn check_invariants(&self, m: usize) -> EngineResult<()> {
        for v in [&self.max, &self.allocation, &self.need] {
            if v.len() != m {
                return Err(EngineError::InvariantViolation(format!(
                    "{}: vector of length {}, expected {m}",
                    self.id,
                    v.len()
                )));
            }
        }
        for j in 0..m {
            if self.allocation[j] > self.max[j] {
                return Err(EngineError::InvariantViolation(format!(
                    "{}: allocation {} exceeds max {} for resource {j}",
                    self.id, self.allocation[j], self.max[j]
                )));
            }
            if self.need[j] != self.max[j] - self.allocation[j] {
                return Err(EngineError::InvariantViolation(format!(
                    "{}: need {} != max {} - allocation {} for resource {j}",
                    self.id, self.need[j], self.max[j], self.allocation[j]
                )));
            }
        }
        Ok(())
    }

    /// Validate a script against the per-process limits
    pub(crate) fn check_script(id: ProcId, script: &RequestScript, m: usize) -> EngineResult<()> {
        if script.len() > SCRIPT_MAX {
            return Err(EngineError::ScriptTooLong {
                pid: id,
                got: script.len(),
                max: SCRIPT_MAX,
            });
        }
        for item in &script.items {
            if item.len() != m {
                return Err(EngineError::VectorLength {
                    got: item.len(),
                    expected: m,
                });
            }
        }
        Ok(())
    }
}
