//! # locksim-engine
//!
//! Resource-allocation decision engine for the locksim simulator.
//!
//! This crate implements the core of the model: the resource ledger with
//! its invariants, the Banker's safety algorithm, the read-only deadlock
//! detector, the request arbiter (avoidance and permissive policies) and
//! the round-based scheduler that drives processes through their request
//! scripts.
//!
//! Features:
//! - Per-process allocation/claim/need bookkeeping with fail-fast loading
//! - Work/Finish fixed-point safety check with rollback-exact denial
//! - Deadlock detection on the actual allocation state
//! - Deterministic round scheduling with stall detection
//! - Pluggable event sink for arbitration decisions

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arbiter;
mod detect;
mod error;
mod events;
mod ledger;
mod process;
mod safety;
mod sim;
mod units;

pub use arbiter::Verdict;
pub use detect::detect_deadlock;
pub use error::{EngineError, EngineResult};
pub use events::{EventSink, MemorySink, NullSink, RequestEvent};
pub use ledger::{Policy, ProcessLoad, System};
pub use process::{ProcId, ProcState, Process, RequestScript};
pub use safety::{finishable_set, is_safe};
pub use sim::{ProcessSummary, RunOutcome, RunReport, Simulator};

/// Maximum number of processes in one run
pub const N_MAX: usize = 1024;
/// Maximum number of resource types in one run
pub const M_MAX: usize = 32;
/// Maximum number of scripted requests per process
pub const SCRIPT_MAX: usize = 64;
/// Maximum units of one resource type in the pool or one process's claim.
///
/// Bounded so that the conservation total `available + Σ allocation`
/// stays inside `u32` even with [`N_MAX`] processes at the cap.
pub const UNITS_MAX: u32 = 1_000_000;
