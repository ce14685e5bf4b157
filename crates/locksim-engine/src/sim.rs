//! Round-based simulation scheduler.
//!
//! Each round services READY processes in ascending id order, then retries
//! the processes that entered the round BLOCKED, then advances the logical
//! clock. A round in which no process changes state, finishes or is
//! granted anything is terminal: no later round could differ without
//! external intervention.

use crate::detect::detect_deadlock;
use crate::error::EngineResult;
use crate::events::{EventSink, RequestEvent};
use crate::ledger::{Policy, System};
use crate::process::{ProcId, ProcState};
use locksim_metrics::MetricsReport;
use serde::Serialize;

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RunOutcome {
    /// Every process reached FINISHED
    Completed,
    /// A round made no progress; the run cannot continue
    Stalled {
        /// Whether the detector certified a deadlock at the stall
        deadlocked: bool,
    },
}

/// Final state of one process after a run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    /// Process identifier
    pub pid: ProcId,
    /// Lifecycle state at termination
    pub state: ProcState,
    /// Rounds spent re-submitting a denied request
    pub blocked_rounds: u64,
    /// Scripted requests never granted
    pub remaining_requests: usize,
}

/// Everything a caller needs to know about a finished run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// How the run ended
    pub outcome: RunOutcome,
    /// Rounds executed (= final logical clock)
    pub rounds: u64,
    /// Per-process final states, in id order
    pub processes: Vec<ProcessSummary>,
    /// Run counters
    pub metrics: MetricsReport,
}

/// Drives a loaded [`System`] through its request scripts until every
/// process finishes or a round stalls.
pub struct Simulator {
    system: System,
}

impl Simulator {
    /// Wrap a loaded system
    pub fn new(system: System) -> Self {
        Self { system }
    }

    /// The simulated system
    pub fn system(&self) -> &System {
        &self.system
    }

    /// Give the system back, e.g. to reset and reload it
    pub fn into_system(self) -> System {
        self.system
    }

    /// Run rounds until termination, emitting one event per arbitration.
    ///
    /// Sink failures are the sink's problem; they never change the
    /// schedule or the outcome.
    pub fn run(&mut self, sink: &mut dyn EventSink) -> EngineResult<RunReport> {
        let outcome = loop {
            if self.all_finished() {
                tracing::debug!(clock = self.system.clock(), "all processes finished");
                break RunOutcome::Completed;
            }

            let progress = self.step_round(sink)?;
            if !progress {
                let mut deadlocked = false;
                if self.system.policy() == Policy::Permissive && self.any_blocked() {
                    deadlocked = detect_deadlock(&self.system);
                    if deadlocked {
                        let clock = self.system.clock();
                        self.system.metrics.record_deadlock(clock);
                        tracing::info!(clock, "deadlock detected at stall");
                    }
                }
                tracing::debug!(
                    clock = self.system.clock(),
                    deadlocked,
                    "round made no progress, terminating"
                );
                break RunOutcome::Stalled { deadlocked };
            }
        };

        Ok(self.report(outcome))
    }

    /// Execute one round; true iff the round made progress.
    ///
    /// The BLOCKED pass only covers processes that entered the round
    /// blocked: a process denied in the READY pass has already issued its
    /// one request for this round.
    fn step_round(&mut self, sink: &mut dyn EventSink) -> EngineResult<bool> {
        let n = self.system.process_count();
        let blocked_at_entry: Vec<ProcId> = self
            .system
            .processes()
            .iter()
            .filter(|p| p.state() == ProcState::Blocked)
            .map(|p| p.id())
            .collect();

        let mut progress = false;

        // READY pass
        for idx in 0..n {
            let pid = ProcId::from(idx);
            if self.system.processes()[idx].state() != ProcState::Ready {
                continue;
            }
            let pending = self.system.processes()[idx]
                .script()
                .peek()
                .map(<[u32]>::to_vec);
            match pending {
                None => {
                    self.system.finalize(pid)?;
                    progress = true;
                }
                Some(request) => {
                    if self.submit(pid, &request, sink)? {
                        progress = true;
                    } else {
                        self.system.set_state(pid, ProcState::Blocked);
                        progress = true; // lifecycle state changed
                    }
                }
            }
        }

        // BLOCKED pass: retry the same front request, never a re-derived one
        for pid in blocked_at_entry {
            if self.system.processes()[pid.as_index()].state() != ProcState::Blocked {
                continue;
            }
            let request = self.system.processes()[pid.as_index()]
                .script()
                .peek()
                .map(<[u32]>::to_vec);
            // A blocked process always has a pending request; its script
            // cannot be exhausted while a request is still denied.
            let Some(request) = request else { continue };

            if self.submit(pid, &request, sink)? {
                progress = true;
            } else {
                self.system_proc_mut(pid).blocked_rounds += 1;
            }
        }

        self.system.tick();
        Ok(progress)
    }

    /// Arbitrate one request, emit the event, and settle the process state.
    ///
    /// Returns true iff the request was granted.
    fn submit(
        &mut self,
        pid: ProcId,
        request: &[u32],
        sink: &mut dyn EventSink,
    ) -> EngineResult<bool> {
        self.system.set_state(pid, ProcState::Running);
        let verdict = self.system.handle_request(pid, request)?;
        let granted = verdict.is_granted();

        sink.record(&RequestEvent {
            clock: self.system.clock(),
            pid,
            policy: self.system.policy(),
            granted,
            request: request.to_vec(),
            available: self.system.available().to_vec(),
        });

        if granted {
            let exhausted = {
                let p = self.system_proc_mut(pid);
                p.script.advance();
                p.script.is_exhausted()
            };
            if exhausted {
                self.system.finalize(pid)?;
            } else {
                self.system.set_state(pid, ProcState::Ready);
            }
        } else {
            self.system.set_state(pid, ProcState::Blocked);
        }
        Ok(granted)
    }

    fn system_proc_mut(&mut self, pid: ProcId) -> &mut crate::process::Process {
        let idx = pid.as_index();
        &mut self.system.procs_mut()[idx]
    }

    fn all_finished(&self) -> bool {
        self.system
            .processes()
            .iter()
            .all(|p| p.state() == ProcState::Finished)
    }

    fn any_blocked(&self) -> bool {
        self.system
            .processes()
            .iter()
            .any(|p| p.state() == ProcState::Blocked)
    }

    fn report(&self, outcome: RunOutcome) -> RunReport {
        let processes = self
            .system
            .processes()
            .iter()
            .map(|p| ProcessSummary {
                pid: p.id(),
                state: p.state(),
                blocked_rounds: p.blocked_rounds(),
                remaining_requests: p.script().remaining(),
            })
            .collect();
        let metrics = MetricsReport::new(
            self.system.policy().as_str(),
            self.system.process_count(),
            self.system.resource_types(),
            self.system.metrics(),
        );
        RunReport {
            outcome,
            rounds: self.system.clock(),
            processes,
            metrics,
        }
    }
}
