//! Banker's safety algorithm: Work/Finish fixed point over a ledger
//! snapshot.

use crate::ledger::System;
use crate::units;

/// Run the Work/Finish fixed point and report which processes can finish,
/// indexed by process id.
///
/// `work` starts at `available`; a process with zero `need` is finishable
/// outright. Each pass scans processes in ascending id order and folds the
/// allocation of every process whose `need` fits in `work` back into
/// `work`, until a full pass makes no progress. The ascending scan order
/// is an arbitrary tie-break but must stay fixed so that measurement runs
/// replay identically.
pub fn finishable_set(system: &System) -> Vec<bool> {
    let procs = system.processes();
    let mut work = system.available().to_vec();
    let mut finish: Vec<bool> = procs.iter().map(|p| units::is_zero(p.need())).collect();

    let mut progress = true;
    while progress {
        progress = false;
        for (i, p) in procs.iter().enumerate() {
            if finish[i] {
                continue;
            }
            if units::leq(p.need(), &work) {
                units::add_assign(&mut work, p.allocation());
                finish[i] = true;
                progress = true;
            }
        }
    }
    finish
}

/// True iff some completion order exists for every process.
///
/// Read-only; the caller decides whether the snapshot is the actual state
/// or a tentative post-grant state.
pub fn is_safe(system: &System) -> bool {
    finishable_set(system).iter().all(|&f| f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Policy, ProcessLoad, System};

    fn load_system(available: Vec<u32>, loads: Vec<ProcessLoad>) -> System {
        let m = available.len();
        let mut sys = System::new(loads.len(), m, Policy::Avoidance).unwrap();
        sys.load(available, loads).unwrap();
        sys
    }

    fn entry(max: Vec<u32>, allocation: Vec<u32>) -> ProcessLoad {
        ProcessLoad {
            max,
            allocation,
            script: vec![],
        }
    }

    #[test]
    fn test_empty_system_is_safe() {
        let sys = System::new(0, 1, Policy::Avoidance).unwrap();
        assert!(is_safe(&sys));
    }

    #[test]
    fn test_textbook_safe_state() {
        // Classic five-process, three-resource example; safe order exists
        // (P1, P3, P4, P0, P2 among others).
        let sys = load_system(
            vec![3, 3, 2],
            vec![
                entry(vec![7, 5, 3], vec![0, 1, 0]),
                entry(vec![3, 2, 2], vec![2, 0, 0]),
                entry(vec![9, 0, 2], vec![3, 0, 2]),
                entry(vec![2, 2, 2], vec![2, 1, 1]),
                entry(vec![4, 3, 3], vec![0, 0, 2]),
            ],
        );
        assert!(is_safe(&sys));
    }

    #[test]
    fn test_unsafe_state() {
        // Nothing available, both processes still need a unit the other holds.
        let sys = load_system(
            vec![0, 0],
            vec![
                entry(vec![1, 1], vec![1, 0]),
                entry(vec![1, 1], vec![0, 1]),
            ],
        );
        assert!(!is_safe(&sys));

        let finish = finishable_set(&sys);
        assert_eq!(finish, vec![false, false]);
    }

    #[test]
    fn test_zero_need_processes_are_finishable() {
        // A process that already holds its whole claim finishes and frees
        // enough for the other to follow.
        let sys = load_system(
            vec![0, 0],
            vec![
                entry(vec![2, 1], vec![2, 1]),
                entry(vec![2, 1], vec![0, 0]),
            ],
        );
        assert!(is_safe(&sys));
    }

    #[test]
    fn test_safety_is_read_only() {
        let sys = load_system(vec![1, 1], vec![entry(vec![2, 2], vec![1, 1])]);
        let before = sys.clone();
        let _ = is_safe(&sys);
        assert_eq!(sys.available(), before.available());
        assert_eq!(sys.processes(), before.processes());
    }
}
