//! Property tests for the ledger and arbiter: unit conservation, exact
//! rollback on denial, and invariant preservation under arbitrary input.

use locksim_engine::{finishable_set, is_safe, Policy, ProcId, ProcessLoad, System, Verdict};
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct Setup {
    policy: Policy,
    available: Vec<u32>,
    loads: Vec<ProcessLoad>,
    target: usize,
    request: Vec<u32>,
}

fn arb_setup() -> impl Strategy<Value = Setup> {
    (1usize..=3, 1usize..=4).prop_flat_map(|(m, n)| {
        let proc_entry = prop::collection::vec(0u32..=4, m).prop_flat_map(move |max| {
            let allocation: Vec<_> = max.iter().map(|&mx| 0u32..=mx).collect();
            let script = prop::collection::vec(prop::collection::vec(0u32..=3, m), 0..=3);
            (Just(max), allocation, script)
        });
        (
            prop::collection::vec(0u32..=4, m),
            prop::collection::vec(proc_entry, n),
            0usize..n,
            prop::collection::vec(0u32..=5, m),
            prop::bool::ANY,
        )
            .prop_map(|(available, procs, target, request, avoidance)| Setup {
                policy: if avoidance {
                    Policy::Avoidance
                } else {
                    Policy::Permissive
                },
                available,
                loads: procs
                    .into_iter()
                    .map(|(max, allocation, script)| ProcessLoad {
                        max,
                        allocation,
                        script,
                    })
                    .collect(),
                target,
                request,
            })
    })
}

fn loaded_system(setup: &Setup) -> System {
    let mut sys = System::new(setup.loads.len(), setup.available.len(), setup.policy)
        .expect("bounds are within limits by construction");
    sys.load(setup.available.clone(), setup.loads.clone())
        .expect("generated loads satisfy the load contract");
    sys
}

fn total_units(sys: &System) -> Vec<u32> {
    let mut total = sys.available().to_vec();
    for p in sys.processes() {
        for (t, a) in total.iter_mut().zip(p.allocation()) {
            *t += a;
        }
    }
    total
}

proptest! {
    #[test]
    fn denial_leaves_the_ledger_bit_identical(setup in arb_setup()) {
        let mut sys = loaded_system(&setup);
        let avail_before = sys.available().to_vec();
        let procs_before = sys.processes().to_vec();

        let verdict = sys.handle_request(ProcId::from(setup.target), &setup.request).unwrap();
        if verdict == Verdict::Denied {
            prop_assert_eq!(sys.available(), &avail_before[..]);
            prop_assert_eq!(sys.processes().to_vec(), procs_before);
        }
    }

    #[test]
    fn arbitration_preserves_invariants_and_units(setup in arb_setup()) {
        let mut sys = loaded_system(&setup);
        let total_before = total_units(&sys);

        let _ = sys.handle_request(ProcId::from(setup.target), &setup.request).unwrap();

        sys.check_invariants().unwrap();
        prop_assert_eq!(total_units(&sys), total_before);
    }

    #[test]
    fn safe_grants_never_unfinish_a_finishable_process(setup in arb_setup()) {
        // Avoidance only grants requests that keep the state safe, so a
        // grant may never turn a previously-finishable process
        // non-finishable.
        let mut sys = System::new(setup.loads.len(), setup.available.len(), Policy::Avoidance)
            .expect("bounds are within limits by construction");
        sys.load(setup.available.clone(), setup.loads.clone())
            .expect("generated loads satisfy the load contract");

        let before = finishable_set(&sys);
        let verdict = sys.handle_request(ProcId::from(setup.target), &setup.request).unwrap();
        if verdict == Verdict::Granted {
            prop_assert!(is_safe(&sys));
            let after = finishable_set(&sys);
            for (b, a) in before.iter().zip(&after) {
                prop_assert!(!b || *a);
            }
        }
    }

    #[test]
    fn full_runs_conserve_units(setup in arb_setup()) {
        let sys = loaded_system(&setup);
        let total_before = total_units(&sys);

        let mut sim = locksim_engine::Simulator::new(sys);
        let report = sim.run(&mut locksim_engine::NullSink).unwrap();

        let sys = sim.system();
        sys.check_invariants().unwrap();
        prop_assert_eq!(total_units(sys), total_before);
        prop_assert_eq!(
            report.metrics.total_requests,
            report.metrics.grants + report.metrics.blocks
        );
    }
}
