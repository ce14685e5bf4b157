//! Full runs of the built-in scenarios under both policies.

use locksim_engine::{NullSink, Policy, ProcState, RunOutcome, RunReport, Simulator};
use locksim_scenarios::Scenario;

fn run(name: &str, policy: Policy) -> (RunReport, Simulator) {
    let sys = Scenario::by_name(name)
        .unwrap()
        .build_system(policy)
        .unwrap();
    let mut sim = Simulator::new(sys);
    let report = sim.run(&mut NullSink).unwrap();
    (report, sim)
}

#[test]
fn tiny_completes_under_both_policies() {
    for policy in [Policy::Avoidance, Policy::Permissive] {
        let (report, sim) = run("tiny", policy);
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.metrics.grants, 3);
        // Free pool [3,3] plus the released holdings [2,1].
        assert_eq!(sim.system().available(), &[5, 4]);
    }
}

#[test]
fn deadlock_scenario_deadlocks_only_when_permitted_to() {
    let (report, _) = run("deadlock", Policy::Permissive);
    assert_eq!(report.outcome, RunOutcome::Stalled { deadlocked: true });
    assert_eq!(report.metrics.deadlocks_found, 1);
    assert_eq!(report.metrics.first_deadlock_tick, report.rounds);
    assert!(report
        .processes
        .iter()
        .all(|p| p.state == ProcState::Blocked));

    let (report, _) = run("deadlock", Policy::Avoidance);
    assert_eq!(report.outcome, RunOutcome::Stalled { deadlocked: false });
    assert_eq!(report.metrics.grants, 0);
    assert_eq!(report.metrics.deadlocks_found, 0);
}

#[test]
fn medium_completes_under_both_policies() {
    for policy in [Policy::Avoidance, Policy::Permissive] {
        let (report, sim) = run("medium", policy);
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert!(report
            .processes
            .iter()
            .all(|p| p.state == ProcState::Finished && p.remaining_requests == 0));
        // All eleven scripted requests are eventually granted, some after
        // a blocked retry.
        assert_eq!(report.metrics.grants, 11);
        assert_eq!(
            report.metrics.total_requests,
            report.metrics.grants + report.metrics.blocks
        );
        // Every held unit comes back: [2,2,1] free plus [2,2,3] held.
        assert_eq!(sim.system().available(), &[4, 4, 4]);
    }
}

#[test]
fn avoidance_charges_safety_calls_only_past_the_preconditions() {
    let (report, _) = run("medium", Policy::Avoidance);
    assert!(report.metrics.safety_calls > 0);
    assert!(report.metrics.safety_calls <= report.metrics.total_requests);

    let (report, _) = run("medium", Policy::Permissive);
    assert_eq!(report.metrics.safety_calls, 0);
    assert_eq!(report.metrics.safety_ns_total, 0);
}
