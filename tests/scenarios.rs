//! End-to-end scenarios with frozen timelines.

use rtsched_model::{
    PolicyKind, Schedule, TaskSet,
    core::{DeadlineMiss, JobLabel, SimEvent},
    sim::analysis,
};

const IDLE: Option<JobLabel> = None;

fn busy(task: usize, instance: u64) -> Option<JobLabel> {
    Some(JobLabel::new(task, instance))
}

fn synchronous(rows: &[(u64, u64, u64)]) -> TaskSet {
    TaskSet::from_rows(rows.iter().map(|&(p, c, d)| (0, p, c, d))).unwrap()
}

fn simulate(tasks: &TaskSet, policy: PolicyKind) -> Schedule {
    let horizon = analysis::hyperperiod(tasks).unwrap();
    policy.simulate(tasks, horizon)
}

fn classic() -> TaskSet {
    synchronous(&[(4, 1, 4), (5, 2, 5), (20, 4, 20)])
}

#[test]
#[rustfmt::skip]
fn classic_set_rm_golden() {
    let schedule = simulate(&classic(), PolicyKind::Rm);
    let expected = [
        busy(0, 1), busy(1, 1), busy(1, 1), busy(2, 1), busy(0, 2), busy(1, 2), busy(1, 2),
        busy(2, 1), busy(0, 3), busy(2, 1), busy(1, 3), busy(1, 3), busy(0, 4), busy(2, 1),
        IDLE, busy(1, 4), busy(0, 5), busy(1, 4), IDLE, IDLE,
    ];
    assert_eq!(schedule.timeline.slots(), &expected);
    assert!(schedule.meets_all_deadlines());
}

#[test]
#[rustfmt::skip]
fn classic_set_edf_golden() {
    let schedule = simulate(&classic(), PolicyKind::Edf);
    let expected = [
        busy(0, 1), busy(1, 1), busy(1, 1), busy(2, 1), busy(0, 2), busy(1, 2), busy(1, 2),
        busy(2, 1), busy(0, 3), busy(2, 1), busy(1, 3), busy(1, 3), busy(0, 4), busy(2, 1),
        IDLE, busy(1, 4), busy(1, 4), busy(0, 5), IDLE, IDLE,
    ];
    assert_eq!(schedule.timeline.slots(), &expected);
    assert!(schedule.meets_all_deadlines());
}

#[test]
fn classic_set_llf_matches_edf() {
    let tasks = classic();
    let llf = simulate(&tasks, PolicyKind::Llf);
    let edf = simulate(&tasks, PolicyKind::Edf);
    assert_eq!(llf.timeline, edf.timeline);
}

#[test]
fn classic_set_pair_form() {
    let schedule = simulate(&classic(), PolicyKind::Rm);
    let pairs = schedule.timeline.as_pairs();
    assert_eq!(pairs.len(), 20);
    assert_eq!(&pairs[..4], &[(0, 1), (1, 1), (1, 1), (2, 1)]);
    assert_eq!(pairs[14], (-1, -1));
    assert_eq!(&pairs[18..], &[(-1, -1), (-1, -1)]);
}

#[test]
fn rm_and_edf_split_on_deadline_tie_breaks() {
    // At t=16 J1,4 (deadline 20) is queued and J0,5 arrives with deadline 20:
    // EDF keeps the earlier entry, RM prefers the shorter period.
    let tasks = classic();
    let rm = simulate(&tasks, PolicyKind::Rm);
    let edf = simulate(&tasks, PolicyKind::Edf);
    assert_eq!(rm.timeline.at(16), busy(0, 5));
    assert_eq!(edf.timeline.at(16), busy(1, 4));
    for tick in (0..16).chain(18..20) {
        assert_eq!(rm.timeline.at(tick), edf.timeline.at(tick), "tick {tick}");
    }
}

#[test]
#[rustfmt::skip]
fn harmonic_pair_is_identical_under_all_policies() {
    // The laxity crossover never lands before a completion for this pair, so
    // LLF makes the same decisions as EDF.
    let tasks = synchronous(&[(4, 2, 4), (6, 2, 6)]);
    let expected = [
        busy(0, 1), busy(0, 1), busy(1, 1), busy(1, 1), busy(0, 2), busy(0, 2), busy(1, 2),
        busy(1, 2), busy(0, 3), busy(0, 3), IDLE, IDLE,
    ];
    for policy in PolicyKind::ALL {
        let schedule = simulate(&tasks, policy);
        assert_eq!(schedule.timeline.slots(), &expected, "{policy}");
        assert!(schedule.meets_all_deadlines(), "{policy}");
    }
}

#[test]
fn llf_preempts_at_laxity_crossover() {
    // T0 has the later deadline but the smaller laxity (1 vs 2). LLF runs it
    // first; at t = 0 + 1 + 1 the waiting job's laxity drops below T0's and
    // it takes over, between the arrival at 0 and T0's completion at 4.
    let tasks = synchronous(&[(5, 4, 5), (5, 1, 3)]);
    let llf = simulate(&tasks, PolicyKind::Llf);
    let edf = simulate(&tasks, PolicyKind::Edf);

    assert_eq!(
        llf.timeline.slots(),
        &[busy(0, 1), busy(0, 1), busy(1, 1), busy(0, 1), busy(0, 1)]
    );
    assert_eq!(
        edf.timeline.slots(),
        &[busy(1, 1), busy(0, 1), busy(0, 1), busy(0, 1), busy(0, 1)]
    );
    assert_ne!(llf.timeline, edf.timeline);

    assert!(llf.events.contains(&SimEvent::Dispatched {
        at: 2,
        job: JobLabel::new(1, 1),
        preempted: Some(JobLabel::new(0, 1)),
    }));
    // Nothing arrives or completes at 2
    assert!(
        llf.events
            .iter()
            .filter(|event| event.at() == 2)
            .all(|event| matches!(event, SimEvent::Dispatched { .. }))
    );
    assert_eq!(llf.preemptions(), 1);
    assert_eq!(edf.preemptions(), 0);
    assert_eq!(llf.decision_points, 3);
    assert!(llf.meets_all_deadlines());
    assert!(edf.meets_all_deadlines());
}

#[test]
fn rm_misses_are_reported_without_changing_the_schedule() {
    let tasks = synchronous(&[(5, 4, 5), (5, 1, 3)]);
    let rm = simulate(&tasks, PolicyKind::Rm);
    assert_eq!(
        rm.timeline.slots(),
        &[busy(0, 1), busy(0, 1), busy(0, 1), busy(0, 1), busy(1, 1)]
    );
    assert_eq!(
        rm.deadline_misses(),
        vec![DeadlineMiss::Late {
            job: JobLabel::new(1, 1),
            deadline: 3,
            lateness: 2,
        }]
    );
    assert!(rm.events.contains(&SimEvent::Completed {
        at: 5,
        job: JobLabel::new(1, 1),
        lateness: 2,
    }));
}

#[test]
#[rustfmt::skip]
fn full_utilization_pair() {
    let tasks = synchronous(&[(4, 2, 4), (6, 3, 6)]);

    let rm = simulate(&tasks, PolicyKind::Rm);
    assert_eq!(
        rm.timeline.slots(),
        &[
            busy(0, 1), busy(0, 1), busy(1, 1), busy(1, 1), busy(0, 2), busy(0, 2), busy(1, 1),
            busy(1, 2), busy(0, 3), busy(0, 3), busy(1, 2), busy(1, 2),
        ]
    );
    assert_eq!(
        rm.deadline_misses(),
        vec![DeadlineMiss::Late {
            job: JobLabel::new(1, 1),
            deadline: 6,
            lateness: 1,
        }]
    );

    let edf = simulate(&tasks, PolicyKind::Edf);
    assert_eq!(
        edf.timeline.slots(),
        &[
            busy(0, 1), busy(0, 1), busy(1, 1), busy(1, 1), busy(1, 1), busy(0, 2), busy(0, 2),
            busy(1, 2), busy(1, 2), busy(1, 2), busy(0, 3), busy(0, 3),
        ]
    );
    assert!(edf.meets_all_deadlines());

    let llf = simulate(&tasks, PolicyKind::Llf);
    assert_eq!(
        llf.timeline.slots(),
        &[
            busy(0, 1), busy(0, 1), busy(1, 1), busy(1, 1), busy(1, 1), busy(0, 2), busy(0, 2),
            busy(1, 2), busy(1, 2), busy(0, 3), busy(0, 3), busy(1, 2),
        ]
    );
    assert!(llf.meets_all_deadlines());
    assert_eq!(llf.timeline.busy_ticks(), 12);
}

#[test]
fn overload_leaves_unfinished_jobs() {
    // U = 1.25
    let tasks = synchronous(&[(4, 3, 4), (6, 3, 6)]);
    let edf = simulate(&tasks, PolicyKind::Edf);
    assert_eq!(
        edf.deadline_misses(),
        vec![
            DeadlineMiss::Late {
                job: JobLabel::new(0, 2),
                deadline: 8,
                lateness: 1,
            },
            DeadlineMiss::Unfinished {
                job: JobLabel::new(0, 3),
                deadline: 12,
            },
        ]
    );
    assert_eq!(edf.job(JobLabel::new(0, 3)).unwrap().completed_at, None);
    assert_eq!(edf.timeline.idle_ticks(), 0);

    let rm = simulate(&tasks, PolicyKind::Rm);
    assert_eq!(
        rm.deadline_misses(),
        vec![
            DeadlineMiss::Late {
                job: JobLabel::new(1, 1),
                deadline: 6,
                lateness: 6,
            },
            DeadlineMiss::Unfinished {
                job: JobLabel::new(1, 2),
                deadline: 12,
            },
        ]
    );
}

#[test]
#[rustfmt::skip]
fn arrival_offsets_delay_first_release() {
    let tasks = TaskSet::from_rows([(1, 4, 1, 4), (0, 6, 2, 6), (2, 12, 3, 10)]).unwrap();

    let rm = simulate(&tasks, PolicyKind::Rm);
    assert_eq!(
        rm.timeline.slots(),
        &[
            busy(1, 1), busy(0, 1), busy(1, 1), busy(2, 1), busy(2, 1), busy(0, 2), busy(1, 2),
            busy(1, 2), busy(2, 1), busy(0, 3), IDLE, IDLE,
        ]
    );

    let edf = simulate(&tasks, PolicyKind::Edf);
    assert_eq!(
        edf.timeline.slots(),
        &[
            busy(1, 1), busy(0, 1), busy(1, 1), busy(2, 1), busy(2, 1), busy(0, 2), busy(2, 1),
            busy(1, 2), busy(1, 2), busy(0, 3), IDLE, IDLE,
        ]
    );

    let llf = simulate(&tasks, PolicyKind::Llf);
    assert_eq!(llf.timeline, rm.timeline);

    for schedule in [&rm, &edf, &llf] {
        assert!(schedule.meets_all_deadlines(), "{}", schedule.policy);
        assert_eq!(schedule.jobs.len(), 3 + 2 + 1);
        assert_eq!(schedule.job(JobLabel::new(0, 1)).unwrap().release, 1);
        assert_eq!(schedule.job(JobLabel::new(2, 1)).unwrap().deadline, 12);
    }
}

#[test]
fn idle_start_emits_idle_event() {
    let tasks = TaskSet::from_rows([(3, 6, 1, 6)]).unwrap();
    let schedule = simulate(&tasks, PolicyKind::Edf);
    assert_eq!(
        schedule.timeline.slots(),
        &[IDLE, IDLE, IDLE, busy(0, 1), IDLE, IDLE]
    );
    assert_eq!(schedule.events.first(), Some(&SimEvent::Idle { at: 0 }));
    assert_eq!(
        schedule
            .events
            .iter()
            .filter(|event| matches!(event, SimEvent::Idle { .. }))
            .count(),
        2
    );
}
