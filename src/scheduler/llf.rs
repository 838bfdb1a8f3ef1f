use super::{Job, Policy, PolicyKind, Priority, ReadyQueue, Task, Ticks};

/// Job-level dynamic priority: the less slack a job has, the higher its
/// priority.
///
/// Laxity of a waiting job drops by one per tick while the running job's
/// stays put, so every decision point starts by re-ranking the whole queue.
/// Besides arrivals and completions, the ranking can also flip when a waiting
/// job's laxity sinks below the running one's: with a gap `d` between the
/// head and the runner-up that happens `d + 1` ticks from now.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeastLaxityFirst;

impl Policy for LeastLaxityFirst {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Llf
    }

    fn priority(&self, _task: &Task, job: &Job, now: Ticks) -> Priority {
        job.laxity(now)
    }

    fn refresh(&mut self, queue: &mut ReadyQueue, now: Ticks) {
        queue.rebuild(now, |job, t| job.laxity(t));
    }

    fn extra_decision_point(&self, queue: &ReadyQueue, now: Ticks) -> Option<Ticks> {
        let gap = queue.priority_gap()?;
        debug_assert!(gap >= 0, "Runner-up ranked ahead of the queue head");
        Some(now + gap.max(0) as Ticks + 1)
    }
}
