use super::{Job, Policy, PolicyKind, Priority, Task, Ticks};

/// Task-level fixed priority: the shorter the period, the higher the priority.
#[derive(Debug, Default, Clone, Copy)]
pub struct RateMonotonic;

impl Policy for RateMonotonic {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Rm
    }

    fn priority(&self, task: &Task, _job: &Job, _now: Ticks) -> Priority {
        task.period as Priority
    }
}
