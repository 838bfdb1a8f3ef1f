use super::{Job, Policy, PolicyKind, Priority, Task, Ticks};

/// Job-level fixed priority: the earlier the absolute deadline, the higher
/// the priority.
#[derive(Debug, Default, Clone, Copy)]
pub struct EarliestDeadlineFirst;

impl Policy for EarliestDeadlineFirst {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Edf
    }

    fn priority(&self, _task: &Task, job: &Job, _now: Ticks) -> Priority {
        job.deadline as Priority
    }
}
