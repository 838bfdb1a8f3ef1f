pub mod edf;
pub mod llf;
pub mod rm;

use std::fmt;

use crate::core::{
    Ticks,
    driver::SchedCore,
    queue::ReadyQueue,
    schedule::Schedule,
    state::{Job, Priority, Task},
};
use crate::sim::analysis::PriorityClass;
use crate::sim::taskset::TaskSet;
pub use edf::EarliestDeadlineFirst;
pub use llf::LeastLaxityFirst;
pub use rm::RateMonotonic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PolicyKind {
    Rm,
    Edf,
    Llf,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Rm, PolicyKind::Edf, PolicyKind::Llf];

    pub fn name(self) -> &'static str {
        match self {
            Self::Rm => "Rate Monotonic",
            Self::Edf => "Earliest Deadline First",
            Self::Llf => "Least Laxity First",
        }
    }

    pub fn class(self) -> PriorityClass {
        match self {
            Self::Rm => PriorityClass::Fixed,
            Self::Edf | Self::Llf => PriorityClass::Dynamic,
        }
    }

    /// Run this policy over `tasks` for `horizon` ticks from a pristine state.
    pub fn simulate(self, tasks: &TaskSet, horizon: Ticks) -> Schedule {
        match self {
            Self::Rm => SchedCore::new(tasks, RateMonotonic, horizon).run(),
            Self::Edf => SchedCore::new(tasks, EarliestDeadlineFirst, horizon).run(),
            Self::Llf => SchedCore::new(tasks, LeastLaxityFirst, horizon).run(),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Rm => "RM",
            Self::Edf => "EDF",
            Self::Llf => "LLF",
        };
        f.write_str(tag)
    }
}

/// Priority assignment driving one run of the engine.
///
/// Only [`priority`](Policy::priority) is required. Static-priority policies
/// leave the two hooks alone; a policy whose priorities drift with time
/// re-ranks the queue in [`refresh`](Policy::refresh) and announces the
/// instants at which the ranking can flip through
/// [`extra_decision_point`](Policy::extra_decision_point).
pub trait Policy {
    fn kind(&self) -> PolicyKind;

    fn priority(&self, task: &Task, job: &Job, now: Ticks) -> Priority;

    // Called at every decision point, before arrivals are admitted
    fn refresh(&mut self, _queue: &mut ReadyQueue, _now: Ticks) {}

    fn extra_decision_point(&self, _queue: &ReadyQueue, _now: Ticks) -> Option<Ticks> {
        None
    }
}
