use std::fmt;

use super::{
    event::SimEvent,
    state::{Job, JobLabel, Task, Ticks},
    timeline::Timeline,
};
use crate::scheduler::PolicyKind;

/// Ledger entry for every job spawned during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub label: JobLabel,
    pub release: Ticks,
    pub deadline: Ticks,
    pub execution_time: Ticks,
    pub completed_at: Option<Ticks>,
}

impl JobRecord {
    pub fn new(job: &Job, task: &Task) -> Self {
        Self {
            label: job.label(),
            release: job.release,
            deadline: job.deadline,
            execution_time: task.execution_time,
            completed_at: None,
        }
    }

    pub fn response_time(&self) -> Option<Ticks> {
        self.completed_at.map(|done| done - self.release)
    }

    pub fn lateness(&self) -> Option<Ticks> {
        self.completed_at.map(|done| done.saturating_sub(self.deadline))
    }

    // Pending between release and completion (or the end of the run)
    pub fn pending_at(&self, tick: Ticks) -> bool {
        self.release <= tick && self.completed_at.is_none_or(|done| tick < done)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineMiss {
    /// Completed after its absolute deadline.
    Late {
        job: JobLabel,
        deadline: Ticks,
        lateness: Ticks,
    },
    /// Still had work at the end of the run although its deadline fell
    /// inside it.
    Unfinished { job: JobLabel, deadline: Ticks },
}

impl DeadlineMiss {
    pub fn job(&self) -> JobLabel {
        match self {
            Self::Late { job, .. } | Self::Unfinished { job, .. } => *job,
        }
    }
}

impl fmt::Display for DeadlineMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Late {
                job,
                deadline,
                lateness,
            } => write!(f, "{job} missed deadline {deadline} by {lateness}"),
            Self::Unfinished { job, deadline } => {
                write!(f, "{job} missed deadline {deadline} and never completed")
            }
        }
    }
}

/// Outcome of one policy run.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub policy: PolicyKind,
    pub horizon: Ticks,
    pub timeline: Timeline,
    pub jobs: Vec<JobRecord>,
    pub events: Vec<SimEvent>,
    pub decision_points: u64,
}

impl Schedule {
    /// Deadline misses, in job spawn order. The timeline is never altered by
    /// a miss: late jobs keep running until they complete.
    pub fn deadline_misses(&self) -> Vec<DeadlineMiss> {
        self.jobs
            .iter()
            .filter_map(|record| match record.lateness() {
                Some(lateness) if lateness > 0 => Some(DeadlineMiss::Late {
                    job: record.label,
                    deadline: record.deadline,
                    lateness,
                }),
                None if record.deadline <= self.horizon => Some(DeadlineMiss::Unfinished {
                    job: record.label,
                    deadline: record.deadline,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn meets_all_deadlines(&self) -> bool {
        self.deadline_misses().is_empty()
    }

    pub fn preemptions(&self) -> usize {
        self.events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    SimEvent::Dispatched {
                        preempted: Some(_),
                        ..
                    }
                )
            })
            .count()
    }

    pub fn completed_jobs(&self) -> impl Iterator<Item = &JobRecord> {
        self.jobs.iter().filter(|record| record.completed_at.is_some())
    }

    pub fn job(&self, label: JobLabel) -> Option<&JobRecord> {
        self.jobs.iter().find(|record| record.label == label)
    }
}
