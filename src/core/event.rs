use std::fmt;

use crate::core::{JobLabel, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Released {
        at: Ticks,
        job: JobLabel,
        deadline: Ticks,
    },
    // Selected job changed; `preempted` is set when the previous job still had work
    Dispatched {
        at: Ticks,
        job: JobLabel,
        preempted: Option<JobLabel>,
    },
    Completed {
        at: Ticks,
        job: JobLabel,
        lateness: Ticks,
    },
    // CPU idle after admission
    Idle {
        at: Ticks,
    },
}

impl SimEvent {
    pub fn at(&self) -> Ticks {
        match self {
            Self::Released { at, .. }
            | Self::Dispatched { at, .. }
            | Self::Completed { at, .. }
            | Self::Idle { at } => *at,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Released { at, job, deadline } => {
                write!(f, "t={at} release {job} (deadline {deadline})")
            }
            Self::Dispatched {
                at,
                job,
                preempted: Some(prev),
            } => write!(f, "t={at} dispatch {job} preempting {prev}"),
            Self::Dispatched { at, job, .. } => write!(f, "t={at} dispatch {job}"),
            Self::Completed { at, job, lateness } if *lateness > 0 => {
                write!(f, "t={at} complete {job} late by {lateness}")
            }
            Self::Completed { at, job, .. } => write!(f, "t={at} complete {job}"),
            Self::Idle { at } => write!(f, "t={at} idle"),
        }
    }
}
