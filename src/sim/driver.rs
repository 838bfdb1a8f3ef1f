use log::{info, warn};

use super::{
    analysis::{self, BoundCheck},
    stats::RunStats,
    taskset::{TaskSet, TaskSetError},
};
use crate::{
    core::{Schedule, Ticks},
    scheduler::PolicyKind,
};

// The timeline keeps one slot per tick
pub const MAX_HORIZON: Ticks = 10_000_000;

#[derive(Debug, Clone, Default)]
pub struct SimConfig {
    /// Simulated ticks; the hyperperiod when unset.
    pub horizon: Option<Ticks>,
    /// Do not simulate a policy whose utilization test fails.
    pub skip_unschedulable: bool,
}

/// Result of running one policy: the advisory bound check and, unless it was
/// skipped, the schedule with its statistics.
#[derive(Debug, Clone)]
pub struct Report {
    pub policy: PolicyKind,
    pub bound: BoundCheck,
    pub run: Option<(Schedule, RunStats)>,
}

impl Report {
    pub fn schedule(&self) -> Option<&Schedule> {
        self.run.as_ref().map(|(schedule, _)| schedule)
    }

    pub fn stats(&self) -> Option<&RunStats> {
        self.run.as_ref().map(|(_, stats)| stats)
    }
}

pub struct Sim<'a> {
    tasks: &'a TaskSet,
    config: SimConfig,
    horizon: Ticks,
}

impl<'a> Sim<'a> {
    pub fn new(tasks: &'a TaskSet, config: SimConfig) -> Result<Self, TaskSetError> {
        let horizon = match config.horizon {
            Some(horizon) => horizon,
            None => analysis::hyperperiod(tasks)?,
        };
        if horizon > MAX_HORIZON {
            return Err(TaskSetError::HorizonTooLong {
                horizon,
                limit: MAX_HORIZON,
            });
        }
        Ok(Self {
            tasks,
            config,
            horizon,
        })
    }

    pub fn horizon(&self) -> Ticks {
        self.horizon
    }

    /// Check the policy's utilization bound, then simulate it from a fresh
    /// per-run state.
    pub fn run(&self, policy: PolicyKind) -> Report {
        let bound = analysis::check(self.tasks, policy.class());
        info!("{policy}: {bound}");

        if !bound.passes() {
            if self.config.skip_unschedulable {
                warn!("{policy}: utilization test failed, skipping simulation");
                return Report {
                    policy,
                    bound,
                    run: None,
                };
            }
            warn!("{policy}: utilization test failed, simulating anyway");
        }

        let schedule = policy.simulate(self.tasks, self.horizon);
        let stats = RunStats::from_schedule(&schedule);
        Report {
            policy,
            bound,
            run: Some((schedule, stats)),
        }
    }

    pub fn run_all(&self, policies: &[PolicyKind]) -> Vec<Report> {
        policies.iter().map(|&policy| self.run(policy)).collect()
    }
}
