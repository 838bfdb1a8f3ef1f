use average::{Estimate, Mean};
use rustc_hash::FxHashMap;

use crate::core::{Schedule, TaskId, Ticks};
use crate::scheduler::PolicyKind;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStats {
    pub jobs: usize,
    pub completed: usize,
    pub busy_ticks: Ticks,
    pub mean_response: Option<f64>,
    pub worst_response: Option<Ticks>,
    pub misses: usize,
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub policy: PolicyKind,
    pub horizon: Ticks,
    pub jobs: usize,
    pub completed: usize,
    pub busy_ticks: Ticks,
    pub idle_ticks: Ticks,
    pub preemptions: usize,
    pub decision_points: u64,
    pub mean_response: Option<f64>,
    pub worst_response: Option<Ticks>,
    pub misses: usize,
    pub per_task: Vec<(TaskId, TaskStats)>,
}

impl RunStats {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let responses: Vec<Ticks> = schedule
            .completed_jobs()
            .filter_map(|record| record.response_time())
            .collect();

        let misses = schedule.deadline_misses();
        let mut per_task: FxHashMap<TaskId, TaskStats> = FxHashMap::default();
        let mut task_responses: FxHashMap<TaskId, Vec<Ticks>> = FxHashMap::default();

        for record in &schedule.jobs {
            let stats = per_task.entry(record.label.task).or_default();
            stats.jobs += 1;
            if let Some(response) = record.response_time() {
                stats.completed += 1;
                task_responses
                    .entry(record.label.task)
                    .or_default()
                    .push(response);
            }
        }
        for miss in &misses {
            per_task.entry(miss.job().task).or_default().misses += 1;
        }
        for (&task, stats) in per_task.iter_mut() {
            stats.busy_ticks = schedule.timeline.ticks_of(task);
            if let Some(samples) = task_responses.get(&task) {
                stats.mean_response = mean(samples);
                stats.worst_response = samples.iter().copied().max();
            }
        }

        let mut per_task: Vec<(TaskId, TaskStats)> = per_task.into_iter().collect();
        per_task.sort_by_key(|(task, _)| *task);

        Self {
            policy: schedule.policy,
            horizon: schedule.horizon,
            jobs: schedule.jobs.len(),
            completed: responses.len(),
            busy_ticks: schedule.timeline.busy_ticks(),
            idle_ticks: schedule.timeline.idle_ticks(),
            preemptions: schedule.preemptions(),
            decision_points: schedule.decision_points,
            mean_response: mean(&responses),
            worst_response: responses.iter().copied().max(),
            misses: misses.len(),
            per_task,
        }
    }

    pub fn cpu_utilization(&self) -> f64 {
        if self.horizon == 0 {
            return 0.0;
        }
        self.busy_ticks as f64 / self.horizon as f64
    }
}

fn mean(samples: &[Ticks]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mean: Mean = samples.iter().map(|&sample| sample as f64).collect();
    Some(mean.estimate())
}
