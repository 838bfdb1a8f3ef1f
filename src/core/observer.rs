use super::{
    queue::{JobKey, ReadyQueue},
    state::{TaskCursor, Ticks},
};
use crate::sim::taskset::TaskSet;

/// Bookkeeping checks run after every decision point.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(
        &mut self,
        now: Ticks,
        tasks: &TaskSet,
        cursors: &[TaskCursor],
        queue: &ReadyQueue,
        current: Option<JobKey>,
    ) {
        self.step += 1;

        debug_assert_eq!(
            queue.arena_len(),
            queue.len(),
            "Ready queue owns jobs it does not rank"
        );

        for job in queue.jobs() {
            debug_assert!(
                job.remaining > 0,
                "Job {} finished but is still queued",
                job.label()
            );
            debug_assert!(
                job.release < now,
                "Job {} queued before its release at {}",
                job.label(),
                job.release
            );
        }

        if let Some(key) = current {
            debug_assert!(
                queue.contains(key),
                "Selected job is neither queued nor completed"
            );
        }

        for (task, cursor) in tasks.iter().zip(cursors) {
            debug_assert!(
                cursor.next_arrival >= now,
                "Task {} arrival at {} skipped (now {now})",
                task.id,
                cursor.next_arrival
            );
            debug_assert_eq!(
                cursor.next_arrival,
                task.arrival + cursor.instances * task.period,
                "Task {} cursor drifted off its period",
                task.id
            );
        }
    }
}
