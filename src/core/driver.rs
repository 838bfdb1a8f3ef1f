use log::{debug, info, trace, warn};

use super::{
    event::SimEvent,
    observer::Observer,
    queue::{JobKey, ReadyQueue},
    schedule::{JobRecord, Schedule},
    state::{Job, JobLabel, TaskCursor, Ticks},
    timeline::Timeline,
};
use crate::scheduler::Policy;
use crate::sim::taskset::TaskSet;

/// Decision-point driven simulation of one policy over one task set.
///
/// Time jumps from one decision point to the next. A decision point is the
/// earliest of: completion of the selected job, the next arrival of any task,
/// and whatever extra instant the policy reports (LLF laxity crossover).
/// Between two decision points the selected job cannot change, so the whole
/// segment is written to the timeline in one go.
pub struct SchedCore<'a, P: Policy> {
    tasks: &'a TaskSet,
    pub policy: P,
    queue: ReadyQueue,
    cursors: Vec<TaskCursor>,
    now: Ticks,
    horizon: Ticks,
    timeline: Timeline,
    jobs: Vec<JobRecord>,
    events: Vec<SimEvent>,
    current: Option<(JobKey, JobLabel)>,
    idle: bool,
    observer: Observer,
}

impl<'a, P: Policy> SchedCore<'a, P> {
    pub fn new(tasks: &'a TaskSet, policy: P, horizon: Ticks) -> Self {
        // Fresh cursors for every run
        let cursors = tasks.iter().map(TaskCursor::new).collect();
        Self {
            tasks,
            policy,
            queue: ReadyQueue::new(),
            cursors,
            now: 0,
            horizon,
            timeline: Timeline::with_horizon(horizon),
            jobs: Vec::new(),
            events: Vec::new(),
            current: None,
            idle: false,
            observer: Observer::new(),
        }
    }

    pub fn run(mut self) -> Schedule {
        info!(
            "{}: simulating {} tasks over {} ticks",
            self.policy.kind(),
            self.tasks.len(),
            self.horizon
        );
        while !self.finished() {
            self.step();
        }
        self.finish()
    }

    pub fn finished(&self) -> bool {
        self.now >= self.horizon
    }

    /// Advance to the next decision point.
    pub fn step(&mut self) {
        let now = self.now;
        self.policy.refresh(&mut self.queue, now);
        self.admit_arrivals();

        let selected = self
            .queue
            .peek_highest()
            .map(|(key, job, _)| (key, job.label()));
        let next = self.next_decision_point();
        debug!(
            "{} t={now}: run {} until {next} ({} queued)",
            self.policy.kind(),
            selected.map_or_else(|| "IDLE".to_string(), |(_, label)| label.to_string()),
            self.queue.len()
        );

        self.note_selection(selected);
        self.timeline
            .fill(now, next, selected.map(|(_, label)| label));
        if let Some((key, _)) = selected {
            self.account(key, next);
        }

        self.now = next;
        self.observer.observe(
            self.now,
            self.tasks,
            &self.cursors,
            &self.queue,
            self.current.map(|(key, _)| key),
        );
    }

    fn admit_arrivals(&mut self) {
        let now = self.now;
        let tasks = self.tasks;
        for task in tasks.iter() {
            let cursor = &mut self.cursors[task.id];
            if cursor.next_arrival != now {
                continue;
            }

            let instance = cursor.advance(task);
            let job = Job::spawn(self.jobs.len(), task, instance, now);
            let priority = self.policy.priority(task, &job, now);
            self.jobs.push(JobRecord::new(&job, task));

            let event = SimEvent::Released {
                at: now,
                job: job.label(),
                deadline: job.deadline,
            };
            trace!("{} {event}", self.policy.kind());
            self.events.push(event);
            self.queue.insert(job, priority);
        }
    }

    fn next_decision_point(&self) -> Ticks {
        let completion = self
            .queue
            .peek_highest()
            .map_or(self.horizon, |(_, job, _)| self.now + job.remaining);
        let arrival = self
            .cursors
            .iter()
            .map(|cursor| cursor.next_arrival)
            .min()
            .unwrap_or(self.horizon);
        let extra = self
            .policy
            .extra_decision_point(&self.queue, self.now)
            .unwrap_or(self.horizon);

        let next = completion.min(arrival).min(extra).min(self.horizon);
        assert!(
            next > self.now,
            "Decision point at {next} does not advance time past {}",
            self.now
        );
        next
    }

    fn note_selection(&mut self, selected: Option<(JobKey, JobLabel)>) {
        let now = self.now;
        let event = match (selected, self.current) {
            (Some((key, _)), Some((running, _))) if key == running => None,
            (Some((key, label)), prev) => {
                self.current = Some((key, label));
                self.idle = false;
                Some(SimEvent::Dispatched {
                    at: now,
                    job: label,
                    preempted: prev.map(|(_, prev_label)| prev_label),
                })
            }
            (None, _) if self.idle => None,
            (None, _) => {
                self.current = None;
                self.idle = true;
                Some(SimEvent::Idle { at: now })
            }
        };

        if let Some(event) = event {
            trace!("{} {event}", self.policy.kind());
            self.events.push(event);
        }
    }

    // Charge the selected job up to `until`, releasing it once its work is done
    fn account(&mut self, key: JobKey, until: Ticks) {
        let elapsed = until - self.now;
        let done = self
            .queue
            .job_mut(key)
            .expect("Selected job missing from ready queue")
            .run_for(elapsed);
        if !done {
            return;
        }

        let (job, _) = self
            .queue
            .remove_highest()
            .expect("Completed job missing from ready queue");
        debug_assert_eq!(
            Some(job.label()),
            self.current.map(|(_, label)| label),
            "Completed job was not the selected one"
        );
        self.current = None;

        let lateness = until.saturating_sub(job.deadline);
        if lateness > 0 {
            warn!(
                "{}: {} completed at {until}, {lateness} past its deadline {}",
                self.policy.kind(),
                job.label(),
                job.deadline
            );
        }
        self.jobs[job.id].completed_at = Some(until);

        let event = SimEvent::Completed {
            at: until,
            job: job.label(),
            lateness,
        };
        trace!("{} {event}", self.policy.kind());
        self.events.push(event);
    }

    fn finish(self) -> Schedule {
        let schedule = Schedule {
            policy: self.policy.kind(),
            horizon: self.horizon,
            timeline: self.timeline,
            jobs: self.jobs,
            events: self.events,
            decision_points: self.observer.steps(),
        };
        info!(
            "{}: {} jobs, {} decision points, {} deadline misses",
            schedule.policy,
            schedule.jobs.len(),
            schedule.decision_points,
            schedule.deadline_misses().len()
        );
        schedule
    }
}
