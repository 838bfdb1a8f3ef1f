use std::fmt;

// Index into the task set
pub type TaskId = usize;
// Index into a run's job ledger
pub type JobId = usize;
pub type Ticks = u64;
// Lower value = higher priority. Signed because laxity goes negative once a job is late.
pub type Priority = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub arrival: Ticks,
    pub period: Ticks,
    pub execution_time: Ticks,
    pub relative_deadline: Ticks,
}

impl Task {
    pub fn new(
        id: TaskId,
        arrival: Ticks,
        period: Ticks,
        execution_time: Ticks,
        relative_deadline: Ticks,
    ) -> Self {
        Self {
            id,
            arrival,
            period,
            execution_time,
            relative_deadline,
        }
    }

    pub fn utilization(&self) -> f64 {
        self.execution_time as f64 / self.period as f64
    }
}

/// Per-run arrival cursor of a task.
///
/// Lives outside [`Task`] so that every run starts from the task's arrival
/// offset with a zeroed instance counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCursor {
    pub next_arrival: Ticks,
    pub instances: u64,
}

impl TaskCursor {
    pub fn new(task: &Task) -> Self {
        assert!(task.period > 0, "Task {} has a zero period", task.id);
        Self {
            next_arrival: task.arrival,
            instances: 0,
        }
    }

    /// Advance past the arrival at `now`, returning the instance number of
    /// the job that arrives.
    pub fn advance(&mut self, task: &Task) -> u64 {
        self.instances += 1;
        self.next_arrival += task.period;
        self.instances
    }
}

/// `(task, instance)` pair identifying a job in timelines and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobLabel {
    pub task: TaskId,
    pub instance: u64,
}

impl JobLabel {
    pub fn new(task: TaskId, instance: u64) -> Self {
        Self { task, instance }
    }
}

impl fmt::Display for JobLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{},{}", self.task, self.instance)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub task: TaskId,
    pub instance: u64,
    pub release: Ticks,
    pub deadline: Ticks,
    pub remaining: Ticks,
}

impl Job {
    /// Instantiate `task` at `now`. Execution time is taken as the task's
    /// worst case.
    pub fn spawn(id: JobId, task: &Task, instance: u64, now: Ticks) -> Self {
        Self {
            id,
            task: task.id,
            instance,
            release: now,
            deadline: now + task.relative_deadline,
            remaining: task.execution_time,
        }
    }

    pub fn label(&self) -> JobLabel {
        JobLabel::new(self.task, self.instance)
    }

    pub fn laxity(&self, now: Ticks) -> Priority {
        self.deadline as Priority - self.remaining as Priority - now as Priority
    }

    /// Charge `elapsed` ticks of service. Returns true once the job has no
    /// work left.
    pub fn run_for(&mut self, elapsed: Ticks) -> bool {
        debug_assert!(
            elapsed <= self.remaining,
            "Job {} charged {elapsed} ticks with only {} remaining",
            self.label(),
            self.remaining
        );
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.remaining == 0
    }
}
