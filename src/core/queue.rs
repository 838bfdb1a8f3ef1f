use keyed_priority_queue::KeyedPriorityQueue;
use slotmap::{SlotMap, new_key_type};
use std::cmp::Ordering;

use super::state::{Job, Priority, Ticks};

new_key_type! {
    pub struct JobKey;
}

/// Heap rank of a queued job: its priority, then its insertion sequence.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
struct Rank {
    priority: Priority,
    seq: u64,
}

// KeyedPriorityQueue is a max-heap, so the lowest priority value and then the
// oldest insertion have to compare greatest
impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Ready queue of a single run.
///
/// Jobs are ordered by ascending priority. Among equal priorities a newly
/// inserted job goes behind every job already queued, which is what the
/// insertion sequence in [`Rank`] encodes. The queue owns its jobs: they move
/// in on [`insert`](Self::insert) and move back out on
/// [`remove_highest`](Self::remove_highest).
#[derive(Debug)]
pub struct ReadyQueue {
    jobs: SlotMap<JobKey, Job>,
    order: KeyedPriorityQueue<JobKey, Rank>,
    next_seq: u64,
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            jobs: SlotMap::with_key(),
            order: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    fn next_rank(&mut self, priority: Priority) -> Rank {
        let seq = self.next_seq;
        self.next_seq += 1;
        Rank { priority, seq }
    }

    pub fn insert(&mut self, job: Job, priority: Priority) -> JobKey {
        let key = self.jobs.insert(job);
        let rank = self.next_rank(priority);
        let prev = self.order.push(key, rank);
        debug_assert!(prev.is_none(), "Job key inserted twice into ready queue");
        key
    }

    pub fn peek_highest(&self) -> Option<(JobKey, &Job, Priority)> {
        let (&key, rank) = self.order.peek()?;
        let job = self
            .jobs
            .get(key)
            .expect("Ready queue order references a released job");
        Some((key, job, rank.priority))
    }

    pub fn remove_highest(&mut self) -> Option<(Job, Priority)> {
        let (key, rank) = self.order.pop()?;
        let job = self
            .jobs
            .remove(key)
            .expect("Ready queue order references a released job");
        Some((job, rank.priority))
    }

    /// Priority distance from the head to the runner-up, `None` with fewer
    /// than two queued jobs.
    pub fn priority_gap(&self) -> Option<Priority> {
        let (head, first) = self.order.peek()?;
        let second = self
            .order
            .iter()
            .filter(|(key, _)| *key != head)
            .map(|(_, rank)| *rank)
            .max()?;
        Some(second.priority - first.priority)
    }

    /// Drain the queue in its current order and reinsert every job with the
    /// priority `priority_of(job, now)` returns.
    ///
    /// Reinsertion follows drain order, so equal new priorities keep the
    /// order they had before the rebuild; ties created by the rebuild itself
    /// are broken by that order too.
    pub fn rebuild<F>(&mut self, now: Ticks, mut priority_of: F)
    where
        F: FnMut(&Job, Ticks) -> Priority,
    {
        let mut drained = Vec::with_capacity(self.order.len());
        while let Some((key, _)) = self.order.pop() {
            drained.push(key);
        }

        for key in drained {
            let priority = priority_of(&self.jobs[key], now);
            let rank = self.next_rank(priority);
            self.order.push(key, rank);
        }
    }

    pub fn job(&self, key: JobKey) -> Option<&Job> {
        self.jobs.get(key)
    }

    pub fn job_mut(&mut self, key: JobKey) -> Option<&mut Job> {
        self.jobs.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Queued jobs with their priorities, head first.
    pub fn snapshot(&self) -> Vec<(&Job, Priority)> {
        let mut ranked: Vec<(JobKey, Rank)> =
            self.order.iter().map(|(key, rank)| (*key, *rank)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .map(|(key, rank)| (&self.jobs[key], rank.priority))
            .collect()
    }

    pub(crate) fn arena_len(&self) -> usize {
        self.jobs.len()
    }

    pub(crate) fn contains(&self, key: JobKey) -> bool {
        self.order.iter().any(|(k, _)| *k == key)
    }
}
