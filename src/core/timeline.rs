use std::iter;

use super::state::{JobLabel, TaskId, Ticks};

/// One slot per simulated tick; `None` is an idle CPU.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    slots: Vec<Option<JobLabel>>,
}

impl Timeline {
    pub fn with_horizon(horizon: Ticks) -> Self {
        Self {
            slots: Vec::with_capacity(horizon as usize),
        }
    }

    /// Record `label` for every tick in `[start, end)`. Segments must be
    /// appended back to back.
    pub fn fill(&mut self, start: Ticks, end: Ticks, label: Option<JobLabel>) {
        debug_assert_eq!(
            self.slots.len() as Ticks,
            start,
            "Timeline segment starting at {start} leaves a gap"
        );
        self.slots
            .extend(iter::repeat_n(label, end.saturating_sub(start) as usize));
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn at(&self, tick: Ticks) -> Option<JobLabel> {
        self.slots.get(tick as usize).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<JobLabel>] {
        &self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<JobLabel>> + '_ {
        self.slots.iter().copied()
    }

    /// `(task, instance)` pairs with `(-1, -1)` for idle ticks.
    pub fn as_pairs(&self) -> Vec<(i64, i64)> {
        self.iter()
            .map(|slot| match slot {
                Some(label) => (label.task as i64, label.instance as i64),
                None => (-1, -1),
            })
            .collect()
    }

    pub fn busy_ticks(&self) -> Ticks {
        self.slots.iter().filter(|slot| slot.is_some()).count() as Ticks
    }

    pub fn idle_ticks(&self) -> Ticks {
        self.len() as Ticks - self.busy_ticks()
    }

    pub fn ticks_of(&self, task: TaskId) -> Ticks {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Some(label) if label.task == task))
            .count() as Ticks
    }

    pub fn ticks_of_job(&self, job: JobLabel) -> Ticks {
        self.slots.iter().filter(|slot| **slot == Some(job)).count() as Ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_expand_to_ticks() {
        let mut timeline = Timeline::with_horizon(6);
        timeline.fill(0, 2, Some(JobLabel::new(0, 1)));
        timeline.fill(2, 3, None);
        timeline.fill(3, 6, Some(JobLabel::new(1, 1)));

        assert_eq!(timeline.len(), 6);
        assert_eq!(timeline.at(1), Some(JobLabel::new(0, 1)));
        assert_eq!(timeline.at(2), None);
        assert_eq!(timeline.busy_ticks(), 5);
        assert_eq!(timeline.idle_ticks(), 1);
        assert_eq!(timeline.ticks_of(1), 3);
        assert_eq!(
            timeline.as_pairs(),
            vec![(0, 1), (0, 1), (-1, -1), (1, 1), (1, 1), (1, 1)]
        );
    }

    #[test]
    fn empty_segment_is_a_no_op() {
        let mut timeline = Timeline::with_horizon(2);
        timeline.fill(0, 0, Some(JobLabel::new(0, 1)));
        assert!(timeline.is_empty());
    }
}
