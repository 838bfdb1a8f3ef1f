use std::fmt::Write as _;

use super::{stats::RunStats, taskset::TaskSet};
use crate::core::{Schedule, Timeline};

pub fn task_table(tasks: &TaskSet) -> String {
    let mut out = String::from("T#\tA\tP\tC\tD\n");
    for task in tasks {
        let _ = writeln!(
            out,
            "T{}\t{}\t{}\t{}\t{}",
            task.id, task.arrival, task.period, task.execution_time, task.relative_deadline
        );
    }
    out
}

/// One tab-separated cell per tick: `J<task>,<instance>` or `IDLE`.
pub fn job_list(timeline: &Timeline) -> String {
    let cells: Vec<String> = timeline
        .iter()
        .map(|slot| slot.map_or_else(|| "IDLE".to_string(), |label| label.to_string()))
        .collect();
    cells.join("\t")
}

/// Per-task rows marking busy ticks with `#`, followed by a time axis.
pub fn gantt(tasks: &TaskSet, timeline: &Timeline) -> String {
    let mut out = String::new();
    for task in tasks {
        let _ = write!(out, "T{}\t", task.id);
        let row: String = timeline
            .iter()
            .map(|slot| match slot {
                Some(label) if label.task == task.id => '#',
                _ => '-',
            })
            .collect();
        let _ = writeln!(out, "{row}");
    }

    let _ = write!(out, "Time\t");
    let axis: String = (0..timeline.len())
        .map(|tick| if tick % 10 == 0 { '|' } else { '.' })
        .collect();
    let _ = writeln!(out, "{axis}");
    out
}

pub fn events(schedule: &Schedule) -> String {
    let mut out = String::new();
    for event in &schedule.events {
        let _ = writeln!(out, "{event}");
    }
    out
}

pub fn summary(stats: &RunStats, schedule: &Schedule) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} jobs ({} completed), {} preemptions, {} idle ticks, CPU busy {:.1}%",
        stats.jobs,
        stats.completed,
        stats.preemptions,
        stats.idle_ticks,
        stats.cpu_utilization() * 100.0
    );
    if let (Some(mean), Some(worst)) = (stats.mean_response, stats.worst_response) {
        let _ = writeln!(out, "response time: mean {mean:.2}, worst {worst}");
    }
    let misses = schedule.deadline_misses();
    if misses.is_empty() {
        let _ = writeln!(out, "all deadlines met");
    } else {
        for miss in misses {
            let _ = writeln!(out, "MISS {miss}");
        }
    }
    out
}
