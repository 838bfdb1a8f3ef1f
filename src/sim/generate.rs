use log::debug;
use rand::prelude::*;

use super::taskset::{TaskSet, TaskSetError};
use crate::core::{Task, Ticks};

// Divisors of 120, so any generated set has a hyperperiod of at most 120
pub const DEFAULT_PERIODS: [Ticks; 8] = [4, 5, 6, 8, 10, 12, 20, 24];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub tasks: usize,
    pub utilization: f64,
    pub seed: u64,
    pub periods: Vec<Ticks>,
    // Draw deadlines from [C, P] instead of D = P
    pub constrained_deadlines: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tasks: 3,
            utilization: 0.7,
            seed: 0,
            periods: DEFAULT_PERIODS.to_vec(),
            constrained_deadlines: false,
        }
    }
}

/// Random synchronous task set whose utilization approximates the target.
///
/// Per-task utilizations come from UUniFast; execution times are rounded to
/// whole ticks (at least 1, at most the period), so the realised
/// utilization drifts slightly from the target.
pub fn generate(config: &GeneratorConfig) -> Result<TaskSet, TaskSetError> {
    if config.utilization.is_nan() || config.utilization <= 0.0 {
        return Err(TaskSetError::InvalidUtilization(config.utilization));
    }
    if config.tasks == 0 || config.periods.is_empty() {
        return Err(TaskSetError::Empty);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let shares = uunifast(&mut rng, config.tasks, config.utilization);

    let tasks = shares
        .into_iter()
        .enumerate()
        .map(|(id, share)| {
            let period = config.periods[rng.random_range(0..config.periods.len())];
            let execution = ((share * period as f64).round() as Ticks).clamp(1, period);
            let deadline = if config.constrained_deadlines {
                rng.random_range(execution..=period)
            } else {
                period
            };
            Task::new(id, 0, period, execution, deadline)
        })
        .collect();

    let tasks = TaskSet::new(tasks)?;
    debug!(
        "generated {} tasks for target utilization {:.3} (seed {})",
        tasks.len(),
        config.utilization,
        config.seed
    );
    Ok(tasks)
}

fn uunifast(rng: &mut StdRng, n: usize, utilization: f64) -> Vec<f64> {
    let mut shares = Vec::with_capacity(n);
    let mut remaining = utilization;
    for i in 1..n {
        let next = remaining * rng.random::<f64>().powf(1.0 / (n - i) as f64);
        shares.push(remaining - next);
        remaining = next;
    }
    shares.push(remaining);
    shares
}
