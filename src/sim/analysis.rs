//! Liu & Layland utilization tests and the simulation horizon. The verdicts
//! are advisory; the engine simulates whatever it is given.

use std::fmt;

use thiserror::Error;

use super::taskset::{TaskSet, TaskSetError};
use crate::core::Ticks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityClass {
    /// Task-level fixed priority (RM).
    Fixed,
    /// Job-level priority (EDF, LLF).
    Dynamic,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown priority class selector {0:?} (expected 'F', 'D' or 'V')")]
pub struct UnknownSelector(pub char);

impl TryFrom<char> for PriorityClass {
    type Error = UnknownSelector;

    fn try_from(selector: char) -> Result<Self, Self::Error> {
        match selector {
            'F' => Ok(Self::Fixed),
            'D' | 'V' => Ok(Self::Dynamic),
            other => Err(UnknownSelector(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Schedulable,
    Unschedulable,
    /// The sufficient test failed but the set is not provably overloaded.
    Inconclusive,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Schedulable => "schedulable",
            Self::Unschedulable => "not schedulable",
            Self::Inconclusive => "inconclusive",
        })
    }
}

/// Outcome of a utilization-bound test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundCheck {
    pub class: PriorityClass,
    pub utilization: f64,
    pub bound: f64,
    pub verdict: Verdict,
}

impl BoundCheck {
    pub fn passes(&self) -> bool {
        self.verdict == Verdict::Schedulable
    }
}

impl fmt::Display for BoundCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.class {
            PriorityClass::Fixed => "fixed priority",
            PriorityClass::Dynamic => "dynamic priority",
        };
        write!(
            f,
            "U = {:.4} against {label} bound {:.4}: {}",
            self.utilization, self.bound, self.verdict
        )
    }
}

pub fn utilization(tasks: &TaskSet) -> f64 {
    tasks.iter().map(|task| task.utilization()).sum()
}

/// `n (2^(1/n) − 1)`; 0 for an empty set.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (2.0_f64.powf(1.0 / nf) - 1.0)
}

pub fn check(tasks: &TaskSet, class: PriorityClass) -> BoundCheck {
    let utilization = utilization(tasks);
    let (bound, verdict) = match class {
        PriorityClass::Fixed => {
            let bound = liu_layland_bound(tasks.len());
            let verdict = if utilization <= bound {
                Verdict::Schedulable
            } else if utilization > 1.0 {
                Verdict::Unschedulable
            } else {
                Verdict::Inconclusive
            };
            (bound, verdict)
        }
        PriorityClass::Dynamic => {
            let implicit = tasks
                .iter()
                .all(|task| task.relative_deadline >= task.period);
            let verdict = if utilization > 1.0 {
                Verdict::Unschedulable
            } else if implicit {
                Verdict::Schedulable
            } else {
                Verdict::Inconclusive
            };
            (1.0, verdict)
        }
    };

    BoundCheck {
        class,
        utilization,
        bound,
        verdict,
    }
}

/// Plain boolean form of [`check`] keyed by the `'F'` / `'D'` / `'V'`
/// selector.
///
/// Only a [`Verdict::Schedulable`] passes. For the dynamic class that is
/// stricter than a bare `U <= 1`: a set with any `D < P` is inconclusive and
/// reports `false` even when its utilization fits.
pub fn passes_bound(tasks: &TaskSet, selector: char) -> Result<bool, UnknownSelector> {
    let class = PriorityClass::try_from(selector)?;
    Ok(check(tasks, class).passes())
}

pub fn gcd(mut a: Ticks, mut b: Ticks) -> Ticks {
    while b != 0 {
        let rem = a % b;
        a = b;
        b = rem;
    }
    a
}

pub fn lcm(a: Ticks, b: Ticks) -> Option<Ticks> {
    (a / gcd(a, b)).checked_mul(b)
}

/// LCM of all periods.
pub fn hyperperiod(tasks: &TaskSet) -> Result<Ticks, TaskSetError> {
    tasks.iter().try_fold(1, |acc, task| {
        lcm(acc, task.period).ok_or(TaskSetError::HyperperiodOverflow {
            period: task.period,
        })
    })
}
