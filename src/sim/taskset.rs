use std::{fmt::Write as _, fs, path::Path, str::FromStr};

use thiserror::Error;

use crate::core::{Task, TaskId, Ticks};

#[derive(Debug, Error)]
pub enum TaskSetError {
    #[error("failed to read task file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: cannot parse {token:?} as an integer")]
    Parse { line: usize, token: String },

    #[error("line {line}: expected 3 or 4 columns, found {found}")]
    Columns { line: usize, found: usize },

    #[error("task {task}: {field} must be positive, got {value}")]
    NonPositive {
        task: TaskId,
        field: &'static str,
        value: i64,
    },

    #[error("task {task}: arrival must not be negative, got {value}")]
    NegativeArrival { task: TaskId, value: i64 },

    #[error("task {task}: id does not match its position")]
    Misnumbered { task: TaskId },

    #[error("task set is empty")]
    Empty,

    #[error("target utilization must be positive, got {0}")]
    InvalidUtilization(f64),

    #[error("hyperperiod overflows while folding period {period}")]
    HyperperiodOverflow { period: Ticks },

    #[error("horizon of {horizon} ticks exceeds the limit of {limit}")]
    HorizonTooLong { horizon: Ticks, limit: Ticks },
}

/// Validated, immutable periodic task set. Task ids equal positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new(tasks: Vec<Task>) -> Result<Self, TaskSetError> {
        if tasks.is_empty() {
            return Err(TaskSetError::Empty);
        }
        for (pos, task) in tasks.iter().enumerate() {
            if task.id != pos {
                return Err(TaskSetError::Misnumbered { task: task.id });
            }
            for (field, value) in [
                ("period", task.period),
                ("execution time", task.execution_time),
                ("deadline", task.relative_deadline),
            ] {
                if value == 0 {
                    return Err(TaskSetError::NonPositive {
                        task: task.id,
                        field,
                        value: 0,
                    });
                }
            }
        }
        Ok(Self { tasks })
    }

    /// Build from `(arrival, period, execution_time, deadline)` rows, ids by
    /// position.
    pub fn from_rows<I>(rows: I) -> Result<Self, TaskSetError>
    where
        I: IntoIterator<Item = (Ticks, Ticks, Ticks, Ticks)>,
    {
        let tasks = rows
            .into_iter()
            .enumerate()
            .map(|(id, (arrival, period, execution, deadline))| {
                Task::new(id, arrival, period, execution, deadline)
            })
            .collect();
        Self::new(tasks)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaskSetError> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Render in the four-column file format `load` reads back.
    pub fn to_file_format(&self) -> String {
        let mut out = String::from("A\tP\tC\tD\n");
        for task in &self.tasks {
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}",
                task.arrival, task.period, task.execution_time, task.relative_deadline
            );
        }
        out
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

/// Parses the task file format: an optional header line, then one task per
/// line as `arrival period execution deadline` or `period execution deadline`
/// (arrival 0). Columns are separated by any whitespace; blank lines and
/// `#` comments are skipped.
impl FromStr for TaskSet {
    type Err = TaskSetError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tasks = Vec::new();
        let mut seen_content = false;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let tokens: Vec<&str> = content.split_whitespace().collect();
            let first_line = !seen_content;
            seen_content = true;
            if first_line && is_header(&tokens) {
                continue;
            }

            let values = tokens
                .iter()
                .map(|token| {
                    token.parse::<i64>().map_err(|_| TaskSetError::Parse {
                        line,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<i64>, _>>()?;

            let (arrival, period, execution, deadline) = match *values.as_slice() {
                [a, p, c, d] => (a, p, c, d),
                [p, c, d] => (0, p, c, d),
                _ => {
                    return Err(TaskSetError::Columns {
                        line,
                        found: values.len(),
                    });
                }
            };

            let id = tasks.len();
            if arrival < 0 {
                return Err(TaskSetError::NegativeArrival {
                    task: id,
                    value: arrival,
                });
            }
            let period = positive(id, "period", period)?;
            let execution = positive(id, "execution time", execution)?;
            let deadline = positive(id, "deadline", deadline)?;

            tasks.push(Task::new(id, arrival as Ticks, period, execution, deadline));
        }

        Self::new(tasks)
    }
}

// A header has no numeric column at all; anything partly numeric is a task row
fn is_header(tokens: &[&str]) -> bool {
    tokens.iter().all(|token| token.parse::<i64>().is_err())
}

fn positive(task: TaskId, field: &'static str, value: i64) -> Result<Ticks, TaskSetError> {
    if value <= 0 {
        return Err(TaskSetError::NonPositive { task, field, value });
    }
    Ok(value as Ticks)
}
