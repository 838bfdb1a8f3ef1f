pub mod core;
pub mod scheduler;
pub mod sim;

pub use crate::core::{SchedCore, Schedule, Timeline};
pub use scheduler::{Policy, PolicyKind};
pub use sim::{Sim, SimConfig, TaskSet};
