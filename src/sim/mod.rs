pub mod analysis;
pub mod driver;
pub mod generate;
pub mod render;
pub mod stats;
pub mod taskset;

pub use driver::{MAX_HORIZON, Report, Sim, SimConfig};
pub use stats::RunStats;
pub use taskset::{TaskSet, TaskSetError};
