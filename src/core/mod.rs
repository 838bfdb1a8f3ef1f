pub mod driver;
pub mod event;
pub mod observer;
pub mod queue;
pub mod schedule;
pub mod state;
pub mod timeline;

pub use driver::SchedCore;
pub use event::SimEvent;
pub use queue::{JobKey, ReadyQueue};
pub use schedule::{DeadlineMiss, JobRecord, Schedule};
pub use state::{Job, JobId, JobLabel, Priority, Task, TaskCursor, TaskId, Ticks};
pub use timeline::Timeline;
