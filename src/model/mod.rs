// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod filter;
pub mod item;
pub mod remaining;

pub use filter::DoneFilter;
pub use item::{List, ListId, Task, TaskId, TaskPage};
pub use remaining::{DEFAULT_DATE_FORMAT, Remaining, format_limit};
