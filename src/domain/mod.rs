//! Domain models for the todo CLI
//!
//! Contains the task entity and list operations without any I/O concerns.

mod list;
mod task;

pub use list::{TaskList, TaskListError};
pub use task::{Task, Timestamp, DATE_FORMAT, INVALID_DATE};
