//! todo - a small task manager for the command line
//!
//! Tasks live in JSON files: one pair (live and archive) in the working
//! directory and one pair under `~/.todo`. Display IDs are 1-based
//! positions and are never stored.

pub mod domain;
pub mod storage;
pub mod view;
pub mod cli;

pub use domain::{Task, TaskList, Timestamp};
