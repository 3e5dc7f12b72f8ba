//! Command-line errors and exit codes

use thiserror::Error;

use crate::domain::TaskListError;
use crate::storage::{ConfigError, LocateError, StoreError, TransferError};

/// Exit code for user and input errors
pub const EXIT_USAGE: u8 = 1;

/// Exit code for storage and system errors
pub const EXIT_SYSTEM: u8 = 2;

/// Problems with what the user typed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("task description is required")]
    EmptyTask,

    #[error("exactly one ID is required")]
    ExactlyOneId,

    #[error("ID and new task description are required")]
    EditArgs,

    #[error("invalid ID: {0} must be a number")]
    NotANumber(String),

    #[error("ID must be greater than 0")]
    NotPositive,

    #[error("invalid ID: {id} (valid range: 1-{len})")]
    OutOfRange { id: usize, len: usize },

    #[error("--archive flag is only supported with 'list' and 'delete' commands, not '{0}'")]
    ArchiveFlag(String),
}

/// Picks the process exit code for a failed command
///
/// The first error in the chain with a known type decides; anything
/// unrecognized counts as a system error.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.is::<UsageError>() || cause.is::<TaskListError>() {
            return EXIT_USAGE;
        }
        if let Some(transfer) = cause.downcast_ref::<TransferError>() {
            return match transfer {
                TransferError::InvalidIndex { .. } => EXIT_USAGE,
                _ => EXIT_SYSTEM,
            };
        }
        if cause.is::<StoreError>() || cause.is::<LocateError>() || cause.is::<ConfigError>() {
            return EXIT_SYSTEM;
        }
    }
    EXIT_SYSTEM
}
