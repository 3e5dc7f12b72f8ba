//! # Command-Line Interface
//!
//! User-facing commands of the `todo` binary.
//!
//! ## Commands
//!
//! | Command | Aliases | Purpose |
//! |---------|---------|---------|
//! | `add` | `a` | Append a task to the live list |
//! | `delete` | `del`, `rm` | Remove a task by ID |
//! | `edit` | `e` | Replace a task's text |
//! | `toggle` | `t`, `complete` | Flip completion |
//! | `archive` | `ar` | Move a task to the archive |
//! | `cleanup` | `clean` | Archive or delete all completed tasks |
//! | `list` | `l`, `ls` | Render a list |
//! | `version` | `v` | Print version metadata |
//! | `config list` | | Show the store registry |
//!
//! Running `todo` with no command lists the live store.
//!
//! ## Global Flags
//!
//! - `--global` / `-g` uses the stores under `~/.todo`
//! - `--archive` / `-a` targets the archive (`list` and `delete` only)
//! - `--list` / `-l` prints the list as a table after the command
//! - `--debug` prints `[debug]` diagnostics to stderr
//!
//! ## Exit Codes
//!
//! `0` on success, `1` for usage errors, `2` for storage errors. See
//! [`exit_code`].

mod app;
mod config_cmd;
mod error;
mod output;
mod prompt;
mod task;

pub use app::{check_archive_flag, run, Cli, Commands, VersionInfo, VERSION_INFO};
pub use config_cmd::ConfigCommands;
pub use error::{exit_code, UsageError, EXIT_SYSTEM, EXIT_USAGE};
pub use output::Output;
pub use prompt::{is_consent, Confirm, StdinConfirm};
pub use task::{parse_id, TaskContext};
