//! # Storage Layer
//!
//! Persistence for task lists as pretty-printed JSON files.
//!
//! ## Store Files
//!
//! | Scope | Kind | Location |
//! |-------|------|----------|
//! | local | live | `./.todos.json` |
//! | local | archive | `./.todos.archive.json` |
//! | global | live | `~/.todo/todos.json` |
//! | global | archive | `~/.todo/todos.archive.json` |
//!
//! The global directory also holds `config.toml` (settings) and
//! `config.json` (registry of known store files).
//!
//! ## Write Safety
//!
//! - Every save rewrites the whole file through a temp file and a rename
//! - There is no cross-process coordination; the last writer wins
//! - Archive transfers save the archive before the live list
//!
//! ## Key Types
//!
//! - [`TaskStore`] - Load/save one list
//! - [`StoreLocator`] - Resolve store paths from scope and kind
//! - [`Workspace`] - Live and archive stores of one scope
//! - [`Settings`] / [`Registry`] - Global configuration files

mod config;
mod json;
mod locator;
mod workspace;

pub use config::{ConfigError, Registry, Settings};
pub use json::{StoreError, TaskStore};
pub use locator::{home_from_vars, resolve_home, LocateError, Scope, StoreKind, StoreLocator};
pub use workspace::{TransferError, Workspace};
