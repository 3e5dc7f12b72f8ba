//! Store path resolution
//!
//! Maps a (scope, kind) pair to a file path. Local stores live in the
//! working directory; global stores live under `<HOME>/.todo`.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

/// Directory under the user's home that holds global stores and config
pub const GLOBAL_DIR: &str = ".todo";

const LOCAL_LIVE: &str = ".todos.json";
const LOCAL_ARCHIVE: &str = ".todos.archive.json";
const GLOBAL_LIVE: &str = "todos.json";
const GLOBAL_ARCHIVE: &str = "todos.archive.json";

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("unable to get user home directory: neither HOME nor USERPROFILE is set")]
    NoHome,

    #[error("unable to create todo directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where a store lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Local,
    Global,
}

impl Scope {
    pub fn from_global_flag(global: bool) -> Self {
        if global {
            Scope::Global
        } else {
            Scope::Local
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Global => "global",
        }
    }
}

/// Which list a store holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Live,
    Archive,
}

impl StoreKind {
    pub fn from_archive_flag(archive: bool) -> Self {
        if archive {
            StoreKind::Archive
        } else {
            StoreKind::Live
        }
    }
}

/// Resolves the home directory from an environment lookup
///
/// The first non-empty of `HOME` and `USERPROFILE` wins.
pub fn home_from_vars<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Resolves the home directory from the process environment, falling back
/// to the platform's notion of home
pub fn resolve_home() -> Option<PathBuf> {
    home_from_vars(|key| std::env::var_os(key))
        .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()))
}

/// Resolves store paths for one working directory and one home
#[derive(Debug, Clone)]
pub struct StoreLocator {
    local_root: PathBuf,
    home: Option<PathBuf>,
}

impl StoreLocator {
    pub fn new(local_root: impl Into<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            local_root: local_root.into(),
            home,
        }
    }

    /// Locator for the current directory and the environment's home
    pub fn from_env() -> Self {
        Self::new(".", resolve_home())
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Returns `<HOME>/.todo`, creating it if needed
    pub fn global_dir(&self) -> Result<PathBuf, LocateError> {
        let home = self.home.as_ref().ok_or(LocateError::NoHome)?;
        let dir = home.join(GLOBAL_DIR);
        create_dir(&dir).map_err(|source| LocateError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Path of the store for a scope and kind
    pub fn path(&self, scope: Scope, kind: StoreKind) -> Result<PathBuf, LocateError> {
        match (scope, kind) {
            (Scope::Local, StoreKind::Live) => Ok(self.local_root.join(LOCAL_LIVE)),
            (Scope::Local, StoreKind::Archive) => Ok(self.local_root.join(LOCAL_ARCHIVE)),
            (Scope::Global, StoreKind::Live) => Ok(self.global_dir()?.join(GLOBAL_LIVE)),
            (Scope::Global, StoreKind::Archive) => Ok(self.global_dir()?.join(GLOBAL_ARCHIVE)),
        }
    }

    /// Archive path when `archive` is set, live path otherwise
    pub fn effective_path(&self, scope: Scope, archive: bool) -> Result<PathBuf, LocateError> {
        self.path(scope, StoreKind::from_archive_flag(archive))
    }
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
