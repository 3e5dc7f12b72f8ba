//! JSON storage for task lists
//!
//! A store is one file holding a pretty-printed JSON array. Missing and
//! zero-length files both mean "no tasks". Writes go through a temp file
//! and a rename so a failed save never truncates the previous contents.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::domain::TaskList;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode todo list")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Store for one task list in JSON format
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Reads the list, creating an empty file if none exists
    pub fn load(&self) -> Result<TaskList, StoreError> {
        if !self.path.exists() {
            File::create(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
            return Ok(TaskList::new());
        }

        let content = fs::read(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(TaskList::new());
        }

        // `null` is what an empty list looked like when printed, accept it too
        let list: Option<TaskList> =
            serde_json::from_slice(&content).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;

        Ok(list.unwrap_or_default())
    }

    /// Writes the whole list, replacing the file atomically
    pub fn save(&self, list: &TaskList) -> Result<(), StoreError> {
        let mut data = serde_json::to_vec_pretty(list).map_err(StoreError::Encode)?;
        data.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        let written = write_locked(&temp_path, &data)
            .map_err(|e| StoreError::io(&temp_path, e))
            .and_then(|_| {
                fs::rename(&temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))
            });

        // nothing may be left next to the store on failure
        if written.is_err() && temp_path.is_file() {
            let _ = fs::remove_file(&temp_path);
        }
        written
    }
}

/// Writes `data` to `path` under an exclusive lock
fn write_locked(path: &Path, data: &[u8]) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.lock_exclusive()?;

    let mut writer = BufWriter::new(&file);
    writer.write_all(data)?;
    writer.flush()?;
    drop(writer);

    set_file_mode(&file)
}

#[cfg(unix)]
fn set_file_mode(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_file_mode(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, Timestamp};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> TaskStore {
        TaskStore::new(dir.path().join(".todos.json"))
    }

    #[test]
    fn load_missing_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let list = store.load().unwrap();

        assert!(list.is_empty());
        assert!(store.path().is_file());
        assert_eq!(fs::metadata(store.path()).unwrap().len(), 0);
    }

    #[test]
    fn load_zero_length_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn load_null_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "null\n").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut list = TaskList::new();
        list.add("first");
        list.add("second");
        list.toggle(2).unwrap();

        store.save(&list).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, list);
    }

    #[test]
    fn save_uses_two_space_indent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut list = TaskList::new();
        list.append(Task {
            internal_id: None,
            task: "indent".to_string(),
            completed: false,
            created_at: Timestamp::from_raw("2025-01-01T00:00:00Z"),
            updated_at: Timestamp::from_raw("2025-01-01T00:00:00Z"),
            completed_at: None,
        });
        store.save(&list).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("[\n  {\n    \"task\": \"indent\""));
        assert!(!content.contains("completed_at"));
        assert!(content.ends_with("]\n"));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut list = TaskList::new();
        list.add("x");
        store.save(&list).unwrap();

        assert!(!dir.path().join(".todos.json.tmp").exists());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("nested").join("todos.json"));

        store.save(&TaskList::new()).unwrap();

        assert!(store.path().is_file());
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_mode_is_0644() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&TaskList::new()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn save_into_missing_readonly_location_is_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let store = TaskStore::new(blocker.join("todos.json"));

        let err = store.save(&TaskList::new()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("keep"), "").unwrap();

        let err = store.save(&TaskList::new()).unwrap_err();

        assert!(matches!(err, StoreError::Io { ref path, .. } if path == store.path()));
        assert!(!dir.path().join(".todos.json.tmp").exists());
    }
}
