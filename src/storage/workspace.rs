//! Workspace management
//!
//! A workspace is the pair of stores (live and archive) for one scope. It
//! hands out [`TaskStore`]s and implements the transfers that move tasks
//! from the live store into the archive.

use thiserror::Error;

use super::json::{StoreError, TaskStore};
use super::locator::{LocateError, Scope, StoreKind, StoreLocator};
use crate::domain::{Task, TaskList};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("error getting storage path")]
    Locate(#[from] LocateError),

    #[error("invalid index: {index} (list has {len} items)")]
    InvalidIndex { index: usize, len: usize },

    #[error("error loading todos")]
    Load(#[source] StoreError),

    #[error("error saving archive")]
    SaveArchive(#[source] StoreError),

    #[error("error saving todos")]
    SaveLive(#[source] StoreError),
}

/// Live and archive stores for one scope
#[derive(Debug, Clone)]
pub struct Workspace {
    locator: StoreLocator,
    scope: Scope,
}

impl Workspace {
    pub fn new(locator: StoreLocator, scope: Scope) -> Self {
        Self { locator, scope }
    }

    pub fn locator(&self) -> &StoreLocator {
        &self.locator
    }

    /// Returns the store of the given kind
    pub fn store(&self, kind: StoreKind) -> Result<TaskStore, LocateError> {
        Ok(TaskStore::new(self.locator.path(self.scope, kind)?))
    }

    pub fn live_store(&self) -> Result<TaskStore, LocateError> {
        self.store(StoreKind::Live)
    }

    pub fn archive_store(&self) -> Result<TaskStore, LocateError> {
        self.store(StoreKind::Archive)
    }

    /// Archive store when `archive` is set, live store otherwise
    pub fn effective_store(&self, archive: bool) -> Result<TaskStore, LocateError> {
        Ok(TaskStore::new(self.locator.effective_path(self.scope, archive)?))
    }

    /// Moves the task at a 0-based index from live to archive
    ///
    /// The archive is saved before the live list. If the archive save fails
    /// nothing changes on disk; if the live save fails the task ends up in
    /// both stores.
    pub fn archive_one(&self, index: usize) -> Result<Task, TransferError> {
        let live = self.live_store()?;
        let archive = self.archive_store()?;

        let mut live_list = live.load().map_err(TransferError::Load)?;
        let mut archive_list = archive.load().map_err(TransferError::Load)?;

        let len = live_list.len();
        let task = live_list
            .delete(index)
            .map_err(|_| TransferError::InvalidIndex { index, len })?;
        archive_list.append(task.clone());

        archive
            .save(&archive_list)
            .map_err(TransferError::SaveArchive)?;
        live.save(&live_list).map_err(TransferError::SaveLive)?;

        Ok(task)
    }

    /// Appends completed tasks to the archive and replaces the live list
    /// with the remaining ones, archive first
    pub fn archive_completed(
        &self,
        completed: TaskList,
        remaining: &TaskList,
    ) -> Result<usize, TransferError> {
        let live = self.live_store()?;
        let archive = self.archive_store()?;

        let mut archive_list = archive.load().map_err(TransferError::Load)?;
        let count = completed.len();
        archive_list.extend(completed);

        archive
            .save(&archive_list)
            .map_err(TransferError::SaveArchive)?;
        live.save(remaining).map_err(TransferError::SaveLive)?;

        Ok(count)
    }
}
