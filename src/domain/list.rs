//! Ordered task list
//!
//! The list is the unit that gets loaded, mutated and saved. Display IDs are
//! positions in this list (1-based) and are never stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::task::Task;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskListError {
    #[error("invalid index: {0}")]
    InvalidIndex(usize),
}

/// Ordered sequence of tasks; duplicates allowed, insertion order preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList(Vec<Task>);

impl TaskList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.0.iter()
    }

    /// Returns the task at a 0-based index
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.0.get(index)
    }

    /// Iterates `(display_id, task)` pairs
    pub fn with_display_ids(&self) -> impl Iterator<Item = (usize, &Task)> {
        self.0.iter().enumerate().map(|(i, t)| (i + 1, t))
    }

    fn validate_index(&self, index: usize) -> Result<(), TaskListError> {
        if index >= self.0.len() {
            return Err(TaskListError::InvalidIndex(index));
        }
        Ok(())
    }

    /// Appends a new open task
    pub fn add(&mut self, task: impl Into<String>) -> &Task {
        self.0.push(Task::new(task));
        &self.0[self.0.len() - 1]
    }

    /// Appends an existing task unchanged
    pub fn append(&mut self, task: Task) {
        self.0.push(task);
    }

    /// Removes the task at a 0-based index
    pub fn delete(&mut self, index: usize) -> Result<Task, TaskListError> {
        self.validate_index(index)?;
        Ok(self.0.remove(index))
    }

    /// Replaces the text of the task at a 0-based index
    pub fn update(
        &mut self,
        index: usize,
        task: impl Into<String>,
    ) -> Result<&Task, TaskListError> {
        self.validate_index(index)?;
        let item = &mut self.0[index];
        item.set_task(task);
        Ok(item)
    }

    /// Flips completion of the task at a **1-based** index
    pub fn toggle(&mut self, one_based: usize) -> Result<&Task, TaskListError> {
        let index = one_based
            .checked_sub(1)
            .ok_or(TaskListError::InvalidIndex(one_based))?;
        self.validate_index(index)?;
        let item = &mut self.0[index];
        item.toggle();
        Ok(item)
    }

    /// Keeps only incomplete tasks
    pub fn filter_incomplete(&mut self) {
        self.0.retain(Task::is_open);
    }

    /// Splits into `(completed, remaining)`, each in original order
    pub fn partition_completed(self) -> (TaskList, TaskList) {
        let (done, open): (Vec<_>, Vec<_>) = self.0.into_iter().partition(|t| t.completed);
        (TaskList(done), TaskList(open))
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self(tasks)
    }
}

impl Extend<Task> for TaskList {
    fn extend<I: IntoIterator<Item = Task>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for TaskList {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
