//! Task commands
//!
//! Every handler follows the same shape: validate arguments, load the store,
//! mutate, save, then report. Arguments are validated before any file is
//! touched.

use anyhow::{Context, Result};

use super::error::UsageError;
use super::output::Output;
use super::prompt::Confirm;
use crate::domain::TaskList;
use crate::storage::{Registry, TaskStore, TransferError, Workspace};
use crate::view::{self, ViewFormat};

/// What a task command runs against
pub struct TaskContext<'a> {
    pub workspace: &'a Workspace,
    pub archive: bool,
    pub output: &'a Output,
}

impl TaskContext<'_> {
    fn live_store(&self) -> Result<TaskStore> {
        self.workspace
            .live_store()
            .context("error getting storage path")
    }

    fn effective_store(&self) -> Result<TaskStore> {
        self.workspace
            .effective_store(self.archive)
            .context("error getting storage path")
    }

    fn load(&self, store: &TaskStore) -> Result<TaskList> {
        self.output
            .debug_ctx("store", &format!("loading {}", store.path().display()));
        let list = store.load().context("error loading todos")?;
        self.output
            .debug_ctx("store", &format!("loaded {} item(s)", list.len()));
        Ok(list)
    }

    fn save(&self, store: &TaskStore, list: &TaskList) -> Result<()> {
        self.output.debug_ctx(
            "store",
            &format!("saving {} item(s) to {}", list.len(), store.path().display()),
        );
        store.save(list).context("error saving todos")?;
        self.remember(store);
        Ok(())
    }

    /// Records a written store in the registry; failures are not fatal
    fn remember(&self, store: &TaskStore) {
        match Registry::register(self.workspace.locator(), store.path()) {
            Ok(true) => self
                .output
                .debug_ctx("config", &format!("registered {}", store.path().display())),
            Ok(false) => {}
            Err(e) => self
                .output
                .debug_ctx("config", &format!("could not update registry: {:#}", e)),
        }
    }
}

/// Parses a display ID, which must be a positive integer
pub fn parse_id(raw: &str) -> Result<usize, UsageError> {
    let id: i64 = raw
        .parse()
        .map_err(|_| UsageError::NotANumber(raw.to_string()))?;
    if id <= 0 {
        return Err(UsageError::NotPositive);
    }
    usize::try_from(id).map_err(|_| UsageError::NotANumber(raw.to_string()))
}

fn single_id(args: &[String]) -> Result<usize, UsageError> {
    match args {
        [raw] => parse_id(raw),
        _ => Err(UsageError::ExactlyOneId),
    }
}

/// Maps a display ID to a 0-based index within `list`
fn index_of(id: usize, list: &TaskList) -> Result<usize, UsageError> {
    if id > list.len() {
        return Err(UsageError::OutOfRange {
            id,
            len: list.len(),
        });
    }
    Ok(id - 1)
}

pub fn add(ctx: &TaskContext, words: &[String]) -> Result<()> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        return Err(UsageError::EmptyTask.into());
    }

    let store = ctx.live_store()?;
    let mut list = ctx.load(&store)?;
    list.add(text.as_str());
    ctx.save(&store, &list)?;

    ctx.output.success(&format!("Added task: {}", text));
    Ok(())
}

pub fn delete(ctx: &TaskContext, ids: &[String]) -> Result<()> {
    let id = single_id(ids)?;

    let store = ctx.effective_store()?;
    let mut list = ctx.load(&store)?;
    let index = index_of(id, &list)?;
    list.delete(index)?;
    ctx.save(&store, &list)?;

    ctx.output
        .success(&format!("Deleted todo item with ID: {}", id));
    Ok(())
}

pub fn edit(ctx: &TaskContext, args: &[String]) -> Result<()> {
    let [raw, words @ ..] = args else {
        return Err(UsageError::EditArgs.into());
    };
    let text = words.join(" ");
    if text.trim().is_empty() {
        return Err(UsageError::EditArgs.into());
    }
    let id = parse_id(raw)?;

    let store = ctx.live_store()?;
    let mut list = ctx.load(&store)?;
    let index = index_of(id, &list)?;
    list.update(index, text.as_str())?;
    ctx.save(&store, &list)?;

    ctx.output
        .success(&format!("Updated todo item {}: {}", id, text));
    Ok(())
}

pub fn toggle(ctx: &TaskContext, ids: &[String]) -> Result<()> {
    let id = single_id(ids)?;

    let store = ctx.live_store()?;
    let mut list = ctx.load(&store)?;
    index_of(id, &list)?;
    let task = list.toggle(id)?;
    ctx.output.debug_ctx(
        "toggle",
        &format!("'{}' completed={}", task.task, task.completed),
    );
    ctx.save(&store, &list)?;

    ctx.output.success(&format!(
        "Toggled completion status for todo item with ID: {}",
        id
    ));
    Ok(())
}

pub fn archive(ctx: &TaskContext, ids: &[String]) -> Result<()> {
    let id = single_id(ids)?;

    let task = match ctx.workspace.archive_one(id - 1) {
        Ok(task) => task,
        Err(TransferError::InvalidIndex { len, .. }) => {
            return Err(UsageError::OutOfRange { id, len }.into());
        }
        Err(e) => return Err(e.into()),
    };
    remember_both(ctx);

    ctx.output
        .success(&format!("Archived todo item: {}", task.task));
    Ok(())
}

fn remember_both(ctx: &TaskContext) {
    if let Ok(store) = ctx.workspace.archive_store() {
        ctx.remember(&store);
    }
    if let Ok(store) = ctx.workspace.live_store() {
        ctx.remember(&store);
    }
}

/// Removes every completed task from the live store, archiving it unless
/// `delete` is set
pub fn cleanup(
    ctx: &TaskContext,
    force: bool,
    delete: bool,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    let verb = if delete { "delete" } else { "archive" };

    let store = ctx.live_store()?;
    let list = ctx.load(&store)?;
    let (done, remaining) = list.partition_completed();

    if done.is_empty() {
        ctx.output
            .success(&format!("No completed items found to {}.", verb));
        return Ok(());
    }
    let count = done.len();

    if !force {
        ctx.output
            .success(&format!("Found {} completed item(s) to {}:", count, verb));
        for (id, task) in done.with_display_ids() {
            ctx.output.success(&format!("  {}. {}", id, task.task));
        }

        let question = format!(
            "\nAre you sure you want to {} these {} completed item(s)? (y/N): ",
            verb, count
        );
        if !confirm
            .confirm(&question)
            .context("error reading confirmation")?
        {
            ctx.output.success(if delete {
                "Delete cancelled."
            } else {
                "Cleanup cancelled."
            });
            return Ok(());
        }
    }

    if delete {
        ctx.save(&store, &remaining)?;
        ctx.output
            .success(&format!("Successfully deleted {} completed item(s).", count));
    } else {
        ctx.workspace.archive_completed(done, &remaining)?;
        remember_both(ctx);
        ctx.output
            .success(&format!("Successfully archived {} completed item(s).", count));
    }
    Ok(())
}

/// Renders the effective store, optionally hiding completed tasks
pub fn list(ctx: &TaskContext, format: ViewFormat, filter: bool) -> Result<()> {
    let store = ctx.effective_store()?;
    let mut list = ctx.load(&store)?;
    if filter {
        list.filter_incomplete();
        ctx.output
            .debug_ctx("list", &format!("{} open item(s) after filter", list.len()));
    }

    view::view(&list, format).context("error rendering todos")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Scope, StoreLocator};
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    struct Answer(Option<bool>);

    impl Confirm for Answer {
        fn confirm(&mut self, _question: &str) -> io::Result<bool> {
            self.0
                .ok_or_else(|| io::Error::other("no answer expected"))
        }
    }

    struct Fixture {
        dir: TempDir,
        home: TempDir,
        output: Output,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                home: TempDir::new().unwrap(),
                output: Output::new(false),
            }
        }

        fn workspace(&self, scope: Scope) -> Workspace {
            let locator =
                StoreLocator::new(self.dir.path(), Some(self.home.path().to_path_buf()));
            Workspace::new(locator, scope)
        }

        fn live(&self) -> TaskList {
            self.workspace(Scope::Local).live_store().unwrap().load().unwrap()
        }

        fn archived(&self) -> TaskList {
            self.workspace(Scope::Local)
                .archive_store()
                .unwrap()
                .load()
                .unwrap()
        }
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn names(list: &TaskList) -> Vec<String> {
        list.iter().map(|t| t.task.clone()).collect()
    }

    fn run<F>(fx: &Fixture, archive: bool, f: F) -> Result<()>
    where
        F: FnOnce(&TaskContext) -> Result<()>,
    {
        let ws = fx.workspace(Scope::Local);
        let ctx = TaskContext {
            workspace: &ws,
            archive,
            output: &fx.output,
        };
        f(&ctx)
    }

    fn seed(fx: &Fixture, items: &[&str]) {
        for item in items {
            run(fx, false, |ctx| add(ctx, &args(&[*item]))).unwrap();
        }
    }

    #[test]
    fn parse_id_rules() {
        assert_eq!(parse_id("3"), Ok(3));
        assert_eq!(
            parse_id("abc"),
            Err(UsageError::NotANumber("abc".to_string()))
        );
        assert_eq!(parse_id("0"), Err(UsageError::NotPositive));
        assert_eq!(parse_id("-2"), Err(UsageError::NotPositive));
    }

    #[test]
    fn add_joins_words() {
        let fx = Fixture::new();
        run(&fx, false, |ctx| add(ctx, &args(&["Buy", "milk"]))).unwrap();

        let live = fx.live();
        assert_eq!(names(&live), vec!["Buy milk"]);
        assert!(!live.get(0).unwrap().completed);
    }

    #[test]
    fn add_requires_text() {
        let fx = Fixture::new();
        let err = run(&fx, false, |ctx| add(ctx, &[])).unwrap_err();

        assert_eq!(err.to_string(), "task description is required");
        assert!(!fx.dir.path().join(".todos.json").exists());
    }

    #[test]
    fn add_registers_store() {
        let fx = Fixture::new();
        seed(&fx, &["x"]);

        let registry = fs::read_to_string(Registry::path_in(fx.home.path())).unwrap();
        assert!(registry.contains(".todos.json"));
    }

    #[test]
    fn delete_removes_by_display_id() {
        let fx = Fixture::new();
        seed(&fx, &["a", "b", "c"]);

        run(&fx, false, |ctx| delete(ctx, &args(&["2"]))).unwrap();

        assert_eq!(names(&fx.live()), vec!["a", "c"]);
    }

    #[test]
    fn delete_validates_arguments_before_io() {
        let fx = Fixture::new();

        let err = run(&fx, false, |ctx| delete(ctx, &args(&["1", "2"]))).unwrap_err();
        assert_eq!(err.to_string(), "exactly one ID is required");
        let err = run(&fx, false, |ctx| delete(ctx, &args(&["x"]))).unwrap_err();
        assert_eq!(err.to_string(), "invalid ID: x must be a number");

        assert!(!fx.dir.path().join(".todos.json").exists());
    }

    #[test]
    fn delete_out_of_range() {
        let fx = Fixture::new();
        seed(&fx, &["a"]);

        let err = run(&fx, false, |ctx| delete(ctx, &args(&["5"]))).unwrap_err();

        assert_eq!(err.to_string(), "invalid ID: 5 (valid range: 1-1)");
        assert_eq!(fx.live().len(), 1);
    }

    #[test]
    fn delete_with_archive_flag_targets_archive() {
        let fx = Fixture::new();
        seed(&fx, &["a", "b"]);
        run(&fx, false, |ctx| archive(ctx, &args(&["1"]))).unwrap();

        run(&fx, true, |ctx| delete(ctx, &args(&["1"]))).unwrap();

        assert!(fx.archived().is_empty());
        assert_eq!(names(&fx.live()), vec!["b"]);
    }

    #[test]
    fn edit_replaces_text() {
        let fx = Fixture::new();
        seed(&fx, &["old"]);

        run(&fx, false, |ctx| edit(ctx, &args(&["1", "new", "text"]))).unwrap();

        assert_eq!(names(&fx.live()), vec!["new text"]);
    }

    #[test]
    fn edit_needs_id_and_text() {
        let fx = Fixture::new();
        let err = run(&fx, false, |ctx| edit(ctx, &args(&["1"]))).unwrap_err();
        assert_eq!(err.to_string(), "ID and new task description are required");
    }

    #[test]
    fn edit_rejects_blank_text() {
        let fx = Fixture::new();
        seed(&fx, &["real"]);

        for blank in ["", "  "] {
            let err = run(&fx, false, |ctx| edit(ctx, &args(&["1", blank]))).unwrap_err();
            assert_eq!(err.to_string(), "ID and new task description are required");
        }
        assert_eq!(names(&fx.live()), vec!["real"]);
    }

    #[test]
    fn toggle_twice_reopens() {
        let fx = Fixture::new();
        seed(&fx, &["x"]);

        run(&fx, false, |ctx| toggle(ctx, &args(&["1"]))).unwrap();
        let done = fx.live();
        assert!(done.get(0).unwrap().completed);
        assert!(done.get(0).unwrap().completed_at.is_some());

        run(&fx, false, |ctx| toggle(ctx, &args(&["1"]))).unwrap();
        let open = fx.live();
        assert!(!open.get(0).unwrap().completed);
        assert!(open.get(0).unwrap().completed_at.is_none());
    }

    #[test]
    fn toggle_zero_is_rejected() {
        let fx = Fixture::new();
        seed(&fx, &["x"]);

        let err = run(&fx, false, |ctx| toggle(ctx, &args(&["0"]))).unwrap_err();
        assert_eq!(err.to_string(), "ID must be greater than 0");
    }

    #[test]
    fn archive_moves_task() {
        let fx = Fixture::new();
        seed(&fx, &["a", "b"]);

        run(&fx, false, |ctx| archive(ctx, &args(&["2"]))).unwrap();

        assert_eq!(names(&fx.live()), vec!["a"]);
        assert_eq!(names(&fx.archived()), vec!["b"]);
    }

    #[test]
    fn archive_out_of_range_is_usage_error() {
        let fx = Fixture::new();
        seed(&fx, &["a"]);

        let err = run(&fx, false, |ctx| archive(ctx, &args(&["3"]))).unwrap_err();

        assert_eq!(err.to_string(), "invalid ID: 3 (valid range: 1-1)");
        assert!(err.downcast_ref::<UsageError>().is_some());
    }

    fn seed_mixed(fx: &Fixture) {
        seed(fx, &["keep", "done1", "done2"]);
        run(fx, false, |ctx| toggle(ctx, &args(&["2"]))).unwrap();
        run(fx, false, |ctx| toggle(ctx, &args(&["3"]))).unwrap();
    }

    #[test]
    fn cleanup_force_archives_completed() {
        let fx = Fixture::new();
        seed_mixed(&fx);

        run(&fx, false, |ctx| cleanup(ctx, true, false, &mut Answer(None))).unwrap();

        assert_eq!(names(&fx.live()), vec!["keep"]);
        assert_eq!(names(&fx.archived()), vec!["done1", "done2"]);
    }

    #[test]
    fn cleanup_delete_discards() {
        let fx = Fixture::new();
        seed_mixed(&fx);

        run(&fx, false, |ctx| cleanup(ctx, true, true, &mut Answer(None))).unwrap();

        assert_eq!(names(&fx.live()), vec!["keep"]);
        assert!(fx.archived().is_empty());
    }

    #[test]
    fn cleanup_declined_changes_nothing() {
        let fx = Fixture::new();
        seed_mixed(&fx);
        let before = fs::read(fx.dir.path().join(".todos.json")).unwrap();

        run(&fx, false, |ctx| cleanup(ctx, false, false, &mut Answer(Some(false)))).unwrap();

        assert_eq!(fs::read(fx.dir.path().join(".todos.json")).unwrap(), before);
        assert!(!fx.dir.path().join(".todos.archive.json").exists());
    }

    #[test]
    fn cleanup_confirmed_archives() {
        let fx = Fixture::new();
        seed_mixed(&fx);

        run(&fx, false, |ctx| cleanup(ctx, false, false, &mut Answer(Some(true)))).unwrap();

        assert_eq!(fx.archived().len(), 2);
    }

    #[test]
    fn cleanup_without_completed_never_prompts() {
        let fx = Fixture::new();
        seed(&fx, &["open"]);

        // Answer(None) errors if asked
        run(&fx, false, |ctx| cleanup(ctx, false, false, &mut Answer(None))).unwrap();

        assert_eq!(fx.live().len(), 1);
    }

    #[test]
    fn list_creates_missing_store() {
        let fx = Fixture::new();

        run(&fx, false, |ctx| list(ctx, ViewFormat::None, true)).unwrap();

        assert!(fx.dir.path().join(".todos.json").exists());
    }
}
