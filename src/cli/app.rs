//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::config_cmd::{self, ConfigCommands};
use super::error::UsageError;
use super::output::Output;
use super::prompt::StdinConfirm;
use super::task::{self, TaskContext};
use crate::storage::{Scope, Settings, StoreLocator, Workspace};
use crate::view::ViewFormat;

/// Version metadata printed by `todo version`
#[derive(Debug, Clone, Copy)]
pub struct VersionInfo {
    pub version: &'static str,
    pub release_date: &'static str,
}

pub const VERSION_INFO: VersionInfo = VersionInfo {
    version: env!("CARGO_PKG_VERSION"),
    release_date: "2025-08-08",
};

#[derive(Parser)]
#[command(name = "todo")]
#[command(author, about = "Manage todo lists in the current directory or your home")]
pub struct Cli {
    /// Use the global todo list in ~/.todo
    #[arg(long, short = 'g', global = true, env = "TODO_GLOBAL")]
    pub global: bool,

    /// Operate on the archive (list and delete only)
    #[arg(long, short = 'a', global = true)]
    pub archive: bool,

    /// Show the todo list after the command runs
    #[arg(long, short = 'l', global = true)]
    pub list: bool,

    /// Print debug diagnostics to stderr
    #[arg(long, global = true, env = "TODO_DEBUG")]
    pub debug: bool,

    /// Command to run; lists todos when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new todo item
    #[command(visible_alias = "a")]
    Add {
        /// Task description; words are joined with spaces
        task: Vec<String>,
    },

    /// Delete a todo item by ID
    #[command(visible_aliases = ["del", "rm"])]
    Delete {
        /// ID of the item
        #[arg(allow_negative_numbers = true)]
        id: Vec<String>,
    },

    /// Edit a todo item by ID
    #[command(visible_alias = "e")]
    Edit {
        /// ID of the item followed by the new description
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
    },

    /// Toggle the completion status of a todo item
    #[command(visible_aliases = ["t", "complete"])]
    Toggle {
        /// ID of the item
        #[arg(allow_negative_numbers = true)]
        id: Vec<String>,
    },

    /// Move a todo item to the archive
    #[command(visible_alias = "ar")]
    Archive {
        /// ID of the item
        #[arg(allow_negative_numbers = true)]
        id: Vec<String>,
    },

    /// Archive or delete all completed todo items
    #[command(visible_alias = "clean")]
    Cleanup {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        force: bool,

        /// Delete completed items instead of archiving them
        #[arg(long, short)]
        delete: bool,
    },

    /// List todo items
    #[command(visible_aliases = ["l", "ls"])]
    List {
        /// Output format: table, json, pretty or none
        #[arg(long, short, default_value = "table")]
        format: ViewFormat,

        /// Show only incomplete items
        #[arg(long)]
        filter: bool,
    },

    /// Display the version of the application
    #[command(visible_alias = "v")]
    Version,

    /// Manage todo CLI configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::Delete { .. } => "delete",
            Commands::Edit { .. } => "edit",
            Commands::Toggle { .. } => "toggle",
            Commands::Archive { .. } => "archive",
            Commands::Cleanup { .. } => "cleanup",
            Commands::List { .. } => "list",
            Commands::Version => "version",
            Commands::Config(_) => "config",
        }
    }

    /// Only listing and deleting make sense on the archive
    pub fn allows_archive(&self) -> bool {
        matches!(self, Commands::List { .. } | Commands::Delete { .. })
    }
}

/// Rejects `--archive` on commands that never touch the archive
pub fn check_archive_flag(cli: &Cli) -> Result<(), UsageError> {
    match &cli.command {
        Some(cmd) if cli.archive && !cmd.allows_archive() => {
            Err(UsageError::ArchiveFlag(cmd.name().to_string()))
        }
        _ => Ok(()),
    }
}

/// Runs a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    check_archive_flag(&cli)?;

    let locator = StoreLocator::from_env();
    let settings = Settings::load(&locator)?;
    let output = Output::new(cli.debug || settings.debug);

    let scope = Scope::from_global_flag(cli.global);
    output.debug(&format!(
        "scope={} archive={} home={}",
        scope.as_str(),
        cli.archive,
        locator
            .home()
            .map(|h| h.display().to_string())
            .unwrap_or_else(|| "<unset>".to_string())
    ));

    let workspace = Workspace::new(locator, scope);
    let ctx = TaskContext {
        workspace: &workspace,
        archive: cli.archive,
        output: &output,
    };

    let follow_up = cli.list && !matches!(cli.command, None | Some(Commands::List { .. }));

    match cli.command {
        None => {
            output.debug_ctx("list", &format!("default format {}", settings.default_format));
            task::list(&ctx, settings.default_format, false)?
        }
        Some(Commands::Add { task: words }) => task::add(&ctx, &words)?,
        Some(Commands::Delete { id }) => task::delete(&ctx, &id)?,
        Some(Commands::Edit { args }) => task::edit(&ctx, &args)?,
        Some(Commands::Toggle { id }) => task::toggle(&ctx, &id)?,
        Some(Commands::Archive { id }) => task::archive(&ctx, &id)?,
        Some(Commands::Cleanup { force, delete }) => {
            task::cleanup(&ctx, force, delete, &mut StdinConfirm)?
        }
        Some(Commands::List { format, filter }) => task::list(&ctx, format, filter)?,
        Some(Commands::Version) => {
            output.success(&format!("TODO CLI Version: {}", VERSION_INFO.version));
            output.success(&format!("Release Date: {}", VERSION_INFO.release_date));
        }
        Some(Commands::Config(cmd)) => config_cmd::run(cmd, workspace.locator(), &output)?,
    }

    if follow_up {
        output.blank();
        task::list(&ctx, ViewFormat::Table, false)?;
    }

    output.debug("Command completed successfully");
    Ok(())
}
