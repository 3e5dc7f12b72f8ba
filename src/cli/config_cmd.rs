//! Config CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::storage::{LocateError, Registry, StoreLocator};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// List configured todo storage files
    List {
        /// Print the raw JSON config instead of a numbered list
        #[arg(long)]
        raw: bool,
    },
}

pub fn run(cmd: ConfigCommands, locator: &StoreLocator, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::List { raw } => list(locator, output, raw),
    }
}

fn list(locator: &StoreLocator, output: &Output, raw: bool) -> Result<()> {
    let home = locator
        .home()
        .ok_or(LocateError::NoHome)
        .context("unable to find home directory")?;
    let path = Registry::path_in(home);
    output.debug_ctx("config", &format!("reading {}", path.display()));

    let Some(content) = Registry::read_raw(&path).context("error reading config")? else {
        output.success("No config found. No todo lists have been initialized yet.");
        return Ok(());
    };

    if raw {
        output.success(&content);
        return Ok(());
    }

    let registry = match Registry::parse(&path, &content) {
        Ok(registry) => registry,
        Err(e) => {
            // unreadable registries are still worth showing
            output.debug_ctx("config", &format!("{:#}", e));
            output.success(&content);
            return Ok(());
        }
    };

    if registry.paths.is_empty() {
        output.success("No configured todo storage files found.");
        return Ok(());
    }

    output.success("Configured todo storage files:");
    for (i, path) in registry.paths.iter().enumerate() {
        output.success(&format!("{}. {}", i + 1, path));
    }
    Ok(())
}
