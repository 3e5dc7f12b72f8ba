//! Rendering of task lists
//!
//! Three views exist: a box-drawn table for people, and compact or indented
//! JSON for scripts. The JSON views emit a display form of each task with a
//! synthesized `id` (the 1-based position) and without the internal ID.

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::str::FromStr;

use crossterm::style::Stylize;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::domain::{Task, TaskList};

/// Names accepted by `--format`
pub const FORMAT_NAMES: [&str; 4] = ["table", "json", "pretty", "none"];

const HEADERS: [&str; 6] = [
    "ID",
    "Task",
    "Completed",
    "CreatedAt",
    "UpdatedAt",
    "CompletedAt",
];
const EMPTY_TABLE: &str = "No todos found.";
const EMPTY_JSON: &str = "null";

/// Output format of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFormat {
    #[default]
    Table,
    Json,
    Pretty,
    None,
}

impl ViewFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewFormat::Table => "table",
            ViewFormat::Json => "json",
            ViewFormat::Pretty => "pretty",
            ViewFormat::None => "none",
        }
    }

    /// Parses a format name, treating anything unknown as raw JSON
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or(ViewFormat::Json)
    }

    /// Deserializes a format name with [`ViewFormat::parse_lenient`]
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&name))
    }
}

impl fmt::Display for ViewFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a format name outside [`FORMAT_NAMES`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid format: {}. Allowed formats: {}", .0, FORMAT_NAMES.join(", "))]
pub struct UnknownFormat(pub String);

impl FromStr for ViewFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(ViewFormat::Table),
            "json" => Ok(ViewFormat::Json),
            "pretty" => Ok(ViewFormat::Pretty),
            "none" => Ok(ViewFormat::None),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Display form of a task for the JSON views
#[derive(Debug, Serialize)]
struct DisplayTask<'a> {
    id: usize,
    task: &'a str,
    completed: bool,
    created_at: &'a str,
    updated_at: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<&'a str>,
}

impl<'a> DisplayTask<'a> {
    fn new(id: usize, task: &'a Task) -> Self {
        Self {
            id,
            task: &task.task,
            completed: task.completed,
            created_at: task.created_at.as_str(),
            updated_at: task.updated_at.as_str(),
            completed_at: task.completed_at.as_ref().map(|t| t.as_str()),
        }
    }
}

/// Renders a list to standard output
pub fn view(list: &TaskList, format: ViewFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    render(list, format, color, &mut out)?;
    out.flush()
}

/// Renders a list into any writer
pub fn render<W: Write>(
    list: &TaskList,
    format: ViewFormat,
    color: bool,
    out: &mut W,
) -> io::Result<()> {
    match format {
        ViewFormat::Table => render_table(list, color, out),
        ViewFormat::Json => render_json(list, false, out),
        ViewFormat::Pretty => render_json(list, true, out),
        ViewFormat::None => Ok(()),
    }
}

fn render_json<W: Write>(list: &TaskList, pretty: bool, out: &mut W) -> io::Result<()> {
    if list.is_empty() {
        return writeln!(out, "{}", EMPTY_JSON);
    }

    let items: Vec<_> = list
        .with_display_ids()
        .map(|(id, task)| DisplayTask::new(id, task))
        .collect();

    if pretty {
        serde_json::to_writer_pretty(&mut *out, &items)?;
    } else {
        serde_json::to_writer(&mut *out, &items)?;
    }
    writeln!(out)
}

fn completed_mark(task: &Task) -> &'static str {
    if task.completed {
        "✅"
    } else {
        "❌"
    }
}

fn table_rows(list: &TaskList) -> Vec<[String; 6]> {
    list.with_display_ids()
        .map(|(id, task)| {
            [
                id.to_string(),
                task.task.clone(),
                completed_mark(task).to_string(),
                task.created_at.date_label(),
                task.updated_at.date_label(),
                task.completed_at
                    .as_ref()
                    .map(|t| t.date_label())
                    .unwrap_or_default(),
            ]
        })
        .collect()
}

fn border<W: Write>(
    out: &mut W,
    widths: &[usize],
    left: &str,
    mid: &str,
    right: &str,
) -> io::Result<()> {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    writeln!(out, "{}{}{}", left, segments.join(mid), right)
}

fn row<W: Write>(out: &mut W, cells: &[String], widths: &[usize], color: bool) -> io::Result<()> {
    let last = cells.len() - 1;
    let mut line = String::from("│");
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let padded = format!("{}{}", cell, " ".repeat(width - cell.width()));
        // only the completion date is highlighted
        if color && i == last && !cell.is_empty() {
            line.push_str(&format!(" {} │", padded.green()));
        } else {
            line.push_str(&format!(" {} │", padded));
        }
    }
    writeln!(out, "{}", line)
}

fn render_table<W: Write>(list: &TaskList, color: bool, out: &mut W) -> io::Result<()> {
    if list.is_empty() {
        return writeln!(out, "{}", EMPTY_TABLE);
    }

    let headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let rows = table_rows(list);

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells.iter()) {
            *width = (*width).max(cell.width());
        }
    }

    border(out, &widths, "┌", "┬", "┐")?;
    row(out, &headers, &widths, false)?;
    border(out, &widths, "├", "┼", "┤")?;
    for cells in &rows {
        row(out, cells, &widths, color)?;
    }
    border(out, &widths, "└", "┴", "┘")
}
