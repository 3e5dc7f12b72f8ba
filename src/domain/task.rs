//! Task domain model
//!
//! A task is a free-form line of text with completion state and three
//! timestamps. Timestamps keep the exact RFC 3339 text they were written
//! with so that files edited by hand survive a load/save cycle untouched.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

/// Date format used when a timestamp is shown in a table
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Label shown for timestamps that do not parse as RFC 3339
pub const INVALID_DATE: &str = "Invalid";

/// An RFC 3339 timestamp as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wall-clock time in the local offset, second precision
    pub fn now() -> Self {
        Self::from_datetime(Local::now())
    }

    /// Formats a datetime the way it is persisted (`Z` for UTC)
    pub fn from_datetime<Tz: TimeZone>(dt: DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Wraps raw text without validating it
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the stored text, if it is valid RFC 3339
    pub fn parse(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.0).ok()
    }

    /// Date-only label for table views
    pub fn date_label(&self) -> String {
        self.parse()
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| INVALID_DATE.to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates a 12-character opaque identifier from the task text and the
/// creation instant
fn generate_internal_id(task: &str) -> String {
    let nanos = Local::now().timestamp_nanos_opt().unwrap_or(0);
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let input = format!("{}{}{}", task, nanos, seq);
    let hash = blake3::hash(input.as_bytes());
    hash.to_hex()[..12].to_string()
}

/// Treats `""` the same as an absent `completed_at`
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(Timestamp))
}

/// A single todo item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier, never displayed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,

    /// User-visible text
    pub task: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub created_at: Timestamp,

    #[serde(default)]
    pub updated_at: Timestamp,

    /// Set iff `completed` is true
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub completed_at: Option<Timestamp>,
}

impl Task {
    /// Creates an open task stamped with the current time
    pub fn new(task: impl Into<String>) -> Self {
        let task = task.into();
        let now = Timestamp::now();
        Self {
            internal_id: Some(generate_internal_id(&task)),
            task,
            completed: false,
            created_at: now.clone(),
            updated_at: now,
            completed_at: None,
        }
    }

    /// Replaces the text and bumps `updated_at`
    pub fn set_task(&mut self, task: impl Into<String>) {
        self.task = task.into();
        self.updated_at = Timestamp::now();
    }

    /// Flips completion, keeping `completed_at` in step
    pub fn toggle(&mut self) {
        let now = Timestamp::now();
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now.clone()) } else { None };
        self.updated_at = now;
    }

    pub fn is_open(&self) -> bool {
        !self.completed
    }
}
