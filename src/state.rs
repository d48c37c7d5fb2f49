//! Session snapshot: task list, virtual file table, and series cache.
//!
//! A [`Snapshot`] is the queryable state of one analysis session. It is owned
//! exclusively by that session's runner and replaced wholesale once per turn
//! by the fold in [`crate::aggregator`]; nothing here mutates across threads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique task identifier (positive, monotonically assigned, never reused
/// within a session).
pub type TaskId = u64;

/// Task status progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Parse the wire form used in tool arguments ("pending", "in_progress",
    /// "completed").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One planned unit of work in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Immutable after creation.
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, on the first transition to completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Last-write-wins progress notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Task {
    pub fn new(id: TaskId, description: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            description: description.into(),
            status: TaskStatus::Pending,
            created_at,
            completed_at: None,
            notes: None,
        }
    }
}

/// A file in the session's virtual file system. Content is a full text blob,
/// replaced wholesale on write; `created_at` survives overwrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualFile {
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl VirtualFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            created_at: at,
            modified_at: at,
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// The aggregate state of one session: exactly one task list, one file table,
/// one series cache.
///
/// Tasks and files are kept in creation/insertion order; the file table's
/// insertion order is what makes report selection in
/// [`crate::outcome::AnalysisResult`] deterministic. The cache maps a series
/// identifier to the last successfully parsed payload for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub files: Vec<VirtualFile>,
    #[serde(default)]
    pub cache: BTreeMap<String, serde_json::Value>,
}

impl Snapshot {
    /// Create an empty snapshot for a new session.
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            created_at: now,
            last_updated: now,
            tasks: Vec::new(),
            files: Vec::new(),
            cache: BTreeMap::new(),
        }
    }

    /// Next free task id: one past the current maximum, starting at 1.
    pub fn next_task_id(&self) -> TaskId {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn file(&self, name: &str) -> Option<&VirtualFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn file_mut(&mut self, name: &str) -> Option<&mut VirtualFile> {
        self.files.iter_mut().find(|f| f.name == name)
    }

    /// Tasks not yet completed (pending and in-progress), in creation order.
    pub fn pending_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| !t.status.is_completed())
            .collect()
    }

    /// Completed tasks, in creation order.
    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status.is_completed())
            .collect()
    }

    /// File names in insertion order.
    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    /// Cached series identifiers.
    pub fn series_ids(&self) -> Vec<&str> {
        self.cache.keys().map(|k| k.as_str()).collect()
    }

    /// The first file (by insertion order) whose name contains "report",
    /// case-insensitively. First write wins the position, so the choice is
    /// stable for a fixed write sequence.
    pub fn first_report(&self) -> Option<&VirtualFile> {
        self.files
            .iter()
            .find(|f| f.name.to_lowercase().contains("report"))
    }
}
