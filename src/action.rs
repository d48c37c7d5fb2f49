//! Action log: the ordered record of one turn's tool calls and results.
//!
//! Each [`ActionEntry`] is one observed tool invocation: the tool name, its
//! JSON arguments, and the text the tool produced (or an error). The log is
//! pure data; all interpretation happens in [`crate::aggregator`], which
//! decodes each entry into a [`ToolEffect`] exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{TaskId, TaskStatus};

/// One observed tool invocation with its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub tool: String,
    pub arguments: serde_json::Value,
    /// Raw tool output. Data-fetch and statistics tools produce JSON-encoded
    /// text; it is parsed defensively downstream, never trusted.
    pub output: String,
    #[serde(default)]
    pub is_error: bool,
    /// When the call was observed by the agent loop.
    pub at: DateTime<Utc>,
}

impl ActionEntry {
    pub fn new(
        tool: impl Into<String>,
        arguments: serde_json::Value,
        output: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            arguments,
            output: output.into(),
            is_error: false,
            at: Utc::now(),
        }
    }

    pub fn failure(
        tool: impl Into<String>,
        arguments: serde_json::Value,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            arguments,
            output: error.into(),
            is_error: true,
            at: Utc::now(),
        }
    }

    /// Override the observation timestamp.
    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = at;
        self
    }
}

/// Ordered record of one turn's tool calls.
pub type ActionLog = Vec<ActionEntry>;

/// The recognized state effects of a tool call, decoded once from an entry's
/// name and arguments.
///
/// Tools outside this set (search, comparison, report rendering) shape the
/// final text response only, never the snapshot, and decode to [`None`].
/// Malformed arguments also decode to [`None`]: a bad entry is ordinary data
/// to skip, not a fault to raise.
///
/// [`None`]: ToolEffect::None
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEffect {
    WriteTodos {
        tasks: Vec<String>,
    },
    UpdateTodo {
        todo_id: TaskId,
        status: TaskStatus,
        notes: Option<String>,
    },
    WriteFile {
        filename: String,
        content: String,
    },
    EditFile {
        filename: String,
        old_content: String,
        new_content: String,
    },
    DeleteFile {
        filename: String,
    },
    CacheSeries {
        series_id: String,
    },
    None,
}

impl ToolEffect {
    pub fn from_entry(entry: &ActionEntry) -> Self {
        let args = &entry.arguments;
        match entry.tool.as_str() {
            "write_todos" => {
                let tasks: Vec<String> = args
                    .get("tasks")
                    .and_then(|v| v.as_array())
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|v| v.as_str())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                if tasks.is_empty() {
                    ToolEffect::None
                } else {
                    ToolEffect::WriteTodos { tasks }
                }
            }
            "update_todo" => {
                let todo_id = args.get("todo_id").and_then(|v| v.as_u64());
                let status = args
                    .get("status")
                    .and_then(|v| v.as_str())
                    .and_then(TaskStatus::parse);
                match (todo_id, status) {
                    (Some(todo_id), Some(status)) => ToolEffect::UpdateTodo {
                        todo_id,
                        status,
                        notes: string_arg(args, "notes"),
                    },
                    _ => ToolEffect::None,
                }
            }
            "write_file" => match (string_arg(args, "filename"), string_arg(args, "content")) {
                (Some(filename), Some(content)) => ToolEffect::WriteFile { filename, content },
                _ => ToolEffect::None,
            },
            "edit_file" => match (
                string_arg(args, "filename"),
                string_arg(args, "old_content"),
                string_arg(args, "new_content"),
            ) {
                (Some(filename), Some(old_content), Some(new_content)) => ToolEffect::EditFile {
                    filename,
                    old_content,
                    new_content,
                },
                _ => ToolEffect::None,
            },
            "delete_file" => match string_arg(args, "filename") {
                Some(filename) => ToolEffect::DeleteFile { filename },
                _ => ToolEffect::None,
            },
            "fetch_fred_series" | "calculate_statistics" => match string_arg(args, "series_id") {
                Some(series_id) => ToolEffect::CacheSeries { series_id },
                _ => ToolEffect::None,
            },
            _ => ToolEffect::None,
        }
    }
}

fn string_arg(args: &serde_json::Value, key: &str) -> Option<String> {
    args.get(key).and_then(|v| v.as_str()).map(str::to_string)
}
