//! The fold: deterministic state aggregation over one turn's action log.
//!
//! [`fold`] is a pure function of (old snapshot, action log). No hidden
//! state, so any snapshot can be reproduced by replaying its logs in order.
//! Entries apply strictly in log order, later entries winning per field, with
//! two carve-outs: `completed_at` is first-completion-wins, and a failed data
//! fetch never displaces a previously cached payload.
//!
//! Anomalies inside the fold (unknown task ids, malformed arguments,
//! unparsable payloads) are absorbed as no-ops and logged at debug level.
//! Only the whole-turn backend failure, handled upstream in
//! [`crate::runner`], is surfaced to the caller.

use chrono::Utc;
use tracing::debug;

use crate::action::{ActionEntry, ToolEffect};
use crate::state::{Snapshot, Task, TaskStatus, VirtualFile};

/// Fold one completed action log into a snapshot, producing the successor
/// snapshot. `last_updated` advances on every fold, including the empty one.
pub fn fold(snapshot: &Snapshot, log: &[ActionEntry]) -> Snapshot {
    let mut next = snapshot.clone();
    for entry in log {
        apply(&mut next, entry);
    }
    next.last_updated = Utc::now();
    next
}

fn apply(snapshot: &mut Snapshot, entry: &ActionEntry) {
    match ToolEffect::from_entry(entry) {
        ToolEffect::WriteTodos { tasks } => {
            let mut id = snapshot.next_task_id();
            for description in tasks {
                snapshot.tasks.push(Task::new(id, description, entry.at));
                id += 1;
            }
        }
        ToolEffect::UpdateTodo {
            todo_id,
            status,
            notes,
        } => match snapshot.task_mut(todo_id) {
            Some(task) => {
                task.status = status;
                if status == TaskStatus::Completed && task.completed_at.is_none() {
                    task.completed_at = Some(entry.at);
                }
                if let Some(notes) = notes {
                    task.notes = Some(notes);
                }
            }
            None => {
                debug!(todo_id, "update_todo references an unknown task id");
            }
        },
        ToolEffect::WriteFile { filename, content } => match snapshot.file_mut(&filename) {
            Some(file) => {
                file.content = content;
                file.modified_at = entry.at;
            }
            None => {
                snapshot
                    .files
                    .push(VirtualFile::new(filename, content, entry.at));
            }
        },
        ToolEffect::EditFile {
            filename,
            old_content,
            new_content,
        } => match snapshot.file_mut(&filename) {
            Some(file) if file.content.contains(&old_content) => {
                file.content = file.content.replacen(&old_content, &new_content, 1);
                file.modified_at = entry.at;
            }
            Some(_) => {
                debug!(%filename, "edit_file target text not found");
            }
            None => {
                debug!(%filename, "edit_file references an unknown file");
            }
        },
        ToolEffect::DeleteFile { filename } => {
            snapshot.files.retain(|f| f.name != filename);
        }
        ToolEffect::CacheSeries { series_id } => {
            if entry.is_error {
                debug!(%series_id, tool = %entry.tool, "data tool failed, cache untouched");
                return;
            }
            match serde_json::from_str::<serde_json::Value>(&entry.output) {
                Ok(payload) if payload.get("error").is_none() => {
                    snapshot.cache.insert(series_id, payload);
                }
                Ok(_) => {
                    debug!(%series_id, tool = %entry.tool, "payload carries an error, cache untouched");
                }
                Err(e) => {
                    debug!(%series_id, tool = %entry.tool, error = %e, "unparsable payload, cache untouched");
                }
            }
        }
        ToolEffect::None => {}
    }
}
