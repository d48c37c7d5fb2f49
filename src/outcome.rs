//! Externally visible result of one analysis turn.
//!
//! [`AnalysisResult`] is the structured value returned to the caller (CLI,
//! batch runner, HTTP layer) regardless of transport. It is a pure projection
//! of a snapshot plus the agent's closing text; building one never touches
//! session state.

use serde::{Deserialize, Serialize};

use crate::state::{Snapshot, Task};

/// Session id echoed when the caller supplied none.
pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub session_id: String,
    pub query: String,
    #[serde(default)]
    pub response: String,
    /// Content of the first virtual file (in insertion order) whose name
    /// contains "report", case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(default)]
    pub completed_tasks: Vec<Task>,
    #[serde(default)]
    pub pending_tasks: Vec<Task>,
    /// Series identifiers with cached data.
    #[serde(default)]
    pub data_sources: Vec<String>,
    /// Virtual file names, in insertion order.
    #[serde(default)]
    pub files_created: Vec<String>,
    /// Tool calls processed this turn.
    #[serde(default)]
    pub actions_processed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Project a snapshot and the agent's closing text into a success result.
    ///
    /// `response` may be empty when the run produced only tool calls and no
    /// closing message.
    pub fn from_snapshot(
        snapshot: &Snapshot,
        response: impl Into<String>,
        query: impl Into<String>,
        session_id: Option<&str>,
        actions_processed: usize,
    ) -> Self {
        Self {
            success: true,
            session_id: session_id.unwrap_or(DEFAULT_SESSION_ID).to_string(),
            query: query.into(),
            response: response.into(),
            report: snapshot.first_report().map(|f| f.content.clone()),
            completed_tasks: snapshot.completed_tasks().into_iter().cloned().collect(),
            pending_tasks: snapshot.pending_tasks().into_iter().cloned().collect(),
            data_sources: snapshot.series_ids().iter().map(|s| s.to_string()).collect(),
            files_created: snapshot.file_names().iter().map(|s| s.to_string()).collect(),
            actions_processed,
            error: None,
        }
    }

    /// Failure result for an upstream collaborator error: the error text plus
    /// the echoed query and session id, everything else empty, so the caller
    /// can retry against the same session.
    pub fn failure(
        error: impl Into<String>,
        query: impl Into<String>,
        session_id: Option<&str>,
    ) -> Self {
        Self {
            success: false,
            session_id: session_id.unwrap_or(DEFAULT_SESSION_ID).to_string(),
            query: query.into(),
            response: String::new(),
            report: None,
            completed_tasks: Vec::new(),
            pending_tasks: Vec::new(),
            data_sources: Vec::new(),
            files_created: Vec::new(),
            actions_processed: 0,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{TaskStatus, VirtualFile};
    use chrono::{DateTime, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn snapshot_with_files(names: &[(&str, &str)]) -> Snapshot {
        let mut snapshot = Snapshot::new("s1");
        for (i, (name, content)) in names.iter().enumerate() {
            snapshot
                .files
                .push(VirtualFile::new(*name, *content, at(i as i64)));
        }
        snapshot
    }

    #[test]
    fn report_is_first_match_in_insertion_order() {
        let snapshot = snapshot_with_files(&[
            ("notes.md", "n"),
            ("report_draft.md", "the draft"),
            ("Report_Final.md", "the final"),
        ]);
        let result = AnalysisResult::from_snapshot(&snapshot, "done", "q", Some("s1"), 3);

        assert_eq!(result.report.as_deref(), Some("the draft"));
        assert_eq!(
            result.files_created,
            vec!["notes.md", "report_draft.md", "Report_Final.md"]
        );
    }

    #[test]
    fn report_absent_when_nothing_matches() {
        let snapshot = snapshot_with_files(&[("notes.md", "n")]);
        let result = AnalysisResult::from_snapshot(&snapshot, "", "q", Some("s1"), 0);
        assert!(result.report.is_none());
    }

    #[test]
    fn tasks_split_by_completion_in_snapshot_order() {
        let mut snapshot = Snapshot::new("s1");
        snapshot.tasks.push(Task::new(1, "a", at(0)));
        let mut b = Task::new(2, "b", at(0));
        b.status = TaskStatus::Completed;
        b.completed_at = Some(at(1));
        snapshot.tasks.push(b);
        let mut c = Task::new(3, "c", at(0));
        c.status = TaskStatus::InProgress;
        snapshot.tasks.push(c);

        let result = AnalysisResult::from_snapshot(&snapshot, "", "q", Some("s1"), 0);
        let pending: Vec<u64> = result.pending_tasks.iter().map(|t| t.id).collect();
        let completed: Vec<u64> = result.completed_tasks.iter().map(|t| t.id).collect();
        assert_eq!(pending, vec![1, 3]);
        assert_eq!(completed, vec![2]);
    }

    #[test]
    fn session_id_falls_back_to_default() {
        let snapshot = Snapshot::new("s1");
        let result = AnalysisResult::from_snapshot(&snapshot, "", "q", None, 0);
        assert_eq!(result.session_id, "default");

        let failure = AnalysisResult::failure("boom", "q", None);
        assert_eq!(failure.session_id, "default");
    }

    #[test]
    fn failure_echoes_query_and_session() {
        let result = AnalysisResult::failure("backend unreachable", "analyze CPI", Some("s7"));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("backend unreachable"));
        assert_eq!(result.query, "analyze CPI");
        assert_eq!(result.session_id, "s7");
        assert!(result.response.is_empty());
        assert!(result.report.is_none());
        assert!(result.completed_tasks.is_empty());
        assert!(result.pending_tasks.is_empty());
        assert!(result.data_sources.is_empty());
        assert!(result.files_created.is_empty());
        assert_eq!(result.actions_processed, 0);
    }

    #[test]
    fn serializes_to_json() {
        let mut snapshot = snapshot_with_files(&[("report.md", "# R")]);
        snapshot
            .cache
            .insert("GDP".into(), serde_json::json!({"v": 1}));
        let result = AnalysisResult::from_snapshot(&snapshot, "summary", "q", Some("s1"), 2);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["report"], "# R");
        assert_eq!(json["data_sources"][0], "GDP");
        assert_eq!(json["actions_processed"], 2);
        // absent optional fields are omitted entirely
        assert!(json.get("error").is_none());

        let restored: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(restored, result);
    }
}
