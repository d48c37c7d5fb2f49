//! Session runner: orchestrates one analysis turn end to end.
//!
//! Each runner owns exactly one [`Snapshot`] and drives it through the
//! turn cycle: render context from the snapshot, invoke the backend, fold
//! the resulting action log, project the outcome. Turns are strictly
//! sequential per session (`run_turn` takes `&mut self`); distinct sessions
//! hold distinct runners and share nothing.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use crate::aggregator::fold;
use crate::backend::{AgentBackend, AgentTurn};
use crate::error::{EconError, EconResult};
use crate::outcome::AnalysisResult;
use crate::state::Snapshot;

/// Instruction prepended to the context while the session has no plan yet.
pub const PLANNING_INSTRUCTION: &str = "No plan exists for this session yet. \
Before doing anything else, call write_todos to break the request into \
concrete tasks.";

/// Runs analysis turns for one session.
///
/// Constructed by the caller and passed wherever it is needed; there is no
/// process-wide shared instance.
pub struct SessionRunner {
    backend: Arc<dyn AgentBackend>,
    snapshot: Snapshot,
    turn_timeout: Option<Duration>,
}

impl SessionRunner {
    /// Create a runner with a generated session id.
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self::with_session_id(backend, Uuid::new_v4().to_string())
    }

    /// Create a runner for an explicit session id (e.g. to resume a
    /// caller-tracked conversation thread).
    pub fn with_session_id(backend: Arc<dyn AgentBackend>, session_id: impl Into<String>) -> Self {
        Self {
            backend,
            snapshot: Snapshot::new(session_id),
            turn_timeout: None,
        }
    }

    /// Bound each backend invocation. A turn that exceeds the limit fails
    /// whole: no partial action log is ever folded.
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = Some(timeout);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.snapshot.session_id
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Render the working-state header the agent sees ahead of the query:
    /// open and completed tasks, available files, cached series. While the
    /// task list is empty the header is the planning instruction instead.
    pub fn build_context(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if self.snapshot.tasks.is_empty() {
            parts.push(PLANNING_INSTRUCTION.to_string());
        } else {
            let pending = self.snapshot.pending_tasks();
            if !pending.is_empty() {
                parts.push("Current pending tasks:".to_string());
                for task in pending {
                    parts.push(format!("- [{}] {}", task.id, task.description));
                }
            }

            let completed = self.snapshot.completed_tasks();
            if !completed.is_empty() {
                parts.push("Completed tasks:".to_string());
                for task in completed {
                    parts.push(format!("- [done] {}", task.description));
                }
            }
        }

        if !self.snapshot.files.is_empty() {
            parts.push(format!(
                "Available files: {}",
                self.snapshot.file_names().join(", ")
            ));
        }

        if !self.snapshot.cache.is_empty() {
            parts.push(format!(
                "Cached data series: {}",
                self.snapshot.series_ids().join(", ")
            ));
        }

        parts.join("\n")
    }

    /// Run one analysis turn.
    ///
    /// On backend failure the snapshot is left untouched and the error is
    /// folded into a failure result; it never escapes as `Err`, so the caller
    /// can always retry against the same session.
    pub async fn run_turn(&mut self, query: &str) -> AnalysisResult {
        let context = self.build_context();
        let input = format!("{context}\n\nUser request: {query}");

        match self.invoke_backend(&input).await {
            Ok(turn) => {
                self.snapshot = fold(&self.snapshot, &turn.actions);
                AnalysisResult::from_snapshot(
                    &self.snapshot,
                    turn.response,
                    query,
                    Some(&self.snapshot.session_id),
                    turn.actions.len(),
                )
            }
            Err(e) => {
                warn!(
                    session_id = %self.snapshot.session_id,
                    error = %e,
                    "agent backend failed, snapshot unchanged"
                );
                AnalysisResult::failure(e.to_string(), query, Some(&self.snapshot.session_id))
            }
        }
    }

    async fn invoke_backend(&self, input: &str) -> EconResult<AgentTurn> {
        let call = self.backend.execute(input, &self.snapshot.session_id);
        match self.turn_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(EconError::BackendTimeout {
                    timeout_secs: limit.as_secs(),
                }),
            },
            None => call.await,
        }
    }
}
