//! Boundary to the agent-execution collaborator.
//!
//! The core never talks to an LLM directly. It hands one input message to an
//! [`AgentBackend`] and receives, eventually, the completed [`AgentTurn`]:
//! every tool call the agent made, in order, plus its closing text. Partial
//! streams never cross this boundary; a cancelled or failed run yields an
//! error and no turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::action::ActionLog;
use crate::error::EconResult;

/// One completed run of the external agent loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentTurn {
    /// All tool calls and their results, in execution order. May be empty
    /// when the agent answered with text alone.
    #[serde(default)]
    pub actions: ActionLog,
    /// The agent's closing free-text answer; empty when the run produced
    /// only tool calls.
    #[serde(default)]
    pub response: String,
}

impl AgentTurn {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            actions: Vec::new(),
            response: response.into(),
        }
    }
}

/// Agent-execution collaborator: runs the model loop to completion on one
/// input message.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Execute one turn. The session id lets the backend key whatever
    /// turn-to-turn memory it maintains.
    async fn execute(&self, input: &str, session_id: &str) -> EconResult<AgentTurn>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionEntry;
    use serde_json::json;

    #[test]
    fn backend_is_object_safe() {
        fn _assert_object_safe(_: &dyn AgentBackend) {}
    }

    #[test]
    fn text_turn_has_no_actions() {
        let turn = AgentTurn::text("GDP grew 2.8% annualized.");
        assert!(turn.actions.is_empty());
        assert_eq!(turn.response, "GDP grew 2.8% annualized.");
    }

    #[test]
    fn turn_serializes_roundtrip() {
        let turn = AgentTurn {
            actions: vec![ActionEntry::new(
                "fetch_fred_series",
                json!({"series_id": "GDP"}),
                r#"{"series_id": "GDP"}"#,
            )],
            response: "done".into(),
        };
        let json = serde_json::to_string(&turn).unwrap();
        let restored: AgentTurn = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, turn);
    }
}
