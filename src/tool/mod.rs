//! Async tool trait and registry.
//!
//! Tools are the agent-facing surface: each one carries a JSON-schema
//! definition for the model and an `execute` that consumes JSON arguments.
//! Failures are ordinary [`ToolOutput`] values with `is_error` set, so a bad
//! call is data for the model to react to, not a fault that unwinds the turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EconResult;

pub mod economic;
pub mod planning;

/// Schema for a tool's input parameters, sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Output from a tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// A tool the agent can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match the definition name).
    fn name(&self) -> &str;

    /// Tool definition for sending to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput>;
}

/// Registry of tools available to the agent.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a required string argument.
pub(crate) fn require_str<'a>(
    arguments: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, ToolOutput> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolOutput::error(format!("Missing required argument: {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "echo".into(),
                description: "Echo back the input".into(),
                input_schema: json!({
                    "type": "object",
                    "properties": {"message": {"type": "string"}},
                    "required": ["message"]
                }),
            }
        }

        async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
            match require_str(&arguments, "message") {
                Ok(message) => Ok(ToolOutput::success(message)),
                Err(output) => Ok(output),
            }
        }
    }

    #[test]
    fn tool_output_constructors() {
        let output = ToolOutput::success("result");
        assert_eq!(output.content, "result");
        assert!(!output.is_error);

        let output = ToolOutput::error("failed");
        assert!(output.is_error);
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Box::new(EchoTool));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().name(), "echo");
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_definitions_and_names() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        assert_eq!(registry.definitions()[0].name, "echo");
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[tokio::test]
    async fn tool_execute() {
        let output = EchoTool.execute(json!({"message": "hello"})).await.unwrap();
        assert_eq!(output.content, "hello");
        assert!(!output.is_error);
    }

    #[tokio::test]
    async fn missing_argument_is_an_error_output() {
        let output = EchoTool.execute(json!({})).await.unwrap();
        assert!(output.is_error);
        assert!(output.content.contains("message"));
    }

    #[test]
    fn tool_is_object_safe() {
        fn _assert_object_safe(_: &dyn Tool) {}
    }
}
