//! Planning and file tools.
//!
//! These tools give the model a vocabulary for planning and report assembly.
//! Their outputs are confirmations only: the authoritative task list and file
//! table live in the session snapshot, maintained by the fold in
//! [`crate::aggregator`], which recognizes these tool names in the action
//! log. The one tool with real output is the report builder, which renders
//! structured findings to markdown for a subsequent `write_file` call.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::error::EconResult;

use super::{require_str, Tool, ToolDefinition, ToolOutput};

/// Create a TODO list for the analysis workflow.
pub struct WriteTodosTool;

#[async_trait]
impl Tool for WriteTodosTool {
    fn name(&self) -> &str {
        "write_todos"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "write_todos".into(),
            description: "Create a TODO list for planning the analysis workflow. Breaks a \
                          complex analysis into manageable steps."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "tasks": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Task descriptions to add"
                    }
                },
                "required": ["tasks"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        let tasks: Vec<&str> = arguments
            .get("tasks")
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();
        if tasks.is_empty() {
            return Ok(ToolOutput::error(
                "Missing required argument: tasks".to_string(),
            ));
        }
        let listing: Vec<String> = tasks.iter().map(|t| format!("- [ ] {t}")).collect();
        Ok(ToolOutput::success(format!(
            "Created TODO list with {} tasks:\n{}",
            tasks.len(),
            listing.join("\n")
        )))
    }
}

/// Update the status of a TODO item.
pub struct UpdateTodoTool;

#[async_trait]
impl Tool for UpdateTodoTool {
    fn name(&self) -> &str {
        "update_todo"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "update_todo".into(),
            description: "Update the status of a TODO item, optionally attaching progress notes."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "todo_id": {"type": "integer", "description": "ID of the TODO item"},
                    "status": {
                        "type": "string",
                        "enum": ["pending", "in_progress", "completed"]
                    },
                    "notes": {"type": "string", "description": "Optional progress notes"}
                },
                "required": ["todo_id", "status"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        let todo_id = match arguments.get("todo_id").and_then(|v| v.as_u64()) {
            Some(id) => id,
            None => {
                return Ok(ToolOutput::error(
                    "Missing required argument: todo_id".to_string(),
                ))
            }
        };
        let status = match require_str(&arguments, "status") {
            Ok(status) => status,
            Err(output) => return Ok(output),
        };
        let mut confirmation = format!("Updated TODO #{todo_id} to status: {status}");
        if let Some(notes) = arguments.get("notes").and_then(|v| v.as_str()) {
            confirmation.push_str(&format!(" with notes: {notes}"));
        }
        Ok(ToolOutput::success(confirmation))
    }
}

/// Write content to a virtual file.
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "write_file".into(),
            description: "Write content to a file in the session workspace. Overwrites the file \
                          if it exists."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filename": {"type": "string"},
                    "content": {"type": "string"}
                },
                "required": ["filename", "content"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        let filename = match require_str(&arguments, "filename") {
            Ok(name) => name,
            Err(output) => return Ok(output),
        };
        let content = match require_str(&arguments, "content") {
            Ok(content) => content,
            Err(output) => return Ok(output),
        };
        Ok(ToolOutput::success(format!(
            "Successfully wrote {} characters to {filename}",
            content.len()
        )))
    }
}

/// Edit a virtual file by replacing a text fragment.
pub struct EditFileTool;

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "edit_file".into(),
            description: "Edit a file in the session workspace by replacing old content with \
                          new content."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filename": {"type": "string"},
                    "old_content": {"type": "string"},
                    "new_content": {"type": "string"}
                },
                "required": ["filename", "old_content", "new_content"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        for key in ["filename", "old_content", "new_content"] {
            if let Err(output) = require_str(&arguments, key) {
                return Ok(output);
            }
        }
        let filename = arguments["filename"].as_str().unwrap_or_default();
        Ok(ToolOutput::success(format!(
            "Successfully edited {filename}"
        )))
    }
}

/// Delete a virtual file.
pub struct DeleteFileTool;

#[async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &str {
        "delete_file"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "delete_file".into(),
            description: "Delete a file from the session workspace.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {"filename": {"type": "string"}},
                "required": ["filename"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        let filename = match require_str(&arguments, "filename") {
            Ok(name) => name,
            Err(output) => return Ok(output),
        };
        Ok(ToolOutput::success(format!(
            "Successfully deleted {filename}"
        )))
    }
}

/// Render a structured analysis report as markdown.
pub struct CreateReportTool;

#[async_trait]
impl Tool for CreateReportTool {
    fn name(&self) -> &str {
        "create_analysis_report"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "create_analysis_report".into(),
            description: "Create a structured analysis report in markdown: title, executive \
                          summary, findings, recommendations, and data sources."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string"},
                    "summary": {"type": "string"},
                    "findings": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": {"type": "string"},
                                "description": {"type": "string"}
                            }
                        }
                    },
                    "recommendations": {"type": "array", "items": {"type": "string"}},
                    "data_sources": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["title", "summary", "findings", "recommendations", "data_sources"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        let title = match require_str(&arguments, "title") {
            Ok(title) => title,
            Err(output) => return Ok(output),
        };
        let summary = match require_str(&arguments, "summary") {
            Ok(summary) => summary,
            Err(output) => return Ok(output),
        };

        let mut report = format!("# {title}\n\n## Executive Summary\n{summary}\n\n## Key Findings\n");

        if let Some(findings) = arguments.get("findings").and_then(|v| v.as_array()) {
            for (i, finding) in findings.iter().enumerate() {
                let heading = finding
                    .get("title")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Finding");
                let description = finding
                    .get("description")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                report.push_str(&format!("\n### {}. {heading}\n{description}\n", i + 1));
            }
        }

        report.push_str("\n## Recommendations\n");
        if let Some(recommendations) = arguments.get("recommendations").and_then(|v| v.as_array()) {
            for rec in recommendations.iter().filter_map(|v| v.as_str()) {
                report.push_str(&format!("- {rec}\n"));
            }
        }

        report.push_str("\n## Data Sources\n");
        if let Some(sources) = arguments.get("data_sources").and_then(|v| v.as_array()) {
            for source in sources.iter().filter_map(|v| v.as_str()) {
                report.push_str(&format!("- {source}\n"));
            }
        }

        report.push_str(&format!(
            "\n---\n*Report generated: {}*",
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        ));

        Ok(ToolOutput::success(report))
    }
}

/// Register every planning tool.
pub fn register_planning_tools(registry: &mut super::ToolRegistry) {
    registry.register(Box::new(WriteTodosTool));
    registry.register(Box::new(UpdateTodoTool));
    registry.register(Box::new(WriteFileTool));
    registry.register(Box::new(EditFileTool));
    registry.register(Box::new(DeleteFileTool));
    registry.register(Box::new(CreateReportTool));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolRegistry;

    #[test]
    fn register_all() {
        let mut registry = ToolRegistry::new();
        register_planning_tools(&mut registry);
        assert_eq!(registry.len(), 6);
        assert!(registry.get("write_todos").is_some());
        assert!(registry.get("create_analysis_report").is_some());
    }

    #[tokio::test]
    async fn write_todos_confirms_each_task() {
        let output = WriteTodosTool
            .execute(json!({"tasks": ["fetch GDP", "write report"]}))
            .await
            .unwrap();
        assert!(!output.is_error);
        assert!(output.content.contains("2 tasks"));
        assert!(output.content.contains("- [ ] fetch GDP"));
        assert!(output.content.contains("- [ ] write report"));
    }

    #[tokio::test]
    async fn write_todos_requires_tasks() {
        let output = WriteTodosTool.execute(json!({})).await.unwrap();
        assert!(output.is_error);
    }

    #[tokio::test]
    async fn update_todo_confirms_with_notes() {
        let output = UpdateTodoTool
            .execute(json!({"todo_id": 3, "status": "completed", "notes": "all series cached"}))
            .await
            .unwrap();
        assert_eq!(
            output.content,
            "Updated TODO #3 to status: completed with notes: all series cached"
        );
    }

    #[tokio::test]
    async fn update_todo_without_notes() {
        let output = UpdateTodoTool
            .execute(json!({"todo_id": 1, "status": "in_progress"}))
            .await
            .unwrap();
        assert_eq!(output.content, "Updated TODO #1 to status: in_progress");
    }

    #[tokio::test]
    async fn write_file_reports_length() {
        let output = WriteFileTool
            .execute(json!({"filename": "report.md", "content": "# Report"}))
            .await
            .unwrap();
        assert_eq!(
            output.content,
            "Successfully wrote 8 characters to report.md"
        );
    }

    #[tokio::test]
    async fn file_tools_validate_arguments() {
        assert!(WriteFileTool
            .execute(json!({"filename": "a.md"}))
            .await
            .unwrap()
            .is_error);
        assert!(EditFileTool
            .execute(json!({"filename": "a.md", "old_content": "x"}))
            .await
            .unwrap()
            .is_error);
        assert!(DeleteFileTool.execute(json!({})).await.unwrap().is_error);
    }

    #[tokio::test]
    async fn report_builder_renders_markdown() {
        let output = CreateReportTool
            .execute(json!({
                "title": "Inflation Outlook",
                "summary": "CPI growth is cooling.",
                "findings": [
                    {"title": "Headline CPI", "description": "Down to 2.9% YoY."},
                    {"description": "Core remains sticky."}
                ],
                "recommendations": ["Watch shelter costs"],
                "data_sources": ["CPIAUCSL", "CPILFESL"]
            }))
            .await
            .unwrap();

        assert!(!output.is_error);
        assert!(output.content.starts_with("# Inflation Outlook"));
        assert!(output.content.contains("## Executive Summary\nCPI growth is cooling."));
        assert!(output.content.contains("### 1. Headline CPI"));
        assert!(output.content.contains("### 2. Finding"));
        assert!(output.content.contains("- Watch shelter costs"));
        assert!(output.content.contains("- CPIAUCSL"));
        assert!(output.content.contains("*Report generated:"));
    }

    #[tokio::test]
    async fn report_builder_requires_title() {
        let output = CreateReportTool
            .execute(json!({"summary": "s"}))
            .await
            .unwrap();
        assert!(output.is_error);
    }
}
