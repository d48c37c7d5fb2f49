//! Economic data tools backed by the FRED client.
//!
//! Every tool serializes its result to JSON text. Failures become
//! `{"error": …}` payloads rather than errors: the model sees what went
//! wrong, and the state aggregator's cache rule keys off exactly that shape.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::EconResult;
use crate::fred::FredClient;

use super::{require_str, Tool, ToolDefinition, ToolOutput};

fn error_payload(message: impl Into<String>) -> ToolOutput {
    ToolOutput::error(json!({ "error": message.into() }).to_string())
}

fn json_output<T: serde::Serialize>(value: &T) -> EconResult<ToolOutput> {
    Ok(ToolOutput::success(serde_json::to_string_pretty(value)?))
}

/// Fetch an economic time series with a recent-data summary.
pub struct FetchSeriesTool {
    client: Arc<FredClient>,
}

impl FetchSeriesTool {
    pub fn new(client: Arc<FredClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for FetchSeriesTool {
    fn name(&self) -> &str {
        "fetch_fred_series"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "fetch_fred_series".into(),
            description:
                "Fetch economic time series data from FRED (e.g. 'GDP', 'UNRATE', 'CPIAUCSL', \
                 'DGS10'). Returns a JSON summary with recent observations."
                    .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "series_id": {"type": "string", "description": "FRED series ID"}
                },
                "required": ["series_id"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        let series_id = match require_str(&arguments, "series_id") {
            Ok(id) => id,
            Err(output) => return Ok(output),
        };
        match self.client.fetch_series(series_id).await {
            Ok(summary) => json_output(&summary),
            Err(e) => Ok(error_payload(format!("Failed to fetch {series_id}: {e}"))),
        }
    }
}

/// Search FRED series by keywords.
pub struct SearchSeriesTool {
    client: Arc<FredClient>,
}

impl SearchSeriesTool {
    pub fn new(client: Arc<FredClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchSeriesTool {
    fn name(&self) -> &str {
        "search_fred_series"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_fred_series".into(),
            description: "Search for FRED series by keywords (e.g. 'inflation', 'unemployment \
                          rate'). Returns matching series with metadata."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "search_text": {"type": "string", "description": "Keywords to search for"}
                },
                "required": ["search_text"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        let search_text = match require_str(&arguments, "search_text") {
            Ok(text) => text,
            Err(output) => return Ok(output),
        };
        match self.client.search_series(search_text).await {
            Ok(series) => json_output(&json!({
                "search_text": search_text,
                "count": series.len(),
                "series": series,
            })),
            Err(e) => Ok(error_payload(format!("Search failed: {e}"))),
        }
    }
}

/// Descriptive statistics for a series.
pub struct CalculateStatisticsTool {
    client: Arc<FredClient>,
}

impl CalculateStatisticsTool {
    pub fn new(client: Arc<FredClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CalculateStatisticsTool {
    fn name(&self) -> &str {
        "calculate_statistics"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "calculate_statistics".into(),
            description: "Calculate statistical measures for a FRED series: mean, median, \
                          standard deviation, range, and growth rates."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "series_id": {"type": "string", "description": "FRED series ID"}
                },
                "required": ["series_id"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        let series_id = match require_str(&arguments, "series_id") {
            Ok(id) => id,
            Err(output) => return Ok(output),
        };
        match self.client.statistics(series_id).await {
            Ok(stats) => json_output(&stats),
            Err(e) => Ok(error_payload(format!(
                "Failed to calculate statistics: {e}"
            ))),
        }
    }
}

/// Compare several series side by side.
pub struct CompareSeriesTool {
    client: Arc<FredClient>,
}

impl CompareSeriesTool {
    pub fn new(client: Arc<FredClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CompareSeriesTool {
    fn name(&self) -> &str {
        "compare_series"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "compare_series".into(),
            description: "Compare multiple FRED series side by side (up to five). Returns \
                          latest values, means, and growth rates for each."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "series_ids": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "FRED series IDs to compare"
                    }
                },
                "required": ["series_ids"]
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> EconResult<ToolOutput> {
        let series_ids: Vec<String> = arguments
            .get("series_ids")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if series_ids.is_empty() {
            return Ok(ToolOutput::error(
                "Missing required argument: series_ids".to_string(),
            ));
        }
        match self.client.compare_series(&series_ids).await {
            Ok(comparison) => json_output(&comparison),
            Err(e) => Ok(error_payload(format!("Failed to compare series: {e}"))),
        }
    }
}

/// Key economic indicators dashboard.
pub struct KeyIndicatorsTool {
    client: Arc<FredClient>,
}

impl KeyIndicatorsTool {
    pub fn new(client: Arc<FredClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for KeyIndicatorsTool {
    fn name(&self) -> &str {
        "get_economic_indicators"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_economic_indicators".into(),
            description: "Get a dashboard of key economic indicators (GDP, unemployment, CPI, \
                          rates) with their latest values."
                .into(),
            input_schema: json!({"type": "object", "properties": {}}),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> EconResult<ToolOutput> {
        match self.client.key_indicators().await {
            Ok(dashboard) => json_output(&dashboard),
            Err(e) => Ok(error_payload(format!("Failed to build dashboard: {e}"))),
        }
    }
}

/// Register every economic tool against one shared client.
pub fn register_economic_tools(registry: &mut super::ToolRegistry, client: Arc<FredClient>) {
    registry.register(Box::new(FetchSeriesTool::new(client.clone())));
    registry.register(Box::new(SearchSeriesTool::new(client.clone())));
    registry.register(Box::new(CalculateStatisticsTool::new(client.clone())));
    registry.register(Box::new(CompareSeriesTool::new(client.clone())));
    registry.register(Box::new(KeyIndicatorsTool::new(client)));
}
