use thiserror::Error;

#[derive(Error, Debug)]
pub enum EconError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Backend timed out after {timeout_secs}s")]
    BackendTimeout { timeout_secs: u64 },

    #[error("Series error: series={series_id}, {message}")]
    Series { series_id: String, message: String },

    #[error("Tool execution error: tool={tool_name}, {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type EconResult<T> = Result<T, EconError>;
