//! Error types for the Lanyard MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Lanyard MCP Server
#[derive(Error, Debug)]
pub enum LanyardMcpError {
    /// Lanyard API errors
    #[error("{0}")]
    Lanyard(#[from] LanyardApiError),

    /// Validation errors
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Outcomes of a Lanyard lookup other than a usable presence record
#[derive(Error, Debug)]
pub enum LanyardApiError {
    #[error("User not found: {user_id} (the Discord user may not be monitored by Lanyard)")]
    NotFound { user_id: String },

    #[error("Rate limit exceeded. Please try again later{}.", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Request timed out while fetching user {user_id}")]
    Timeout { user_id: String },

    #[error("Network error while contacting Lanyard: {message}")]
    Network { message: String },

    #[error("API error: HTTP {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Malformed response from Lanyard: {message}")]
    MalformedResponse { message: String },
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(" (retry after {} seconds)", secs),
        None => String::new(),
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidEnvVar { var: String, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid user ID: {reason}; a Discord user ID must be 17-20 digits")]
    InvalidUserId { reason: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },
}

/// Result type alias for Lanyard MCP operations
pub type Result<T> = std::result::Result<T, LanyardMcpError>;
