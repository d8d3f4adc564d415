//! MCP Tool definitions and handlers
//!
//! All three tools share one pipeline: parse arguments, validate the user
//! ID, fetch the presence once, render it. They differ only in the renderer.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{McpError, Result};
use crate::lanyard::client::LanyardClient;
use crate::lanyard::format::{format_kv, format_presence, format_spotify};
use crate::lanyard::types::Presence;
use crate::lanyard::utils::sanitize_user_id;
use crate::mcp::types::{CallToolResult, Tool};

pub const GET_USER_PRESENCE: &str = "get_user_presence";
pub const GET_USER_SPOTIFY: &str = "get_user_spotify";
pub const GET_USER_KV: &str = "get_user_kv";

/// Renders a fetched presence; receives the user ID and the current epoch millis
type Renderer = fn(&str, &Presence, i64) -> String;

/// A registered tool
pub struct RegisteredTool {
    pub name: &'static str,
    pub description: &'static str,
    render: Renderer,
}

static TOOLS: [RegisteredTool; 3] = [
    RegisteredTool {
        name: GET_USER_PRESENCE,
        description: "Get Discord presence information for a user via the Lanyard API - provide a Discord user ID",
        render: render_presence,
    },
    RegisteredTool {
        name: GET_USER_SPOTIFY,
        description: "Get Spotify listening information for a Discord user via Lanyard - provide a Discord user ID",
        render: render_spotify,
    },
    RegisteredTool {
        name: GET_USER_KV,
        description: "Get Lanyard KV (key-value) custom data for a Discord user - provide a Discord user ID",
        render: render_kv,
    },
];

fn render_presence(user_id: &str, presence: &Presence, _now_ms: i64) -> String {
    format_presence(user_id, presence)
}

fn render_spotify(user_id: &str, presence: &Presence, now_ms: i64) -> String {
    format_spotify(user_id, presence, now_ms)
}

fn render_kv(user_id: &str, presence: &Presence, _now_ms: i64) -> String {
    format_kv(user_id, presence)
}

/// Look up a registered tool by name
pub fn find_tool(name: &str) -> Option<&'static RegisteredTool> {
    TOOLS.iter().find(|tool| tool.name == name)
}

/// Arguments accepted by every tool; anything else is ignored
#[derive(Debug, Default, Deserialize)]
struct UserIdArgs {
    #[serde(default, alias = "userId")]
    user_id: Option<String>,
}

impl UserIdArgs {
    /// Missing or null arguments mean an empty user ID, which fails validation
    fn from_arguments(args: Value) -> Result<Self> {
        if args.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(args).map_err(|e| {
            McpError::InvalidArguments {
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Tool handler
pub struct ToolHandler {
    lanyard_client: Arc<LanyardClient>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(lanyard_client: Arc<LanyardClient>) -> Self {
        Self { lanyard_client }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        TOOLS
            .iter()
            .map(|tool| Tool {
                name: tool.name.to_string(),
                description: Some(tool.description.to_string()),
                input_schema: user_id_schema(),
            })
            .collect()
    }

    /// Call a tool by name. Failures come back as error results, never as `Err`.
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        let tool = match find_tool(name) {
            Some(tool) => tool,
            None => {
                tracing::warn!(tool = name, "Unknown tool requested");
                let err = McpError::UnknownTool {
                    name: name.to_string(),
                };
                return CallToolResult::error(err.to_string());
            }
        };

        match self.run_lookup(tool, args).await {
            Ok(text) => CallToolResult::text(text),
            Err(e) => {
                tracing::warn!(tool = tool.name, error = %e, "Tool call failed");
                CallToolResult::error(e.to_string())
            }
        }
    }

    async fn run_lookup(&self, tool: &RegisteredTool, args: Value) -> Result<String> {
        let args = UserIdArgs::from_arguments(args)?;
        let raw_id = args.user_id.unwrap_or_default();
        tracing::info!(tool = tool.name, user_id = %raw_id, "Fetching Lanyard data");

        let user_id = sanitize_user_id(&raw_id)?;
        let presence = self.lanyard_client.get_presence(user_id).await?;
        let now_ms = chrono::Utc::now().timestamp_millis();

        Ok((tool.render)(user_id, &presence, now_ms))
    }
}

// ==================== Tool Schemas ====================

fn user_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "user_id": {
                "type": "string",
                "description": "Discord user ID (17-20 digit snowflake)",
                "pattern": "^[0-9]{17,20}$"
            }
        },
        "required": ["user_id"]
    })
}
