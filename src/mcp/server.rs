//! MCP Server implementation
//!
//! Implements the Model Context Protocol server for stdio transport.
//! Messages are newline-delimited JSON-RPC 2.0.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::lanyard::client::LanyardClient;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;

/// MCP Server info
const SERVER_NAME: &str = "lanyard";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Lanyard
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,

    /// Whether the client finished the handshake
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(lanyard_client: Arc<LanyardClient>) -> Self {
        Self {
            tool_handler: ToolHandler::new(lanyard_client),
            initialized: false,
        }
    }

    /// Whether `notifications/initialized` has been received
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Tool handler backing `tools/call`
    pub fn tool_handler(&self) -> &ToolHandler {
        &self.tool_handler
    }

    /// Run the server on stdio
    pub async fn run_stdio(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = reader;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_message(line).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Message is not valid UTF-8");
                    Ok(Some(JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error(format!("Message is not valid UTF-8: {}", e)),
                    )))
                }
            };

            match response {
                Ok(Some(response)) => {
                    let mut response_str = serde_json::to_string(&response)?;
                    response_str.push('\n');
                    writer.write_all(response_str.as_bytes()).await?;
                    writer.flush().await?;
                }
                Ok(None) => {
                    // Notification, no response needed
                }
                Err(e) => {
                    tracing::error!(error = %e, "Error handling message");
                }
            }
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle an incoming JSON-RPC message
    pub async fn handle_message(&mut self, message: &str) -> Result<Option<JsonRpcResponse>> {
        // Try to parse as request
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable JSON-RPC message");
                return Ok(Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(e.to_string()),
                )));
            }
        };

        tracing::debug!(method = %request.method, "Received request");

        if request.is_notification() {
            if request.method == methods::INITIALIZED {
                self.initialized = true;
            }
            return Ok(None);
        }

        // Handle the request
        let response = match request.method.as_str() {
            methods::INITIALIZE => {
                JsonRpcResponse::success(request.id, self.handle_initialize()?)
            }
            methods::PING => JsonRpcResponse::success(request.id, serde_json::json!({})),
            methods::LIST_TOOLS => {
                JsonRpcResponse::success(request.id, self.handle_list_tools()?)
            }
            methods::CALL_TOOL => match self.handle_call_tool(request.params).await {
                Ok(result) => JsonRpcResponse::success(request.id, result),
                Err(error) => JsonRpcResponse::error(request.id, error),
            },
            _ => JsonRpcResponse::error(
                request.id,
                JsonRpcError::method_not_found(&request.method),
            ),
        };

        Ok(Some(response))
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> Result<Value> {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.tool_handler.list_tools(),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request
    async fn handle_call_tool(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: CallToolParams = match params {
            Some(p) => serde_json::from_value(p).map_err(|e| {
                JsonRpcError::invalid_params(format!("Invalid tool parameters: {}", e))
            })?,
            None => return Err(JsonRpcError::invalid_params("Missing tool parameters")),
        };

        let result = self
            .tool_handler
            .call_tool(&params.name, params.arguments)
            .await;

        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }
}
