/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Dispatches tool calls to the migraine tracker
/// 3. Sends JSON-RPC responses to stdout

use chrono::{Local, NaiveDateTime};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{MigraineTrackerServer, ServerError};

/// MCP server wrapping a migraine tracker
pub struct McpServer {
    tracker: MigraineTrackerServer,
    /// Whether the client has sent its initialized notification
    initialized: bool,
    /// Fixed "now" used instead of the local clock
    clock: Option<NaiveDateTime>,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(tracker: MigraineTrackerServer) -> Self {
        Self {
            tracker,
            initialized: false,
            clock: None,
        }
    }

    /// Pin the server's notion of "now"
    pub fn with_clock(mut self, now: NaiveDateTime) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn tracker(&self) -> &MigraineTrackerServer {
        &self.tracker
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            ));
        }

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, json!({}))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Migraine Tracker MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let args = tool_params.arguments.unwrap_or_else(|| json!({}));
        debug!("Calling tool '{}'", tool_params.name);

        let result = self.call_tool(&tool_params.name, args);
        if result.is_error {
            warn!("Tool '{}' failed", tool_params.name);
        }

        respond(id, &result)
    }

    fn call_tool(&mut self, name: &str, args: Value) -> ToolCallResult {
        let now = self.now();
        let today = now.date();
        let engine = *self.tracker.analytics();

        match name {
            "attack_log" => invoke(args, |p| {
                tools::log_attack(self.tracker.store_mut(), p).map(|r| r.message)
            }),
            "attack_edit" => invoke(args, |p| {
                tools::edit_attack(self.tracker.store_mut(), p, today).map(|r| r.message)
            }),
            "attack_clear" => invoke(args, |p| {
                tools::clear_day(self.tracker.store_mut(), p, today).map(|r| r.message)
            }),
            "attack_get" => invoke(args, |p| {
                tools::get_day(self.tracker.store(), p, today).map(|r| r.message)
            }),
            "attack_list" => invoke(args, |p| {
                tools::list_attacks(self.tracker.store(), p, now).map(|r| r.message)
            }),
            "calendar_month" => invoke(args, |p| {
                tools::calendar_view(self.tracker.store(), &engine, p, today).map(|r| r.message)
            }),
            "status" => {
                let response = tools::get_status(self.tracker.store(), &engine, now);
                ToolCallResult::success(response.message)
            }
            "analytics" => invoke(args, |p| {
                tools::get_analytics(self.tracker.store(), &engine, p, now).map(|r| r.message)
            }),
            "intensity_curve" => invoke(args, |p| {
                tools::intensity_curve(self.tracker.store(), p, today).map(|r| r.message)
            }),
            _ => ToolCallResult::error(format!("Unknown tool: {}", name)),
        }
    }
}

/// Decode the arguments and run a tool, folding every failure into the result
fn invoke<P, F>(args: Value, run: F) -> ToolCallResult
where
    P: DeserializeOwned,
    F: FnOnce(P) -> Result<String, ToolError>,
{
    let params = match serde_json::from_value::<P>(args) {
        Ok(params) => params,
        Err(e) => return ToolCallResult::error(format!("Invalid arguments: {}", e)),
    };

    match run(params) {
        Ok(message) => ToolCallResult::success(message),
        Err(e) => ToolCallResult::error(e.to_string()),
    }
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to encode result: {}", e),
            None,
        ),
    }
}

fn schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({ "type": "object" }))
}

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Every tool the server exposes
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool(
            "attack_log",
            "Log a migraine attack. A bare date logs a quick 09:00-13:00 entry; by default it replaces any attack already logged that day",
            schema::<tools::AttackParams>(),
        ),
        tool(
            "attack_edit",
            "Replace the attack logged on a day with new details",
            schema::<tools::EditAttackParams>(),
        ),
        tool(
            "attack_clear",
            "Remove every attack logged on a day",
            schema::<tools::DayParams>(),
        ),
        tool(
            "attack_get",
            "Show the attack logged on a day",
            schema::<tools::DayParams>(),
        ),
        tool(
            "attack_list",
            "List logged attacks, most recent first, optionally within a time window",
            schema::<tools::ListAttacksParams>(),
        ),
        tool(
            "calendar_month",
            "Show which days of a month had attacks, with their severity",
            schema::<tools::CalendarParams>(),
        ),
        tool(
            "status",
            "Pain-free streak, this week's medication status and this month's attack counts",
            json!({ "type": "object", "properties": {} }),
        ),
        tool(
            "analytics",
            "Attack totals, average duration, severity mix, monthly trend and top triggers for a time window",
            schema::<tools::AnalyticsParams>(),
        ),
        tool(
            "intensity_curve",
            "Hour-by-hour pain intensity (Mild 3, Moderate 6, Severe 9) for a day",
            schema::<tools::DayParams>(),
        ),
    ]
}
