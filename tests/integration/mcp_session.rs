/// End-to-end JSON-RPC sessions against an in-memory server
use migraine_tracker_mcp::mcp::protocol::error_codes;
use migraine_tracker_mcp::*;
use serde_json::{json, Value};

fn session(config: StoreConfig) -> McpServer {
    let tracker = MigraineTrackerServer::in_memory(config).expect("Failed to create server");
    McpServer::new(tracker).with_clock(local_timestamp::parse("2025-12-16T12:00").unwrap())
}

fn call(id: u64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
    .to_string()
}

/// The text and error flag of a tools/call response
async fn call_text(server: &mut McpServer, id: u64, name: &str, arguments: Value) -> (String, bool) {
    let response = server
        .process_line(&call(id, name, arguments))
        .await
        .expect("tools/call should be answered");
    assert!(response.error.is_none());

    let result = response.result.expect("tools/call should carry a result");
    let text = result["content"][0]["text"].as_str().unwrap_or_default().to_string();
    (text, result["isError"].as_bool().unwrap_or(false))
}

#[cfg(test)]
mod mcp_session_tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_handshake() {
        let mut server = session(StoreConfig::default());

        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .expect("initialize should be answered");
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "Migraine Tracker MCP");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);

        let notification = server
            .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(notification.is_none());
        assert!(server.is_initialized());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let mut server = session(StoreConfig::default());

        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":"list","method":"tools/list"}"#)
            .await
            .unwrap();
        assert_eq!(response.id, json!("list"));

        let tools = response.result.unwrap()["tools"].as_array().cloned().unwrap();
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(names.len(), 9);
        for expected in ["attack_log", "attack_get", "status", "analytics", "intensity_curve"] {
            assert!(names.contains(&expected), "missing tool {}", expected);
        }
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_log_then_get_day() {
        let mut server = session(StoreConfig::default().without_seed());

        let (text, is_error) = call_text(
            &mut server,
            1,
            "attack_log",
            json!({
                "start_time": "2025-12-15",
                "severity": "Severe",
                "triggers": ["Stress", "Skipped lunch"]
            }),
        )
        .await;
        assert!(!is_error, "{}", text);
        assert!(text.starts_with("Logged attack: 2025-12-15 Severe | 09:00 to 13:00 | 4 hours"));

        let (text, _) = call_text(&mut server, 2, "attack_get", json!({ "day": "yesterday" })).await;
        assert!(text.contains("triggers: Stress, Skipped lunch"));

        let (text, _) = call_text(&mut server, 3, "attack_get", json!({})).await;
        assert_eq!(text, "No attack logged on 2025-12-16");
    }

    #[tokio::test]
    async fn test_clear_day_removes_log() {
        let mut server = session(StoreConfig::default());

        let (text, is_error) = call_text(&mut server, 1, "attack_clear", json!({ "day": "2025-12-09" })).await;
        assert!(!is_error);
        assert_eq!(text, "Removed the attack logged on 2025-12-09");
        assert!(server
            .tracker()
            .store()
            .find_by_day(DateKey::parse("2025-12-09").unwrap())
            .is_none());
    }

    #[tokio::test]
    async fn test_status_over_sample_data() {
        let mut server = session(StoreConfig::default());

        let (text, is_error) = call_text(&mut server, 1, "status", json!({})).await;
        assert!(!is_error);
        assert!(text.starts_with("4 days pain-free\nLast attack: 12 December"));
    }

    #[tokio::test]
    async fn test_tool_failures_are_error_results() {
        let mut server = session(StoreConfig::default().without_seed());

        let (text, is_error) = call_text(
            &mut server,
            1,
            "attack_log",
            json!({ "start_time": "2025-12-15T08:00", "severity": "Extreme" }),
        )
        .await;
        assert!(is_error);
        assert!(text.contains("Invalid severity 'Extreme'"));

        let (_, is_error) = call_text(&mut server, 2, "attack_log", json!({ "severity": "Mild" })).await;
        assert!(is_error);
        assert!(server.tracker().store().is_empty());

        let (text, is_error) = call_text(&mut server, 3, "no_such_tool", json!({})).await;
        assert!(is_error);
        assert_eq!(text, "Unknown tool: no_such_tool");
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let mut server = session(StoreConfig::default());

        let bad_json = server.process_line("{not json").await.unwrap();
        assert_eq!(bad_json.error.unwrap().code, error_codes::PARSE_ERROR);

        let unknown = server
            .process_line(r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(unknown.id, json!(7));
        assert_eq!(unknown.error.unwrap().code, error_codes::METHOD_NOT_FOUND);

        let wrong_version = server
            .process_line(r#"{"jsonrpc":"1.0","id":8,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(wrong_version.error.unwrap().code, error_codes::INVALID_REQUEST);

        assert!(server.process_line("   ").await.is_none());
    }
}
