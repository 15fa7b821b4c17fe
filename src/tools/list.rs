/// Tool for listing logged attacks
///
/// This module implements the attack_list MCP tool.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{filter_window, TimeWindow};
use crate::domain::AttackLog;
use crate::storage::SlotStorage;
use crate::store::LogStore;
use crate::tools::{describe_log, ToolError};

/// Parameters for listing attacks
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListAttacksParams {
    /// Time window: 7d, 30d, 3m, 6m or all (default: all)
    pub window: Option<String>,
    /// Show at most this many of the most recent attacks (optional)
    pub limit: Option<usize>,
}

/// Response from listing attacks
#[derive(Debug, Serialize)]
pub struct ListAttacksResponse {
    pub window: TimeWindow,
    /// Matching attacks, most recent first
    pub logs: Vec<AttackLog>,
    /// Matches before `limit` was applied
    pub total: usize,
    pub message: String,
}

/// List the attacks inside a window, newest first
pub fn list_attacks<S: SlotStorage>(
    store: &LogStore<S>,
    params: ListAttacksParams,
    now: NaiveDateTime,
) -> Result<ListAttacksResponse, ToolError> {
    let window = match params.window.as_deref() {
        Some(w) => w.parse::<TimeWindow>()?,
        None => TimeWindow::AllTime,
    };

    let mut logs = filter_window(store.logs(), window, now);
    logs.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    let total = logs.len();
    if let Some(limit) = params.limit {
        logs.truncate(limit);
    }

    let message = if logs.is_empty() {
        format!("No attacks logged ({})", window)
    } else {
        let lines = logs
            .iter()
            .map(|log| format!("- {}", describe_log(log)))
            .collect::<Vec<_>>()
            .join("\n");
        let shown = if logs.len() < total {
            format!(", showing {}", logs.len())
        } else {
            String::new()
        };
        format!("{} attack{} ({}{})\n\n{}", total, if total == 1 { "" } else { "s" }, window, shown, lines)
    };

    Ok(ListAttacksResponse {
        window,
        logs,
        total,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::local_timestamp;
    use crate::storage::SqliteSlotStorage;
    use crate::store::StoreConfig;

    #[test]
    fn test_list_sample_data_newest_first() {
        let storage = SqliteSlotStorage::open_in_memory().unwrap();
        let store = LogStore::load(storage, StoreConfig::default());
        let now = local_timestamp::parse("2025-12-16T12:00").unwrap();

        let response = list_attacks(&store, ListAttacksParams::default(), now).unwrap();
        assert_eq!(response.total, 2);
        assert_eq!(response.logs[0].id.as_str(), "sample-2");
        assert!(response.message.starts_with("2 attacks (All Time)"));

        let limited = list_attacks(
            &store,
            ListAttacksParams {
                window: Some("30d".to_string()),
                limit: Some(1),
            },
            now,
        )
        .unwrap();
        assert_eq!(limited.logs.len(), 1);
        assert!(limited.message.contains("showing 1"));
    }

    #[test]
    fn test_unknown_window_is_an_error() {
        let storage = SqliteSlotStorage::open_in_memory().unwrap();
        let store = LogStore::load(storage, StoreConfig::default());
        let now = local_timestamp::parse("2025-12-16T12:00").unwrap();

        let result = list_attacks(
            &store,
            ListAttacksParams {
                window: Some("decade".to_string()),
                limit: None,
            },
            now,
        );
        assert!(result.is_err());
    }
}
