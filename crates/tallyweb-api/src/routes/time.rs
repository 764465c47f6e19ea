//! Time range control endpoints

use axum::extract::{Query, State};
use chrono::NaiveDate;
use std::collections::HashMap;

use tallyweb_config::TimeRange;

use crate::error::ApiError;
use crate::AppState;

/// Get the active time range (JSON)
pub async fn api_time_range(state: State<AppState>) -> String {
    let journal = state.journal.read().await;
    let context = journal.time_context();
    serde_json::json!({
        "range": context.range.to_string(),
        "start_date": context.start_date().map(|d| d.to_string()),
        "end_date": context.end_date().map(|d| d.to_string()),
        "description": context.description(),
    })
    .to_string()
}

/// Set the active time range
///
/// `range` is one of month/quarter/year/all, or `custom:START,END` with
/// ISO dates.
pub async fn api_set_time_range(
    state: State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let raw = params.get("range").cloned().unwrap_or_default();
    let journal = state.journal.read().await;

    if let Some(custom) = raw.strip_prefix("custom:") {
        let (start, end) = custom.split_once(',').ok_or_else(|| ApiError::BadRequest {
            message: "Custom range needs start,end dates".to_string(),
        })?;
        let start = parse_iso_date(start)?;
        let end = parse_iso_date(end)?;
        journal.set_custom_range(start, end);
    } else {
        let range: TimeRange = raw.parse().map_err(|e| ApiError::BadRequest { message: e })?;
        journal.set_time_range(range);
    }

    Ok(r#"{"success": true}"#.to_string())
}

fn parse_iso_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ApiError::BadRequest {
        message: format!("Invalid date: {}", s),
    })
}
