//! Transactions API endpoints
//!
//! Endpoints:
//! - api_transactions: classified list with search, filter, sort, pagination (JSON)
//! - api_transaction_detail: single classified transaction (JSON)
//! - api_reload: re-read the snapshot file

use axum::extract::{Path, Query, State};
use std::collections::HashMap;

use tallyweb_core::{SortDirection, SortSpec, TransactionQuery};

use crate::error::ApiError;
use crate::AppState;

/// Get classified transactions with search, filter, sort and pagination
pub async fn api_transactions(
    state: State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let journal = state.journal.read().await;

    let key = params
        .get("sort")
        .cloned()
        .unwrap_or_else(|| "date".to_string());
    // Date lists read newest-first unless the caller says otherwise
    let direction = params
        .get("dir")
        .and_then(|s| s.parse().ok())
        .unwrap_or(if key == "date" {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        });

    let query = TransactionQuery {
        q: params.get("q").cloned(),
        tx_type: params.get("type").cloned(),
        sort: SortSpec::new(key, direction),
        page: params.get("page").and_then(|s| s.parse().ok()).unwrap_or(1),
        page_size: params.get("page_size").and_then(|s| s.parse().ok()),
    };

    let response = journal.query(&query);
    serde_json::to_string(&response).unwrap_or_default()
}

/// Get a single classified transaction
pub async fn api_transaction_detail(
    state: State<AppState>,
    path: Path<String>,
) -> Result<String, ApiError> {
    let journal = state.journal.read().await;
    let transaction = journal.classified_transaction(&path.0)?;
    Ok(serde_json::to_string(&transaction).unwrap_or_default())
}

/// Re-read the snapshot file
pub async fn api_reload(state: State<AppState>) -> String {
    let mut journal = state.journal.write().await;
    match journal.reload().await {
        Ok(_) => format!(
            r#"{{"success": true, "count": {}}}"#,
            journal.transaction_count()
        ),
        Err(e) => {
            log::error!("Snapshot reload failed: {}", e);
            serde_json::json!({ "success": false, "error": e.to_details() }).to_string()
        }
    }
}
