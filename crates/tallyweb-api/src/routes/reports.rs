//! Report endpoints

use axum::extract::State;

use tallyweb_utils::format_currency;

use crate::AppState;

/// Aggregate summary over the classified snapshot (JSON)
///
/// Monetary figures are duplicated in a `display` block pre-formatted per
/// the configured currency, ready for the dashboard tiles.
pub async fn api_summary(state: State<AppState>) -> String {
    let journal = state.journal.read().await;
    let summary = journal.summary();
    let currency = &state.config.currency;

    let mut value = serde_json::to_value(&summary).unwrap_or_default();
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "display".to_string(),
            serde_json::json!({
                "total_incoming": format_currency(summary.total_incoming, currency),
                "total_outgoing": format_currency(summary.total_outgoing, currency),
                "net_flow": format_currency(summary.net_flow, currency),
            }),
        );
    }
    value.to_string()
}

/// Description of the active reporting period (JSON)
pub async fn api_period(state: State<AppState>) -> String {
    let journal = state.journal.read().await;
    let period = journal.time_period_summary();
    serde_json::to_string(&period).unwrap_or_default()
}
