//! HTTP JSON API server
//!
//! Routes are organized into modules:
//! - routes::transactions: classified transaction list, detail, reload
//! - routes::invoices: invoice totals and line-item recomputation
//! - routes::reports: summary figures and reporting period
//! - routes::time: time range control
//!
//! The page-rendering front end is a separate application; this crate only
//! serves the JSON contracts it consumes.

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use tallyweb_config::Config;
use tallyweb_core::Journal;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<RwLock<Journal>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::invoices::{api_invoice_totals, api_line_item_update};
    use routes::reports::{api_period, api_summary};
    use routes::time::{api_set_time_range, api_time_range};
    use routes::transactions::{api_reload, api_transaction_detail, api_transactions};

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/transactions", get(api_transactions))
        .route("/api/transactions/:id", get(api_transaction_detail))
        .route("/api/invoices/totals", post(api_invoice_totals))
        .route("/api/invoices/line-item", post(api_line_item_update))
        .route("/api/reports/summary", get(api_summary))
        .route("/api/reports/period", get(api_period))
        .route("/api/time-range", get(api_time_range))
        .route("/api/time-range", post(api_set_time_range))
        .route("/api/reload", post(api_reload))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server
///
/// Binds the configured address and serves requests until shutdown.
pub async fn start_server(config: Config, journal: Arc<RwLock<Journal>>) {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { journal, config };

    let router = create_router(state);

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };

    log::info!("Starting tallyweb server on http://{}", addr);
    log::info!("Available endpoints:");
    log::info!("  - /api/transactions (classified list)");
    log::info!("  - /api/invoices/totals (totals derivation)");
    log::info!("  - /api/reports/summary (aggregates)");
    log::info!("  - /api/time-range (reporting period)");

    match axum::serve(listener, router).await {
        Ok(_) => log::info!("Server stopped gracefully"),
        Err(e) => log::error!("Server error: {}", e),
    }
}
