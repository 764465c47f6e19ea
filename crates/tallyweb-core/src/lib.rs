//! Core invoice derivation and transaction classification logic
//!
//! The compute modules (`money`, `invoice`, `transaction`, `view`) are pure
//! and stateless: every call rebuilds its result from its inputs. The
//! `Journal` wraps the current transaction snapshot in memory and runs the
//! classify -> filter -> sort -> paginate pipeline for the API layer.

pub mod error;
pub mod invoice;
pub mod money;
pub mod reports;
pub mod source;
pub mod time;
pub mod transaction;
pub mod view;

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tallyweb_config::{Config, TimeRange};

pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use invoice::{
    compute_invoice_totals, update_line_item, InvoiceTotals, ItemField, LineItem, PaymentPolicy,
};
pub use reports::{summarize, TimePeriodSummary, TransactionSummary, TransactionsResponse};
pub use source::{JsonSnapshotSource, TransactionSource};
pub use time::{TimeContext, TimeFilter};
pub use transaction::{
    classify, classify_transactions, derive_status, flow_direction, ClassifiedTransaction,
    FlowDirection, PaymentStatus, Transaction, INCOMING_TYPES, OUTGOING_TYPES,
};
pub use view::{paginate, sort_transactions, Page, SortDirection, SortSpec};

/// Snapshot source reference type
pub type SourceRef = Arc<dyn TransactionSource>;

/// Parameters for a transaction list query
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    /// Case-insensitive substring search over party, description, type and
    /// payment type
    pub q: Option<String>,
    /// Exact transaction type filter
    pub tx_type: Option<String>,
    /// Sort column and direction
    pub sort: SortSpec,
    /// 1-based page index; out-of-range values clamp to 1
    pub page: usize,
    /// Rows per page; `None` uses the configured default
    pub page_size: Option<usize>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            q: None,
            tx_type: None,
            sort: SortSpec::default(),
            page: 1,
            page_size: None,
        }
    }
}

/// In-memory journal over the current transaction snapshot
pub struct Journal {
    config: Config,
    source: SourceRef,
    data: RwLock<Vec<Transaction>>,
    entry: RwLock<Option<PathBuf>>,
    time_context: RwLock<TimeContext>,
}

impl Journal {
    /// Create a new journal with config and snapshot source
    pub fn new(config: Config, source: SourceRef) -> Self {
        let range = config.time_range.default_range;
        Self {
            config,
            source,
            data: RwLock::new(Vec::new()),
            entry: RwLock::new(None),
            time_context: RwLock::new(TimeContext::new(range)),
        }
    }

    /// Load the snapshot from the given path
    pub async fn load(&mut self, path: PathBuf) -> CoreResult<()> {
        let transactions = self.source.fetch(path.clone()).await?;
        log::info!(
            "Loaded {} transactions from {}",
            transactions.len(),
            path.display()
        );

        *self.data.write().unwrap() = transactions;
        *self.entry.write().unwrap() = Some(path);
        Ok(())
    }

    /// Re-read the previously loaded snapshot
    pub async fn reload(&mut self) -> CoreResult<()> {
        let entry = self.entry.read().unwrap().clone();
        match entry {
            Some(path) => self.load(path).await,
            None => Err(CoreError::NotLoaded),
        }
    }

    /// Whether a snapshot has been loaded
    pub fn is_loaded(&self) -> bool {
        self.entry.read().unwrap().is_some()
    }

    // ==================== Transaction Access ====================

    /// Get all raw transactions
    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.data.read().unwrap().clone()
    }

    /// Get raw transactions with offset pagination
    pub fn transactions(&self, limit: usize, offset: usize) -> Vec<Transaction> {
        let data = self.data.read().unwrap();
        data.iter().skip(offset).take(limit).cloned().collect()
    }

    /// Get total transaction count
    pub fn transaction_count(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Get a raw transaction by ID
    pub fn transaction(&self, id: &str) -> Option<Transaction> {
        let data = self.data.read().unwrap();
        data.iter().find(|t| t.id == id).cloned()
    }

    /// Get a single transaction in its classified display form
    pub fn classified_transaction(&self, id: &str) -> CoreResult<ClassifiedTransaction> {
        self.transaction(id)
            .map(|t| classify(&t))
            .ok_or_else(|| CoreError::TransactionNotFound { id: id.to_string() })
    }

    /// Classify the full snapshot within the active time context
    pub fn classified(&self) -> Vec<ClassifiedTransaction> {
        let data = self.data.read().unwrap();
        let context = self.time_context.read().unwrap().clone();

        let in_range: Vec<Transaction> = data
            .iter()
            .filter(|t| t.filter_by_time(&context))
            .cloned()
            .collect();
        classify_transactions(&in_range)
    }

    /// Run the full list pipeline: classify, filter, sort, paginate
    ///
    /// The whole result is rebuilt from the snapshot on every call; there is
    /// no cached derived state to drift out of sync.
    pub fn query(&self, query: &TransactionQuery) -> TransactionsResponse {
        let mut rows = self.classified();

        if let Some(q) = query.q.as_deref() {
            let needle = q.to_lowercase();
            if !needle.is_empty() {
                rows.retain(|t| {
                    t.party
                        .as_deref()
                        .map(|p| p.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                        || t.description
                            .as_deref()
                            .map(|d| d.to_lowercase().contains(&needle))
                            .unwrap_or(false)
                        || t.tx_type.to_lowercase().contains(&needle)
                        || t.payment_type
                            .as_deref()
                            .map(|p| p.to_lowercase().contains(&needle))
                            .unwrap_or(false)
                });
            }
        }

        if let Some(tx_type) = query.tx_type.as_deref() {
            if !tx_type.is_empty() {
                rows.retain(|t| t.tx_type == tx_type);
            }
        }

        let rows = sort_transactions(rows, &query.sort);

        let page_size = query
            .page_size
            .unwrap_or(self.config.pagination.records_per_page);
        let page = paginate(&rows, query.page, page_size);

        TransactionsResponse {
            transactions: page.items,
            total_count: page.total_count,
            total_pages: page.total_pages,
            page: page.page,
            page_size: page.page_size,
        }
    }

    /// Aggregate summary over the classified snapshot
    pub fn summary(&self) -> TransactionSummary {
        summarize(&self.classified())
    }

    // ==================== Time Control Methods ====================

    /// Get current time context
    pub fn time_context(&self) -> TimeContext {
        self.time_context.read().unwrap().clone()
    }

    /// Set time range
    pub fn set_time_range(&self, range: TimeRange) {
        let mut ctx = self.time_context.write().unwrap();
        ctx.range = range;
        ctx.custom_start = None;
        ctx.custom_end = None;
    }

    /// Set custom date range
    pub fn set_custom_range(&self, start: chrono::NaiveDate, end: chrono::NaiveDate) {
        let mut ctx = self.time_context.write().unwrap();
        ctx.range = TimeRange::Custom;
        ctx.custom_start = Some(start);
        ctx.custom_end = Some(end);
    }

    /// Get time period summary
    pub fn time_period_summary(&self) -> TimePeriodSummary {
        let context = self.time_context.read().unwrap().clone();
        TimePeriodSummary {
            range_description: context.description(),
            start_date: context.start_date().map(|d| d.to_string()),
            end_date: context.end_date().map(|d| d.to_string()),
            transaction_count: self.classified().len(),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// In-memory source for journal tests
    struct FixedSource {
        transactions: Vec<Transaction>,
    }

    #[async_trait]
    impl TransactionSource for FixedSource {
        async fn fetch(&self, _path: PathBuf) -> CoreResult<Vec<Transaction>> {
            Ok(self.transactions.clone())
        }
    }

    fn snapshot() -> Vec<Transaction> {
        serde_json::from_str(
            r#"[
            {"id": "s1", "type": "Sale", "amount": 100, "paid_amount": 100,
             "date": "2024-01-03", "party": "Acme Traders", "payment_type": "Cash"},
            {"id": "p1", "type": "Purchase", "amount": 400, "paid_amount": 100,
             "date": "2024-01-01", "party": "Bolt Supply"},
            {"id": "s2", "type": "Sale", "amount": 250,
             "date": "2024-01-02", "party": "Zen Stores", "description": "bulk order"},
            {"id": "c1", "type": "Add Cash", "amount": 75, "date": "2024-01-04"}
        ]"#,
        )
        .unwrap()
    }

    async fn loaded_journal() -> Journal {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        let source = Arc::new(FixedSource {
            transactions: snapshot(),
        });
        let mut journal = Journal::new(config, source);
        journal.load(PathBuf::from("snapshot.json")).await.unwrap();
        journal
    }

    #[tokio::test]
    async fn test_load_and_count() {
        let journal = loaded_journal().await;
        assert!(journal.is_loaded());
        assert_eq!(journal.transaction_count(), 4);
    }

    #[tokio::test]
    async fn test_reload_without_load_errors() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        let source = Arc::new(FixedSource {
            transactions: vec![],
        });
        let mut journal = Journal::new(config, source);
        assert!(matches!(journal.reload().await, Err(CoreError::NotLoaded)));
    }

    #[tokio::test]
    async fn test_transaction_lookup() {
        let journal = loaded_journal().await;
        assert!(journal.transaction("s1").is_some());
        assert!(journal.transaction("nope").is_none());

        let classified = journal.classified_transaction("p1").unwrap();
        assert_eq!(classified.display_amount, -400.0);
        assert_eq!(classified.status, "Partially Paid");

        assert!(matches!(
            journal.classified_transaction("nope"),
            Err(CoreError::TransactionNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_query_default_sorts_date_desc() {
        let journal = loaded_journal().await;
        let response = journal.query(&TransactionQuery::default());
        assert_eq!(response.total_count, 4);
        let dates: Vec<&str> = response
            .transactions
            .iter()
            .map(|t| t.date.as_str())
            .collect();
        assert_eq!(
            dates,
            vec!["2024-01-04", "2024-01-03", "2024-01-02", "2024-01-01"]
        );
    }

    #[tokio::test]
    async fn test_query_search_filter() {
        let journal = loaded_journal().await;
        let response = journal.query(&TransactionQuery {
            q: Some("bulk".to_string()),
            ..Default::default()
        });
        assert_eq!(response.total_count, 1);
        assert_eq!(response.transactions[0].id, "s2");
    }

    #[tokio::test]
    async fn test_query_type_filter() {
        let journal = loaded_journal().await;
        let response = journal.query(&TransactionQuery {
            tx_type: Some("Sale".to_string()),
            ..Default::default()
        });
        assert_eq!(response.total_count, 2);
        assert!(response.transactions.iter().all(|t| t.tx_type == "Sale"));
    }

    #[tokio::test]
    async fn test_query_stale_page_clamps() {
        let journal = loaded_journal().await;
        let response = journal.query(&TransactionQuery {
            page: 9,
            page_size: Some(2),
            ..Default::default()
        });
        assert_eq!(response.page, 1);
        assert_eq!(response.total_pages, 2);
        assert_eq!(response.transactions.len(), 2);
    }

    #[tokio::test]
    async fn test_query_uses_configured_page_size() {
        let journal = loaded_journal().await;
        let response = journal.query(&TransactionQuery::default());
        // Config default is 10 records per page
        assert_eq!(response.page_size, 10);
        assert_eq!(response.total_pages, 1);
    }

    #[tokio::test]
    async fn test_summary_over_snapshot() {
        let journal = loaded_journal().await;
        let summary = journal.summary();
        assert_eq!(summary.total_count, 4);
        assert_eq!(summary.total_incoming, 425.0);
        assert_eq!(summary.total_outgoing, 400.0);
        assert_eq!(summary.net_flow, 25.0);
    }

    #[tokio::test]
    async fn test_time_filter_narrows_queries() {
        let journal = loaded_journal().await;
        journal.set_custom_range(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        );
        let response = journal.query(&TransactionQuery::default());
        assert_eq!(response.total_count, 2);

        journal.set_time_range(TimeRange::All);
        assert_eq!(journal.query(&TransactionQuery::default()).total_count, 4);
    }
}
