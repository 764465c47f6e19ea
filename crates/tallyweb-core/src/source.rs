//! Snapshot source seam
//!
//! Persistence lives in an upstream service; this crate only consumes its
//! exported snapshot, a JSON array of transactions. The trait keeps the
//! journal testable and leaves room for other transports.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::CoreError;
use crate::transaction::Transaction;

/// Provider of transaction snapshots
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch the full snapshot
    async fn fetch(&self, path: PathBuf) -> Result<Vec<Transaction>, CoreError>;
}

/// Reads a snapshot from a JSON file on disk
#[derive(Debug, Default)]
pub struct JsonSnapshotSource;

#[async_trait]
impl TransactionSource for JsonSnapshotSource {
    async fn fetch(&self, path: PathBuf) -> Result<Vec<Transaction>, CoreError> {
        let content = tokio::fs::read_to_string(&path).await.map_err(|_| {
            CoreError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
        })?;

        serde_json::from_str(&content).map_err(|e| CoreError::SnapshotError {
            message: e.to_string(),
        })
    }
}

// ==================== Tests ====================
