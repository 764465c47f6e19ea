//! Report structures for API responses

use serde::{Deserialize, Serialize};

use crate::transaction::{ClassifiedTransaction, PaymentStatus};

/// Transactions list response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<ClassifiedTransaction>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Aggregate figures over a set of classified transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_count: usize,
    pub paid_count: usize,
    pub partially_paid_count: usize,
    pub unpaid_count: usize,
    pub not_applicable_count: usize,
    /// Sum of positive display amounts
    pub total_incoming: f64,
    /// Sum of the magnitudes of negative display amounts
    pub total_outgoing: f64,
    pub net_flow: f64,
}

/// Build a summary from classified rows
pub fn summarize(transactions: &[ClassifiedTransaction]) -> TransactionSummary {
    let mut summary = TransactionSummary {
        total_count: transactions.len(),
        paid_count: 0,
        partially_paid_count: 0,
        unpaid_count: 0,
        not_applicable_count: 0,
        total_incoming: 0.0,
        total_outgoing: 0.0,
        net_flow: 0.0,
    };

    for tx in transactions {
        match tx.status.parse::<PaymentStatus>() {
            Ok(PaymentStatus::Paid) => summary.paid_count += 1,
            Ok(PaymentStatus::PartiallyPaid) => summary.partially_paid_count += 1,
            Ok(PaymentStatus::Unpaid) => summary.unpaid_count += 1,
            Ok(PaymentStatus::NotApplicable) => summary.not_applicable_count += 1,
            // Explicit pass-through labels stay outside the four buckets
            Err(_) => {}
        }

        if tx.display_amount >= 0.0 {
            summary.total_incoming += tx.display_amount;
        } else {
            summary.total_outgoing += tx.display_amount.abs();
        }
    }

    summary.net_flow = summary.total_incoming - summary.total_outgoing;
    summary
}

/// Time period description for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimePeriodSummary {
    pub range_description: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub transaction_count: usize,
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{classify_transactions, Transaction};

    #[test]
    fn test_summarize() {
        let raw = r#"[
            {"id": "a", "type": "Sale", "amount": 100, "paid_amount": 100, "date": "2024-01-03"},
            {"id": "b", "type": "Purchase", "amount": 40, "paid_amount": 10, "date": "2024-01-01"},
            {"id": "c", "type": "Sale", "amount": 250, "date": "2024-01-02"},
            {"id": "d", "type": "Add Cash", "amount": 0, "date": "2024-01-04"},
            {"id": "e", "type": "Expense", "amount": 60, "paid_amount": 60, "date": "2024-01-05"}
        ]"#;
        let transactions: Vec<Transaction> = serde_json::from_str(raw).unwrap();
        let summary = summarize(&classify_transactions(&transactions));

        assert_eq!(summary.total_count, 5);
        assert_eq!(summary.paid_count, 2);
        assert_eq!(summary.partially_paid_count, 1);
        assert_eq!(summary.unpaid_count, 1);
        assert_eq!(summary.not_applicable_count, 1);
        assert_eq!(summary.total_incoming, 350.0);
        assert_eq!(summary.total_outgoing, 100.0);
        assert_eq!(summary.net_flow, 250.0);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.net_flow, 0.0);
    }

    #[test]
    fn test_custom_status_outside_buckets() {
        let raw = r#"[{"id": "a", "type": "Sale", "amount": 5, "status": "Draft", "date": "2024-01-01"}]"#;
        let transactions: Vec<Transaction> = serde_json::from_str(raw).unwrap();
        let summary = summarize(&classify_transactions(&transactions));
        assert_eq!(summary.total_count, 1);
        assert_eq!(
            summary.paid_count
                + summary.partially_paid_count
                + summary.unpaid_count
                + summary.not_applicable_count,
            0
        );
    }
}
