//! Transaction snapshot model and display classification
//!
//! Transactions arrive as read-only JSON snapshots from the upstream data
//! service. Classification derives a view-model copy: a signed display
//! amount (credit vs. debit by type) and a payment-status label. The
//! original record is never mutated and unknown fields pass through
//! untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money;

/// Transaction types whose amounts display as outgoing (negative)
pub const OUTGOING_TYPES: [&str; 4] = ["Purchase", "Expense", "Reduce Cash", "Withdrawal"];

/// Transaction types whose amounts display as incoming (positive)
pub const INCOMING_TYPES: [&str; 4] = ["Add Cash", "Income", "Sale", "Deposit"];

/// A financial transaction as fetched from the upstream service
///
/// `type` is an open string enum: sales, purchases, expenses, cash
/// adjustments, loan entries and whatever the service adds next. Fields not
/// modeled here are preserved verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub tx_type: String,
    /// Magnitude of the transaction; the source always sends it unsigned
    #[serde(default, deserialize_with = "money::de_coerced_f64")]
    pub amount: f64,
    #[serde(
        default,
        deserialize_with = "money::de_coerced_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub paid_amount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "money::de_coerced_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance_due: Option<f64>,
    /// Transaction date (YYYY-MM-DD format)
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    /// Customer / supplier / account name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit status from the source; always wins over derivation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-form descriptive fields passed through unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Transaction {
    /// Get the transaction date as NaiveDate
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Cash-flow direction of a transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Incoming,
    Outgoing,
    /// Unlisted types keep their amount as-is
    Neutral,
}

/// Look up the sign category for a transaction type
pub fn flow_direction(tx_type: &str) -> FlowDirection {
    if OUTGOING_TYPES.contains(&tx_type) {
        FlowDirection::Outgoing
    } else if INCOMING_TYPES.contains(&tx_type) {
        FlowDirection::Incoming
    } else {
        FlowDirection::Neutral
    }
}

/// Payment status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    PartiallyPaid,
    Unpaid,
    /// Zero-amount transactions carry no payment state
    NotApplicable,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::PartiallyPaid => "Partially Paid",
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::NotApplicable => "N/A",
        }
    }

    /// Business-priority rank used when sorting by status (best-paid first)
    pub fn rank(&self) -> u8 {
        match self {
            PaymentStatus::Paid => 1,
            PaymentStatus::PartiallyPaid => 2,
            PaymentStatus::Unpaid => 3,
            PaymentStatus::NotApplicable => 4,
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(PaymentStatus::Paid),
            "Partially Paid" => Ok(PaymentStatus::PartiallyPaid),
            "Unpaid" => Ok(PaymentStatus::Unpaid),
            "N/A" => Ok(PaymentStatus::NotApplicable),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction enriched with the derived display fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub tx_type: String,
    #[serde(default, deserialize_with = "money::de_coerced_f64")]
    pub amount: f64,
    #[serde(
        default,
        deserialize_with = "money::de_coerced_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub paid_amount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "money::de_coerced_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance_due: Option<f64>,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Signed amount for display: negative for outgoing types
    #[serde(default, deserialize_with = "money::de_coerced_f64")]
    pub display_amount: f64,
    /// Status label; explicit source statuses pass through verbatim
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClassifiedTransaction {
    /// Get the transaction date as NaiveDate
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Derive the payment status from amount, paid amount and balance due
pub fn derive_status(amount: f64, paid_amount: Option<f64>, balance_due: Option<f64>) -> PaymentStatus {
    let amount = money::coerce(amount);
    if amount == 0.0 {
        return PaymentStatus::NotApplicable;
    }

    let paid = money::coerce(paid_amount.unwrap_or(0.0));
    let due = balance_due.map(money::coerce).unwrap_or(amount - paid);

    if paid >= amount || due <= 0.0 {
        PaymentStatus::Paid
    } else if paid > 0.0 {
        PaymentStatus::PartiallyPaid
    } else {
        PaymentStatus::Unpaid
    }
}

/// Classify a single transaction into its display form
pub fn classify(tx: &Transaction) -> ClassifiedTransaction {
    let amount = money::coerce(tx.amount);

    let display_amount = match flow_direction(&tx.tx_type) {
        FlowDirection::Outgoing => -amount.abs(),
        FlowDirection::Incoming => amount.abs(),
        FlowDirection::Neutral => amount,
    };

    let status = match tx.status.as_deref() {
        Some(explicit) if !explicit.is_empty() => explicit.to_string(),
        _ => derive_status(amount, tx.paid_amount, tx.balance_due).to_string(),
    };

    ClassifiedTransaction {
        id: tx.id.clone(),
        tx_type: tx.tx_type.clone(),
        amount,
        paid_amount: tx.paid_amount,
        balance_due: tx.balance_due,
        date: tx.date.clone(),
        payment_type: tx.payment_type.clone(),
        party: tx.party.clone(),
        description: tx.description.clone(),
        display_amount,
        status,
        extra: tx.extra.clone(),
    }
}

/// Classify a snapshot of transactions; pure and infallible
pub fn classify_transactions(transactions: &[Transaction]) -> Vec<ClassifiedTransaction> {
    transactions.iter().map(classify).collect()
}

// ==================== Tests ====================
