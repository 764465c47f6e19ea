//! API route modules
//!
//! - routes::transactions: classified transaction list, detail, reload
//! - routes::invoices: invoice totals and line-item recomputation
//! - routes::reports: summary figures
//! - routes::time: time range control

pub mod invoices;
pub mod reports;
pub mod time;
pub mod transactions;
