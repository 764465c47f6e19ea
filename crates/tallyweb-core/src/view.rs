//! Table-view transforms: stable sorting and pagination
//!
//! These mirror the behavior the transaction table expects: clicking the
//! active column header flips direction, status sorts by business priority
//! instead of alphabetically, and a page index left stale by a shrinking
//! filter resets to page 1 instead of rendering empty.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::money;
use crate::transaction::{ClassifiedTransaction, PaymentStatus};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

impl FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: "date".to_string(),
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    /// Request a sort on `key`: re-requesting the active column flips the
    /// direction, a new column starts ascending
    pub fn request(&self, key: &str) -> SortSpec {
        if self.key == key {
            SortSpec::new(key, self.direction.toggle())
        } else {
            SortSpec::new(key, SortDirection::Asc)
        }
    }
}

/// Comparable value extracted from one row for one sort key
#[derive(Debug, Clone, PartialEq)]
enum SortToken {
    Number(f64),
    Rank(u8),
    Text(String),
}

impl SortToken {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortToken::Number(a), SortToken::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortToken::Rank(a), SortToken::Rank(b)) => a.cmp(b),
            (SortToken::Text(a), SortToken::Text(b)) => a.cmp(b),
            // Mixed tokens only arise from inconsistent pass-through fields;
            // group numbers before text
            (SortToken::Number(_), _) => Ordering::Less,
            (_, SortToken::Number(_)) => Ordering::Greater,
            (SortToken::Rank(_), _) => Ordering::Less,
            (_, SortToken::Rank(_)) => Ordering::Greater,
        }
    }
}

/// Rank used when sorting by status; unknown explicit labels sort last
fn status_rank(status: &str) -> u8 {
    PaymentStatus::from_str(status)
        .map(|s| s.rank())
        .unwrap_or(5)
}

fn sort_token(tx: &ClassifiedTransaction, key: &str) -> SortToken {
    match key {
        "amount" => SortToken::Number(money::coerce(tx.amount)),
        "display_amount" => SortToken::Number(money::coerce(tx.display_amount)),
        "paid_amount" => SortToken::Number(money::coerce(tx.paid_amount.unwrap_or(0.0))),
        "balance_due" => SortToken::Number(money::coerce(tx.balance_due.unwrap_or(0.0))),
        "status" => SortToken::Rank(status_rank(&tx.status)),
        "id" => SortToken::Text(tx.id.to_lowercase()),
        "date" => SortToken::Text(tx.date.to_lowercase()),
        "type" => SortToken::Text(tx.tx_type.to_lowercase()),
        "party" => SortToken::Text(tx.party.as_deref().unwrap_or("").to_lowercase()),
        "payment_type" => {
            SortToken::Text(tx.payment_type.as_deref().unwrap_or("").to_lowercase())
        }
        "description" => {
            SortToken::Text(tx.description.as_deref().unwrap_or("").to_lowercase())
        }
        other => match tx.extra.get(other) {
            Some(value) if value.is_number() => {
                SortToken::Number(value.as_f64().unwrap_or(0.0))
            }
            Some(value) => SortToken::Text(
                value.as_str().unwrap_or("").to_lowercase(),
            ),
            None => SortToken::Text(String::new()),
        },
    }
}

/// Stable sort of classified transactions by the given spec
pub fn sort_transactions(
    mut transactions: Vec<ClassifiedTransaction>,
    spec: &SortSpec,
) -> Vec<ClassifiedTransaction> {
    transactions.sort_by(|a, b| {
        let ordering = sort_token(a, &spec.key).compare(&sort_token(b, &spec.key));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    transactions
}

// ==================== Pagination ====================

/// One page of a list plus the figures the pager renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    /// Zero-based index of the first row on this page
    pub start_index: usize,
    /// Exclusive end index
    pub end_index: usize,
}

/// Slice one page out of a list
///
/// An out-of-range page (stale after a filter shrank the list) clamps to
/// page 1 rather than rendering empty. A zero page size is floored at 1.
pub fn paginate<T: Clone>(list: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_count = list.len();
    let total_pages = (total_count + page_size - 1) / page_size;

    let page = if page == 0 || page > total_pages { 1 } else { page };
    let start_index = (page - 1) * page_size;
    let end_index = (start_index + page_size).min(total_count);

    let items = if start_index < total_count {
        list[start_index..end_index].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        total_count,
        total_pages,
        page,
        page_size,
        start_index,
        end_index,
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{classify_transactions, Transaction};

    fn sample() -> Vec<ClassifiedTransaction> {
        let raw = r#"[
            {"id": "a", "type": "Sale", "amount": 100, "paid_amount": 100, "date": "2024-01-03", "party": "Zen Stores"},
            {"id": "b", "type": "Purchase", "amount": 400, "paid_amount": 100, "date": "2024-01-01", "party": "acme traders"},
            {"id": "c", "type": "Sale", "amount": 250, "date": "2024-01-02", "party": "Bolt Supply"},
            {"id": "d", "type": "Add Cash", "amount": 0, "date": "2024-01-04"}
        ]"#;
        let transactions: Vec<Transaction> = serde_json::from_str(raw).unwrap();
        classify_transactions(&transactions)
    }

    #[test]
    fn test_sort_amount_asc() {
        let sorted = sort_transactions(sample(), &SortSpec::new("amount", SortDirection::Asc));
        let amounts: Vec<f64> = sorted.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![0.0, 100.0, 250.0, 400.0]);
    }

    #[test]
    fn test_sort_toggle_flips_to_desc() {
        let spec = SortSpec::new("amount", SortDirection::Asc);
        let once = sort_transactions(sample(), &spec);

        // Re-requesting the active column flips the direction
        let spec = spec.request("amount");
        assert_eq!(spec.direction, SortDirection::Desc);

        let twice = sort_transactions(once, &spec);
        let amounts: Vec<f64> = twice.iter().map(|t| t.amount).collect();
        assert!(amounts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_requesting_new_key_resets_to_asc() {
        let spec = SortSpec::new("amount", SortDirection::Desc);
        let spec = spec.request("party");
        assert_eq!(spec.key, "party");
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn test_status_sorts_by_business_rank() {
        let sorted = sort_transactions(sample(), &SortSpec::new("status", SortDirection::Asc));
        let statuses: Vec<&str> = sorted.iter().map(|t| t.status.as_str()).collect();
        assert_eq!(statuses, vec!["Paid", "Partially Paid", "Unpaid", "N/A"]);
    }

    #[test]
    fn test_unknown_status_sorts_after_na() {
        let mut rows = sample();
        rows[0].status = "Custom".to_string();
        let sorted = sort_transactions(rows, &SortSpec::new("status", SortDirection::Asc));
        assert_eq!(sorted.last().unwrap().status, "Custom");
    }

    #[test]
    fn test_string_sort_is_case_normalized() {
        let sorted = sort_transactions(sample(), &SortSpec::new("party", SortDirection::Asc));
        let parties: Vec<&str> = sorted
            .iter()
            .map(|t| t.party.as_deref().unwrap_or(""))
            .collect();
        // Empty party first, then case-insensitive order
        assert_eq!(parties, vec!["", "acme traders", "Bolt Supply", "Zen Stores"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let sorted = sort_transactions(sample(), &SortSpec::new("type", SortDirection::Asc));
        // Two "Sale" rows keep their relative input order (a before c)
        let sale_ids: Vec<&str> = sorted
            .iter()
            .filter(|t| t.tx_type == "Sale")
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(sale_ids, vec!["a", "c"]);
    }

    #[test]
    fn test_sort_by_pass_through_field() {
        let raw = r#"[
            {"id": "x", "type": "Sale", "amount": 1, "date": "2024-01-01", "ref_no": 30},
            {"id": "y", "type": "Sale", "amount": 1, "date": "2024-01-01", "ref_no": 7}
        ]"#;
        let transactions: Vec<Transaction> = serde_json::from_str(raw).unwrap();
        let sorted = sort_transactions(
            classify_transactions(&transactions),
            &SortSpec::new("ref_no", SortDirection::Asc),
        );
        assert_eq!(sorted[0].id, "y");
    }

    #[test]
    fn test_paginate_basic() {
        let list: Vec<u32> = (1..=12).collect();
        let page = paginate(&list, 2, 10);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.start_index, 10);
        assert_eq!(page.end_index, 12);
    }

    #[test]
    fn test_paginate_clamps_stale_page() {
        let list: Vec<u32> = (1..=12).collect();
        assert_eq!(paginate(&list, 5, 10).page, 1);

        // List shrank to 3 items; the stale page resets to 1 with items
        let shrunk: Vec<u32> = (1..=3).collect();
        let page = paginate(&shrunk, 5, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2, 3]);
    }

    #[test]
    fn test_paginate_zero_page_clamps() {
        let list: Vec<u32> = (1..=5).collect();
        let page = paginate(&list, 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2]);
    }

    #[test]
    fn test_paginate_empty_list() {
        let page = paginate::<u32>(&[], 3, 10);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_paginate_floors_page_size() {
        let list: Vec<u32> = (1..=4).collect();
        let page = paginate(&list, 1, 0);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.total_pages, 4);
    }
}
