//! Time control system for filtering transactions by date range

use chrono::{Datelike, NaiveDate, Utc};
use tallyweb_config::TimeRange;

use crate::transaction::Transaction;

/// Active time context for report and list filtering
#[derive(Debug, Clone, PartialEq)]
pub struct TimeContext {
    /// Current time range
    pub range: TimeRange,
    /// Custom start date (when range is Custom)
    pub custom_start: Option<NaiveDate>,
    /// Custom end date (when range is Custom)
    pub custom_end: Option<NaiveDate>,
}

impl Default for TimeContext {
    fn default() -> Self {
        Self {
            range: TimeRange::All,
            custom_start: None,
            custom_end: None,
        }
    }
}

impl TimeContext {
    /// Create a new time context
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            custom_start: None,
            custom_end: None,
        }
    }

    /// Create with custom date range
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            range: TimeRange::Custom,
            custom_start: Some(start),
            custom_end: Some(end),
        }
    }

    /// Get the effective start date based on range
    pub fn start_date(&self) -> Option<NaiveDate> {
        let today = Utc::now().date_naive();
        match self.range {
            TimeRange::Month => Some(today.with_day(1).unwrap_or(today)),
            TimeRange::Quarter => {
                let quarter_start = ((today.month0() / 3) * 3) + 1;
                NaiveDate::from_ymd_opt(today.year(), quarter_start, 1)
            }
            TimeRange::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            TimeRange::All => None,
            TimeRange::Custom => self.custom_start,
        }
    }

    /// Get the effective end date based on range
    pub fn end_date(&self) -> Option<NaiveDate> {
        let today = Utc::now().date_naive();
        match self.range {
            TimeRange::Month => {
                let next_month = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
                };
                next_month.and_then(|d| d.pred_opt()).or(Some(today))
            }
            TimeRange::Quarter => {
                let quarter_end = ((today.month0() / 3) + 1) * 3;
                if quarter_end == 12 {
                    NaiveDate::from_ymd_opt(today.year(), 12, 31)
                } else {
                    NaiveDate::from_ymd_opt(today.year(), quarter_end + 1, 1)
                        .and_then(|d| d.pred_opt())
                        .or(Some(today))
                }
            }
            TimeRange::Year => NaiveDate::from_ymd_opt(today.year(), 12, 31),
            TimeRange::All => None,
            TimeRange::Custom => self.custom_end,
        }
    }

    /// Check if a date is within the current time context
    pub fn contains(&self, date: &NaiveDate) -> bool {
        let start = self.start_date();
        let end = self.end_date();

        match (start, end) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Get a human-readable description of the time range
    pub fn description(&self) -> String {
        match self.range {
            TimeRange::Month => "Current Month".to_string(),
            TimeRange::Quarter => "Current Quarter".to_string(),
            TimeRange::Year => "Current Year".to_string(),
            TimeRange::All => "All Time".to_string(),
            TimeRange::Custom => {
                if let (Some(start), Some(end)) = (self.custom_start, self.custom_end) {
                    format!("{} to {}", start, end)
                } else {
                    "Custom Range".to_string()
                }
            }
        }
    }
}

/// Time filtering trait
pub trait TimeFilter {
    /// Filter items by the current time context
    fn filter_by_time(&self, context: &TimeContext) -> bool;
}

impl TimeFilter for Transaction {
    fn filter_by_time(&self, context: &TimeContext) -> bool {
        if let Some(date) = self.date_naive() {
            context.contains(&date)
        } else {
            // If we can't parse the date, include it
            true
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_range_is_unbounded() {
        let ctx = TimeContext::new(TimeRange::All);
        assert!(ctx.start_date().is_none());
        assert!(ctx.end_date().is_none());
        assert!(ctx.contains(&NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()));
    }

    #[test]
    fn test_month_range_brackets_today() {
        let ctx = TimeContext::new(TimeRange::Month);
        let today = Utc::now().date_naive();
        assert!(ctx.start_date().unwrap() <= today);
        assert!(ctx.end_date().unwrap() >= today);
    }

    #[test]
    fn test_year_range_ends_december() {
        let ctx = TimeContext::new(TimeRange::Year);
        let end = ctx.end_date().unwrap();
        assert_eq!(end.month(), 12);
        assert_eq!(end.day(), 31);
    }

    #[test]
    fn test_custom_contains() {
        let ctx = TimeContext::custom(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        );
        assert!(ctx.contains(&NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
        assert!(!ctx.contains(&NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
        assert!(!ctx.contains(&NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn test_unparseable_date_is_included() {
        let tx = Transaction {
            id: "t".to_string(),
            tx_type: "Sale".to_string(),
            amount: 10.0,
            paid_amount: None,
            balance_due: None,
            date: "not-a-date".to_string(),
            payment_type: None,
            party: None,
            description: None,
            status: None,
            extra: serde_json::Map::new(),
        };
        let ctx = TimeContext::custom(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        assert!(tx.filter_by_time(&ctx));
    }

    #[test]
    fn test_description() {
        assert_eq!(TimeContext::new(TimeRange::All).description(), "All Time");
        let ctx = TimeContext::custom(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        assert!(ctx.description().contains("2024-01-01"));
    }
}
