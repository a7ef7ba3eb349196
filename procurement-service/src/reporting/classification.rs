//! Due-date classification of purchase orders against a reference date.
//!
//! Nothing here reads the clock: callers pass `today`, which keeps the result
//! a pure function of the stored record and the date being reported on.

use crate::models::{OrderStatus, ParseStatusError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Read-time view of an order relative to `today`. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderClassification {
    pub is_overdue: bool,
    pub delay_days: i64,
    pub is_due_today: bool,
    pub is_due_tomorrow: bool,
}

/// Status wins over dates: a completed or cancelled order is never overdue.
pub fn classify(
    followup_date: NaiveDate,
    status: OrderStatus,
    today: NaiveDate,
) -> OrderClassification {
    let is_overdue = status.is_active() && followup_date < today;
    let delay_days = if is_overdue {
        (today - followup_date).num_days()
    } else {
        0
    };

    OrderClassification {
        is_overdue,
        delay_days,
        is_due_today: followup_date == today,
        is_due_tomorrow: today.succ_opt() == Some(followup_date),
    }
}

/// Named due-date filter on order lists. Every bucket implies an active status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
    Today,
    Tomorrow,
    Delayed,
}

/// Inclusive bounds on `followup_date`; `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowupRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateBucket::Today => "today",
            DateBucket::Tomorrow => "tomorrow",
            DateBucket::Delayed => "delayed",
        }
    }

    pub fn matches(&self, followup_date: NaiveDate, status: OrderStatus, today: NaiveDate) -> bool {
        let c = classify(followup_date, status, today);
        status.is_active()
            && match self {
                DateBucket::Today => c.is_due_today,
                DateBucket::Tomorrow => c.is_due_tomorrow,
                DateBucket::Delayed => c.is_overdue,
            }
    }

    /// The same predicate as [`DateBucket::matches`] expressed as date bounds,
    /// for pushing into SQL. `None` when no date can match (calendar edges).
    pub fn followup_range(&self, today: NaiveDate) -> Option<FollowupRange> {
        match self {
            DateBucket::Today => Some(FollowupRange {
                from: Some(today),
                to: Some(today),
            }),
            DateBucket::Tomorrow => today.succ_opt().map(|tomorrow| FollowupRange {
                from: Some(tomorrow),
                to: Some(tomorrow),
            }),
            DateBucket::Delayed => today.pred_opt().map(|yesterday| FollowupRange {
                from: None,
                to: Some(yesterday),
            }),
        }
    }
}

impl FromStr for DateBucket {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateBucket::Today),
            "tomorrow" => Ok(DateBucket::Tomorrow),
            "delayed" => Ok(DateBucket::Delayed),
            other => Err(ParseStatusError::new("date bucket", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today() - Days::new(n)
    }

    fn days_ahead(n: u64) -> NaiveDate {
        today() + Days::new(n)
    }

    #[test]
    fn test_due_today_pending_is_not_overdue() {
        let c = classify(today(), OrderStatus::Pending, today());
        assert!(c.is_due_today);
        assert!(!c.is_overdue);
        assert!(!c.is_due_tomorrow);
        assert_eq!(c.delay_days, 0);
    }

    #[test]
    fn test_partial_three_days_late() {
        let c = classify(days_ago(3), OrderStatus::Partial, today());
        assert!(c.is_overdue);
        assert_eq!(c.delay_days, 3);
        assert!(!c.is_due_today);
    }

    #[test]
    fn test_completed_three_days_late_is_not_overdue() {
        let c = classify(days_ago(3), OrderStatus::Completed, today());
        assert!(!c.is_overdue);
        assert_eq!(c.delay_days, 0);
    }

    #[test]
    fn test_closed_orders_are_never_overdue() {
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            for offset in 0..400 {
                let c = classify(days_ago(offset), status, today());
                assert!(!c.is_overdue, "{status} {offset} days ago");
                assert_eq!(c.delay_days, 0);
            }
        }
    }

    #[test]
    fn test_active_overdue_iff_followup_before_today() {
        for status in [OrderStatus::Pending, OrderStatus::Partial] {
            for offset in -30i64..30 {
                let followup = today()
                    .checked_add_signed(chrono::Duration::days(offset))
                    .unwrap();
                let c = classify(followup, status, today());
                assert_eq!(c.is_overdue, followup < today());
                let expected_delay = if c.is_overdue { -offset } else { 0 };
                assert_eq!(c.delay_days, expected_delay);
            }
        }
    }

    #[test]
    fn test_due_tomorrow_ignores_status() {
        let c = classify(days_ahead(1), OrderStatus::Cancelled, today());
        assert!(c.is_due_tomorrow);
        assert!(!c.is_due_today);
    }

    #[test]
    fn test_tomorrow_crosses_month_end() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let c = classify(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            OrderStatus::Pending,
            today,
        );
        assert!(c.is_due_tomorrow);
    }

    #[test]
    fn test_buckets_require_active_status() {
        assert!(DateBucket::Today.matches(today(), OrderStatus::Pending, today()));
        assert!(!DateBucket::Today.matches(today(), OrderStatus::Completed, today()));
        assert!(!DateBucket::Tomorrow.matches(days_ahead(1), OrderStatus::Cancelled, today()));
        assert!(DateBucket::Delayed.matches(days_ago(1), OrderStatus::Partial, today()));
        assert!(!DateBucket::Delayed.matches(today(), OrderStatus::Partial, today()));
    }

    #[test]
    fn test_range_agrees_with_matches() {
        for bucket in [DateBucket::Today, DateBucket::Tomorrow, DateBucket::Delayed] {
            let range = bucket.followup_range(today()).unwrap();
            for offset in -10i64..10 {
                let followup = today()
                    .checked_add_signed(chrono::Duration::days(offset))
                    .unwrap();
                let in_range = range.from.map_or(true, |from| followup >= from)
                    && range.to.map_or(true, |to| followup <= to);
                assert_eq!(
                    in_range,
                    bucket.matches(followup, OrderStatus::Pending, today()),
                    "{} at offset {offset}",
                    bucket.as_str()
                );
            }
        }
    }

    #[test]
    fn test_range_at_calendar_edge_is_empty() {
        assert_eq!(DateBucket::Tomorrow.followup_range(NaiveDate::MAX), None);
        assert_eq!(DateBucket::Delayed.followup_range(NaiveDate::MIN), None);
    }

    #[test]
    fn test_bucket_parse() {
        assert_eq!("delayed".parse::<DateBucket>(), Ok(DateBucket::Delayed));
        assert!("overdue".parse::<DateBucket>().is_err());
    }
}
