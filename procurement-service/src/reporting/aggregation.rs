//! Dashboard counts.

use super::classify;
use crate::models::{OrderStatus, ReceiptStatus};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// The two columns of an order the dashboard needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct OrderSchedule {
    pub followup_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
}

/// The two columns of a receipt the dashboard needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct ReceiptSnapshot {
    pub manifest_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: ReceiptStatus,
}

/// Bucket counts for one reference date.
///
/// `due_today`, `overdue` and `due_tomorrow` are disjoint, so their sum never
/// exceeds `active_total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub due_today: u64,
    pub overdue: u64,
    pub due_tomorrow: u64,
    pub completed_today: u64,
    pub active_total: u64,
}

/// One pass over each input. Inactive orders are skipped here as well, so
/// callers may pass unfiltered rows.
pub fn aggregate<'a, O, R>(orders: O, receipts: R, today: NaiveDate) -> DashboardCounts
where
    O: IntoIterator<Item = &'a OrderSchedule>,
    R: IntoIterator<Item = &'a ReceiptSnapshot>,
{
    let mut counts = DashboardCounts::default();

    for order in orders {
        if !order.status.is_active() {
            continue;
        }
        counts.active_total += 1;

        let c = classify(order.followup_date, order.status, today);
        if c.is_due_today {
            counts.due_today += 1;
        } else if c.is_overdue {
            counts.overdue += 1;
        } else if c.is_due_tomorrow {
            counts.due_tomorrow += 1;
        }
    }

    counts.completed_today = receipts
        .into_iter()
        .filter(|r| r.status == ReceiptStatus::Completed && r.manifest_date == today)
        .count() as u64;

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::DateBucket;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn order(followup_date: NaiveDate, status: OrderStatus) -> OrderSchedule {
        OrderSchedule {
            followup_date,
            status,
        }
    }

    fn receipt(manifest_date: NaiveDate, status: ReceiptStatus) -> ReceiptSnapshot {
        ReceiptSnapshot {
            manifest_date,
            status,
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(aggregate(&[], &[], today()), DashboardCounts::default());
    }

    #[test]
    fn test_scenarios() {
        let orders = [
            order(today(), OrderStatus::Pending),
            order(today() - Days::new(3), OrderStatus::Partial),
            order(today() - Days::new(3), OrderStatus::Completed),
            order(today() + Days::new(1), OrderStatus::Pending),
            order(today() + Days::new(1), OrderStatus::Cancelled),
            order(today() + Days::new(9), OrderStatus::Partial),
        ];
        let receipts = [
            receipt(today(), ReceiptStatus::Completed),
            receipt(today(), ReceiptStatus::Pending),
            receipt(today() - Days::new(1), ReceiptStatus::Completed),
        ];

        let counts = aggregate(&orders, &receipts, today());

        assert_eq!(
            counts,
            DashboardCounts {
                due_today: 1,
                overdue: 1,
                due_tomorrow: 1,
                completed_today: 1,
                active_total: 4,
            }
        );
    }

    #[test]
    fn test_bucket_sum_bounded_by_active_total() {
        let statuses = OrderStatus::ALL;
        let orders: Vec<_> = (0..120u64)
            .map(|i| {
                let followup = today() - Days::new(60) + Days::new(i);
                order(followup, statuses[(i % 4) as usize])
            })
            .collect();

        let counts = aggregate(&orders, &[], today());

        assert!(counts.due_today + counts.overdue + counts.due_tomorrow <= counts.active_total);
        let active = orders.iter().filter(|o| o.status.is_active()).count() as u64;
        assert_eq!(counts.active_total, active);
    }

    #[test]
    fn test_counts_agree_with_buckets() {
        let orders: Vec<_> = (0..20u64)
            .flat_map(|i| {
                let followup = today() - Days::new(10) + Days::new(i);
                OrderStatus::ALL.map(|s| order(followup, s))
            })
            .collect();

        let counts = aggregate(&orders, &[], today());
        let count_bucket = |bucket: DateBucket| {
            orders
                .iter()
                .filter(|o| bucket.matches(o.followup_date, o.status, today()))
                .count() as u64
        };

        assert_eq!(counts.due_today, count_bucket(DateBucket::Today));
        assert_eq!(counts.due_tomorrow, count_bucket(DateBucket::Tomorrow));
        assert_eq!(counts.overdue, count_bucket(DateBucket::Delayed));
    }

    #[test]
    fn test_all_buckets_covered_sum_equals_active() {
        let orders = [
            order(today(), OrderStatus::Pending),
            order(today() - Days::new(1), OrderStatus::Pending),
            order(today() + Days::new(1), OrderStatus::Partial),
        ];
        let counts = aggregate(&orders, &[], today());
        assert_eq!(
            counts.due_today + counts.overdue + counts.due_tomorrow,
            counts.active_total
        );
    }
}
