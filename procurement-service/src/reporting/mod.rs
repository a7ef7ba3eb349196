//! Order classification and dashboard aggregation.

mod aggregation;
mod classification;

pub use aggregation::{aggregate, DashboardCounts, OrderSchedule, ReceiptSnapshot};
pub use classification::{classify, DateBucket, FollowupRange, OrderClassification};
