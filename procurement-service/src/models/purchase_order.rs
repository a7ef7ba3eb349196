//! Purchase order model.

use super::{InvalidTransition, ParseStatusError, SupplierStatus};
use crate::reporting::{classify, DateBucket, OrderClassification};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Purchase order lifecycle.
///
/// `Pending -> Partial -> Completed`, `Pending -> Completed`, and
/// `Pending | Partial -> Cancelled`. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Partial,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Partial,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Partial => "PARTIAL",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Still awaiting goods; only active orders can be late or due.
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Partial)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        *self == next
            || matches!(
                (self, next),
                (Pending, Partial) | (Pending, Completed) | (Partial, Completed)
                    | (Pending, Cancelled) | (Partial, Cancelled)
            )
    }

    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PARTIAL" => Ok(OrderStatus::Partial),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(ParseStatusError::new("order status", other)),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Purchase order joined with the supplier fields it is displayed with.
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseOrder {
    pub order_id: Uuid,
    pub number: String,
    pub issue_date: NaiveDate,
    pub supplier_id: Uuid,
    pub supplier_code: String,
    pub supplier_name: String,
    #[sqlx(try_from = "String")]
    pub supplier_status: SupplierStatus,
    pub items_count: i32,
    pub followup_date: NaiveDate,
    pub warehouse: String,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl PurchaseOrder {
    pub fn classify(&self, today: NaiveDate) -> OrderClassification {
        classify(self.followup_date, self.status, today)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSortField {
    IssueDate,
    FollowupDate,
    Number,
}

/// `ORDER BY` for order lists. The order number is always the last key so
/// pages are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderOrdering {
    pub field: OrderSortField,
    pub descending: bool,
}

impl Default for OrderOrdering {
    fn default() -> Self {
        Self {
            field: OrderSortField::FollowupDate,
            descending: false,
        }
    }
}

impl OrderOrdering {
    pub fn to_sql(&self) -> &'static str {
        match (self.field, self.descending) {
            (OrderSortField::FollowupDate, false) => "o.followup_date ASC, o.number ASC",
            (OrderSortField::FollowupDate, true) => "o.followup_date DESC, o.number ASC",
            (OrderSortField::IssueDate, false) => "o.issue_date ASC, o.number ASC",
            (OrderSortField::IssueDate, true) => "o.issue_date DESC, o.number ASC",
            (OrderSortField::Number, false) => "o.number ASC",
            (OrderSortField::Number, true) => "o.number DESC",
        }
    }
}

impl FromStr for OrderOrdering {
    type Err = ParseStatusError;

    /// Accepts `field` or `-field` for descending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let field = match name {
            "issue_date" => OrderSortField::IssueDate,
            "followup_date" => OrderSortField::FollowupDate,
            "number" => OrderSortField::Number,
            _ => return Err(ParseStatusError::new("ordering", s)),
        };
        Ok(Self { field, descending })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListOrdersFilter {
    pub status: Option<OrderStatus>,
    pub supplier_code: Option<String>,
    pub warehouse: Option<String>,
    pub bucket: Option<DateBucket>,
    pub search: Option<String>,
    pub ordering: OrderOrdering,
}

#[derive(Debug, Clone)]
pub struct CreatePurchaseOrder {
    pub number: String,
    pub issue_date: NaiveDate,
    pub supplier_code: String,
    pub items_count: i32,
    pub followup_date: NaiveDate,
    pub warehouse: String,
    pub status: OrderStatus,
}

/// Fields left `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdatePurchaseOrder {
    pub issue_date: Option<NaiveDate>,
    pub supplier_code: Option<String>,
    pub items_count: Option<i32>,
    pub followup_date: Option<NaiveDate>,
    pub warehouse: Option<String>,
    pub status: Option<OrderStatus>,
}
