//! Delivery receipt (cargo manifest) model.

use super::{InvalidTransition, ParseStatusError, SupplierStatus};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptStatus {
    Pending,
    Completed,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Pending => "PENDING",
            ReceiptStatus::Completed => "COMPLETED",
        }
    }

    pub fn transition_to(self, next: ReceiptStatus) -> Result<ReceiptStatus, InvalidTransition> {
        match (self, next) {
            (ReceiptStatus::Completed, ReceiptStatus::Pending) => Err(InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            }),
            _ => Ok(next),
        }
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceiptStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReceiptStatus::Pending),
            "COMPLETED" => Ok(ReceiptStatus::Completed),
            other => Err(ParseStatusError::new("receipt status", other)),
        }
    }
}

impl TryFrom<String> for ReceiptStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Delivery receipt joined with its supplier and, when linked, the order number.
#[derive(Debug, Clone, FromRow)]
pub struct DeliveryReceipt {
    pub receipt_id: Uuid,
    pub cargo_number: String,
    pub manifest_date: NaiveDate,
    pub supplier_id: Uuid,
    pub supplier_code: String,
    pub supplier_name: String,
    #[sqlx(try_from = "String")]
    pub supplier_status: SupplierStatus,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub manifest_time: Option<NaiveTime>,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<NaiveTime>,
    #[sqlx(try_from = "String")]
    pub status: ReceiptStatus,
    pub purchase_order_id: Option<Uuid>,
    pub purchase_order_number: Option<String>,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryOrdering {
    /// Newest manifests first.
    #[default]
    ManifestDateDesc,
    ManifestDateAsc,
}

impl DeliveryOrdering {
    pub fn to_sql(&self) -> &'static str {
        match self {
            DeliveryOrdering::ManifestDateDesc => "d.manifest_date DESC, d.cargo_number ASC",
            DeliveryOrdering::ManifestDateAsc => "d.manifest_date ASC, d.cargo_number ASC",
        }
    }
}

impl FromStr for DeliveryOrdering {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-manifest_date" => Ok(DeliveryOrdering::ManifestDateDesc),
            "manifest_date" => Ok(DeliveryOrdering::ManifestDateAsc),
            other => Err(ParseStatusError::new("ordering", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListDeliveriesFilter {
    pub status: Option<ReceiptStatus>,
    pub supplier_code: Option<String>,
    pub purchase_order_id: Option<Uuid>,
    pub manifest_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub ordering: DeliveryOrdering,
}

#[derive(Debug, Clone)]
pub struct CreateDeliveryReceipt {
    pub cargo_number: String,
    pub manifest_date: NaiveDate,
    pub supplier_code: String,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub manifest_time: Option<NaiveTime>,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<NaiveTime>,
    pub status: ReceiptStatus,
    pub purchase_order_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDeliveryReceipt {
    pub manifest_time: Option<NaiveTime>,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<NaiveTime>,
    pub status: Option<ReceiptStatus>,
}
