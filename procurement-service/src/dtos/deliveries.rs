use super::orders::SupplierSummary;
use super::{non_empty, parse_param};
use crate::models::{
    CreateDeliveryReceipt, DeliveryReceipt, ListDeliveriesFilter, ReceiptStatus,
    UpdateDeliveryReceipt,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct DeliveryListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    /// Supplier code.
    pub supplier: Option<String>,
    pub purchase_order_id: Option<Uuid>,
    pub manifest_date: Option<NaiveDate>,
    pub search: Option<String>,
    /// `manifest_date` or `-manifest_date`.
    pub ordering: Option<String>,
}

impl DeliveryListParams {
    pub fn filter(&self) -> Result<ListDeliveriesFilter, AppError> {
        Ok(ListDeliveriesFilter {
            status: parse_param(&self.status)?,
            supplier_code: non_empty(&self.supplier),
            purchase_order_id: self.purchase_order_id,
            manifest_date: self.manifest_date,
            search: non_empty(&self.search),
            ordering: parse_param(&self.ordering)?.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeliveryRequest {
    #[validate(length(min = 1, max = 20, message = "Cargo number must be 1-20 characters"))]
    pub cargo_number: String,
    pub manifest_date: NaiveDate,
    #[validate(length(min = 1, max = 20, message = "Supplier code must be 1-20 characters"))]
    pub supplier_code: String,
    #[validate(length(min = 1, max = 20, message = "Invoice number must be 1-20 characters"))]
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub manifest_time: Option<NaiveTime>,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<NaiveTime>,
    pub status: Option<ReceiptStatus>,
    pub purchase_order_id: Option<Uuid>,
}

impl From<CreateDeliveryRequest> for CreateDeliveryReceipt {
    fn from(req: CreateDeliveryRequest) -> Self {
        Self {
            cargo_number: req.cargo_number,
            manifest_date: req.manifest_date,
            supplier_code: req.supplier_code,
            invoice_number: req.invoice_number,
            issue_date: req.issue_date,
            manifest_time: req.manifest_time,
            entry_time: req.entry_time,
            exit_time: req.exit_time,
            status: req.status.unwrap_or(ReceiptStatus::Pending),
            purchase_order_id: req.purchase_order_id,
        }
    }
}

/// Receipts only record arrival progress after creation.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateDeliveryRequest {
    pub manifest_time: Option<NaiveTime>,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<NaiveTime>,
    pub status: Option<ReceiptStatus>,
}

impl UpdateDeliveryRequest {
    pub fn into_model(self, current: ReceiptStatus) -> Result<UpdateDeliveryReceipt, AppError> {
        if let Some(next) = self.status {
            current.transition_to(next).map_err(|e| {
                AppError::invalid_field("status", "invalid_transition", e.to_string())
            })?;
        }
        Ok(UpdateDeliveryReceipt {
            manifest_time: self.manifest_time,
            entry_time: self.entry_time,
            exit_time: self.exit_time,
            status: self.status,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub receipt_id: Uuid,
    pub cargo_number: String,
    pub manifest_date: NaiveDate,
    pub supplier: SupplierSummary,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub manifest_time: Option<NaiveTime>,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<NaiveTime>,
    pub status: ReceiptStatus,
    pub purchase_order_id: Option<Uuid>,
    pub purchase_order_number: Option<String>,
    pub created_utc: String,
}

impl From<DeliveryReceipt> for DeliveryResponse {
    fn from(receipt: DeliveryReceipt) -> Self {
        Self {
            receipt_id: receipt.receipt_id,
            cargo_number: receipt.cargo_number,
            manifest_date: receipt.manifest_date,
            supplier: SupplierSummary {
                code: receipt.supplier_code,
                name: receipt.supplier_name,
                status: receipt.supplier_status,
            },
            invoice_number: receipt.invoice_number,
            issue_date: receipt.issue_date,
            manifest_time: receipt.manifest_time,
            entry_time: receipt.entry_time,
            exit_time: receipt.exit_time,
            status: receipt.status,
            purchase_order_id: receipt.purchase_order_id,
            purchase_order_number: receipt.purchase_order_number,
            created_utc: receipt.created_utc.to_rfc3339(),
        }
    }
}
