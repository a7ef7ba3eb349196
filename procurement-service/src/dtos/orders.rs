use super::{non_empty, parse_param};
use crate::models::{
    CreatePurchaseOrder, ListOrdersFilter, OrderStatus, PurchaseOrder, SupplierStatus,
    UpdatePurchaseOrder,
};
use crate::reporting::{DateBucket, OrderClassification};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    /// Supplier code.
    pub supplier: Option<String>,
    pub warehouse: Option<String>,
    /// `today`, `tomorrow` or `delayed`.
    pub bucket: Option<String>,
    pub search: Option<String>,
    /// `issue_date`, `followup_date` or `number`, `-` prefix for descending.
    pub ordering: Option<String>,
}

impl OrderListParams {
    pub fn filter(&self) -> Result<ListOrdersFilter, AppError> {
        Ok(ListOrdersFilter {
            status: parse_param(&self.status)?,
            supplier_code: non_empty(&self.supplier),
            warehouse: non_empty(&self.warehouse),
            bucket: parse_param::<DateBucket>(&self.bucket)?,
            search: non_empty(&self.search),
            ordering: parse_param(&self.ordering)?.unwrap_or_default(),
        })
    }
}

/// `followup_date` may not precede `issue_date`.
pub(crate) fn check_followup(issue_date: NaiveDate, followup_date: NaiveDate) -> Result<(), AppError> {
    if followup_date < issue_date {
        return Err(AppError::invalid_field(
            "followup_date",
            "before_issue_date",
            format!(
                "followup_date {} is before issue_date {}",
                followup_date, issue_date
            ),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 20, message = "Order number must be 1-20 characters"))]
    pub number: String,
    pub issue_date: NaiveDate,
    #[validate(length(min = 1, max = 20, message = "Supplier code must be 1-20 characters"))]
    pub supplier_code: String,
    #[validate(range(min = 0, message = "Items count cannot be negative"))]
    pub items_count: i32,
    pub followup_date: NaiveDate,
    #[validate(length(min = 1, max = 10, message = "Warehouse must be 1-10 characters"))]
    pub warehouse: String,
    pub status: Option<OrderStatus>,
}

impl CreateOrderRequest {
    pub fn into_model(self) -> Result<CreatePurchaseOrder, AppError> {
        check_followup(self.issue_date, self.followup_date)?;
        Ok(CreatePurchaseOrder {
            number: self.number,
            issue_date: self.issue_date,
            supplier_code: self.supplier_code,
            items_count: self.items_count,
            followup_date: self.followup_date,
            warehouse: self.warehouse,
            status: self.status.unwrap_or(OrderStatus::Pending),
        })
    }
}

/// The order number is fixed once created.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderRequest {
    pub issue_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 20, message = "Supplier code must be 1-20 characters"))]
    pub supplier_code: Option<String>,
    #[validate(range(min = 0, message = "Items count cannot be negative"))]
    pub items_count: Option<i32>,
    pub followup_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 10, message = "Warehouse must be 1-10 characters"))]
    pub warehouse: Option<String>,
    pub status: Option<OrderStatus>,
}

impl UpdateOrderRequest {
    /// Check the patch against the stored order: the date rule on the merged
    /// dates and the status lifecycle.
    pub fn into_model(self, current: &PurchaseOrder) -> Result<UpdatePurchaseOrder, AppError> {
        check_followup(
            self.issue_date.unwrap_or(current.issue_date),
            self.followup_date.unwrap_or(current.followup_date),
        )?;

        if let Some(next) = self.status {
            current.status.transition_to(next).map_err(|e| {
                AppError::invalid_field("status", "invalid_transition", e.to_string())
            })?;
        }

        Ok(UpdatePurchaseOrder {
            issue_date: self.issue_date,
            supplier_code: self.supplier_code,
            items_count: self.items_count,
            followup_date: self.followup_date,
            warehouse: self.warehouse,
            status: self.status,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SupplierSummary {
    pub code: String,
    pub name: String,
    pub status: SupplierStatus,
}

/// Order as returned by the API, classified against the request's reference date.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub number: String,
    pub issue_date: NaiveDate,
    pub supplier: SupplierSummary,
    pub items_count: i32,
    pub followup_date: NaiveDate,
    pub warehouse: String,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub classification: OrderClassification,
    pub created_utc: String,
    pub updated_utc: String,
}

impl OrderResponse {
    pub fn from_order(order: PurchaseOrder, today: NaiveDate) -> Self {
        let classification = order.classify(today);
        Self {
            order_id: order.order_id,
            number: order.number,
            issue_date: order.issue_date,
            supplier: SupplierSummary {
                code: order.supplier_code,
                name: order.supplier_name,
                status: order.supplier_status,
            },
            items_count: order.items_count,
            followup_date: order.followup_date,
            warehouse: order.warehouse,
            status: order.status,
            classification,
            created_utc: order.created_utc.to_rfc3339(),
            updated_utc: order.updated_utc.to_rfc3339(),
        }
    }
}
