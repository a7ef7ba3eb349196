//! Domain models for procurement-service.

mod delivery_receipt;
mod purchase_order;
mod supplier;

pub use delivery_receipt::{
    CreateDeliveryReceipt, DeliveryOrdering, DeliveryReceipt, ListDeliveriesFilter, ReceiptStatus,
    UpdateDeliveryReceipt,
};
pub use purchase_order::{
    CreatePurchaseOrder, ListOrdersFilter, OrderOrdering, OrderSortField, OrderStatus,
    PurchaseOrder, UpdatePurchaseOrder,
};
pub use supplier::{CreateSupplier, ListSuppliersFilter, Supplier, SupplierStatus, UpdateSupplier};

use thiserror::Error;

/// A status column or query value that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseStatusError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A status change the lifecycle does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub to: &'static str,
}
