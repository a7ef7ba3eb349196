use super::{non_empty, parse_param};
use crate::models::{CreateSupplier, ListSuppliersFilter, Supplier, SupplierStatus, UpdateSupplier};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct SupplierListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl SupplierListParams {
    /// Lists ACTIVE suppliers unless a status is asked for.
    pub fn filter(&self) -> Result<ListSuppliersFilter, AppError> {
        Ok(ListSuppliersFilter {
            status: Some(parse_param(&self.status)?.unwrap_or(SupplierStatus::Active)),
            search: non_empty(&self.search),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 20, message = "Supplier code must be 1-20 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "Supplier name must be 1-200 characters"))]
    pub name: String,
    pub status: Option<SupplierStatus>,
}

impl From<CreateSupplierRequest> for CreateSupplier {
    fn from(req: CreateSupplierRequest) -> Self {
        Self {
            code: req.code,
            name: req.name,
            status: req.status.unwrap_or(SupplierStatus::Active),
        }
    }
}

/// The code is the supplier's identity and cannot be changed.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 200, message = "Supplier name must be 1-200 characters"))]
    pub name: Option<String>,
    pub status: Option<SupplierStatus>,
}

impl From<UpdateSupplierRequest> for UpdateSupplier {
    fn from(req: UpdateSupplierRequest) -> Self {
        Self {
            name: req.name,
            status: req.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupplierResponse {
    pub supplier_id: Uuid,
    pub code: String,
    pub name: String,
    pub status: SupplierStatus,
    pub created_utc: String,
    pub updated_utc: String,
}

impl From<Supplier> for SupplierResponse {
    fn from(supplier: Supplier) -> Self {
        Self {
            supplier_id: supplier.supplier_id,
            code: supplier.code,
            name: supplier.name,
            status: supplier.status,
            created_utc: supplier.created_utc.to_rfc3339(),
            updated_utc: supplier.updated_utc.to_rfc3339(),
        }
    }
}
