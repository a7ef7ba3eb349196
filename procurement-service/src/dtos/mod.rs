pub mod deliveries;
pub mod orders;
pub mod pagination;
pub mod stats;
pub mod suppliers;

pub use deliveries::{
    CreateDeliveryRequest, DeliveryListParams, DeliveryResponse, UpdateDeliveryRequest,
};
pub use orders::{
    CreateOrderRequest, OrderListParams, OrderResponse, SupplierSummary, UpdateOrderRequest,
};
pub use pagination::{Page, PageRequest};
pub use stats::{StatsParams, StatsResponse};
pub use suppliers::{
    CreateSupplierRequest, SupplierListParams, SupplierResponse, UpdateSupplierRequest,
};

use crate::models::ParseStatusError;
use service_core::error::AppError;
use std::str::FromStr;

/// Blank query values (`?status=`) count as absent.
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_param<T>(value: &Option<String>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = ParseStatusError>,
{
    non_empty(value)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e)))
        })
        .transpose()
}
