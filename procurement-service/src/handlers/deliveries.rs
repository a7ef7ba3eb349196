use crate::dtos::{
    CreateDeliveryRequest, DeliveryListParams, DeliveryResponse, Page, PageRequest,
    UpdateDeliveryRequest,
};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::models::CreateDeliveryReceipt;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;
use uuid::Uuid;

fn receipt_not_found(receipt_id: Uuid) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Delivery receipt {} not found", receipt_id))
}

pub async fn list_deliveries(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DeliveryListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageRequest::resolve(params.page, params.page_size, &state.config.pagination)?;
    let filter = params.filter()?;

    let (receipts, total) = state
        .db
        .list_deliveries(&filter, page.limit(), page.offset())
        .await?;

    let results = receipts.into_iter().map(DeliveryResponse::from).collect();

    Ok(Json(Page::new(results, total, page)))
}

/// A linked purchase order must exist and belong to the receipt's supplier.
pub async fn create_delivery(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateDeliveryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = CreateDeliveryReceipt::from(req);

    if let Some(order_id) = input.purchase_order_id {
        let order = state.db.get_order(order_id).await?.ok_or_else(|| {
            AppError::invalid_field(
                "purchase_order_id",
                "unknown_order",
                format!("purchase order {} does not exist", order_id),
            )
        })?;
        if order.supplier_code != input.supplier_code {
            return Err(AppError::invalid_field(
                "purchase_order_id",
                "supplier_mismatch",
                format!(
                    "purchase order {} belongs to supplier '{}', not '{}'",
                    order.number, order.supplier_code, input.supplier_code
                ),
            ));
        }
    }

    let receipt = state.db.create_delivery(&input).await?;
    Ok((StatusCode::CREATED, Json(DeliveryResponse::from(receipt))))
}

pub async fn get_delivery(
    State(state): State<AppState>,
    ApiPath(receipt_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = state
        .db
        .get_delivery(receipt_id)
        .await?
        .ok_or_else(|| receipt_not_found(receipt_id))?;
    Ok(Json(DeliveryResponse::from(receipt)))
}

pub async fn update_delivery(
    State(state): State<AppState>,
    ApiPath(receipt_id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateDeliveryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let current = state
        .db
        .get_delivery(receipt_id)
        .await?
        .ok_or_else(|| receipt_not_found(receipt_id))?;

    let patch = req.into_model(current.status)?;

    let receipt = state
        .db
        .update_delivery(receipt_id, current.status, &patch)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(anyhow::anyhow!(
                "Delivery receipt {} was modified concurrently",
                receipt_id
            ))
        })?;

    Ok(Json(DeliveryResponse::from(receipt)))
}
