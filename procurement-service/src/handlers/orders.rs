use crate::dtos::{
    CreateOrderRequest, OrderListParams, OrderResponse, Page, PageRequest, UpdateOrderRequest,
};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

fn order_not_found(order_id: Uuid) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Purchase order {} not found", order_id))
}

pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<OrderListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageRequest::resolve(params.page, params.page_size, &state.config.pagination)?;
    let filter = params.filter()?;
    let today = state.clock.today();

    let (orders, total) = state
        .db
        .list_orders(&filter, today, page.limit(), page.offset())
        .await?;

    let results = orders
        .into_iter()
        .map(|order| OrderResponse::from_order(order, today))
        .collect();

    Ok(Json(Page::new(results, total, page)))
}

pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = req.into_model()?;
    let order = state.db.create_order(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::from_order(order, state.clock.today())),
    ))
}

pub async fn get_order(
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = state
        .db
        .get_order(order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;

    Ok(Json(OrderResponse::from_order(order, state.clock.today())))
}

/// Partial update. The status change and the date rule are checked against
/// the stored order; the write only applies if that status is still current.
pub async fn update_order(
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let current = state
        .db
        .get_order(order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;

    // Linked receipts must stay with the order's supplier.
    let moves_supplier = req
        .supplier_code
        .as_deref()
        .is_some_and(|code| code != current.supplier_code);
    if moves_supplier && state.db.linked_receipts(order_id).await? > 0 {
        return Err(AppError::invalid_field(
            "supplier_code",
            "has_receipts",
            "cannot change the supplier of an order with linked delivery receipts",
        ));
    }

    let patch = req.into_model(&current)?;

    let order = state
        .db
        .update_order(order_id, current.status, &patch)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(anyhow::anyhow!(
                "Purchase order {} was modified concurrently",
                order_id
            ))
        })?;

    Ok(Json(OrderResponse::from_order(order, state.clock.today())))
}

pub async fn delete_order(
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.delete_order(order_id).await? {
        return Err(order_not_found(order_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
