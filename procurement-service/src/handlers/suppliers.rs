use crate::dtos::{
    CreateSupplierRequest, Page, PageRequest, SupplierListParams, SupplierResponse,
    UpdateSupplierRequest,
};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::models::{CreateSupplier, UpdateSupplier};
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

fn supplier_not_found(code: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Supplier '{}' not found", code))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SupplierListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageRequest::resolve(params.page, params.page_size, &state.config.pagination)?;
    let filter = params.filter()?;

    let (suppliers, total) = state
        .db
        .list_suppliers(&filter, page.limit(), page.offset())
        .await?;

    let results = suppliers.into_iter().map(SupplierResponse::from).collect();

    Ok(Json(Page::new(results, total, page)))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSupplierRequest>,
) -> Result<impl IntoResponse, AppError> {
    let supplier = state.db.create_supplier(&CreateSupplier::from(req)).await?;
    Ok((StatusCode::CREATED, Json(SupplierResponse::from(supplier))))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let supplier = state
        .db
        .get_supplier(&code)
        .await?
        .ok_or_else(|| supplier_not_found(&code))?;
    Ok(Json(SupplierResponse::from(supplier)))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<UpdateSupplierRequest>,
) -> Result<impl IntoResponse, AppError> {
    let supplier = state
        .db
        .update_supplier(&code, &UpdateSupplier::from(req))
        .await?
        .ok_or_else(|| supplier_not_found(&code))?;
    Ok(Json(SupplierResponse::from(supplier)))
}

/// Only suppliers nothing references can be deleted; retire the rest by
/// setting their status to `INACTIVE`.
pub async fn delete_supplier(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let (orders, receipts) = state
        .db
        .supplier_dependents(&code)
        .await?
        .ok_or_else(|| supplier_not_found(&code))?;

    if orders > 0 || receipts > 0 {
        tracing::info!(
            code = %code,
            orders = orders,
            receipts = receipts,
            "Refusing to delete referenced supplier"
        );
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Supplier '{}' is referenced by {} purchase order(s) and {} delivery receipt(s); set its status to INACTIVE instead",
            code,
            orders,
            receipts
        )));
    }

    if !state.db.delete_supplier(&code).await? {
        return Err(supplier_not_found(&code));
    }
    Ok(StatusCode::NO_CONTENT)
}
