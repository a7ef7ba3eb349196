use crate::dtos::{StatsParams, StatsResponse};
use crate::extract::ApiQuery;
use crate::reporting::aggregate;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;

/// Dashboard counts for `?date=` or, by default, the clock's today.
pub async fn dashboard_stats(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StatsParams>,
) -> Result<impl IntoResponse, AppError> {
    let reference_date = params.date.unwrap_or_else(|| state.clock.today());

    let orders = state.db.active_order_schedules().await?;
    let receipts = state.db.receipts_on(reference_date).await?;

    let counts = aggregate(&orders, &receipts, reference_date);

    tracing::debug!(
        reference_date = %reference_date,
        due_today = counts.due_today,
        overdue = counts.overdue,
        due_tomorrow = counts.due_tomorrow,
        completed_today = counts.completed_today,
        "Dashboard counts computed"
    );

    Ok(Json(StatsResponse {
        reference_date,
        counts,
    }))
}
