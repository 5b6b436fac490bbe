// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{DashboardSummary, ReceiptsChartEntry, TopDebtorEntry},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo financeiro do dia", body = DashboardSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service
        .get_summary(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/receipts-chart
#[utoipa::path(
    get,
    path = "/api/dashboard/receipts-chart",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Recebimentos por dia (últimos 30 dias)", body = Vec<ReceiptsChartEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_receipts_chart(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let chart = app_state.dashboard_service
        .get_receipts_chart(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(chart)))
}

// GET /api/dashboard/top-debtors
#[utoipa::path(
    get,
    path = "/api/dashboard/top-debtors",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Clientes com maior saldo pendente", body = Vec<TopDebtorEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_top_debtors(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let debtors = app_state.dashboard_service
        .get_top_debtors(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(debtors)))
}
