// src/handlers/profits.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{decimal_non_negative, decimal_positive, month_key},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::investor::{DistributionDetail, DistributionPreview},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributeProfitPayload {
    #[validate(custom(function = decimal_positive))]
    #[schema(example = "150000.00")]
    pub total_profit: Decimal,

    #[validate(custom(function = decimal_non_negative))]
    #[schema(example = "50000.00")]
    pub total_expenses: Decimal,

    // Competência do lançamento; ausente = mês corrente
    #[validate(custom(function = month_key))]
    #[schema(example = "2025-08")]
    pub month: Option<String>,
}

// POST /api/profits/preview
#[utoipa::path(
    post,
    path = "/api/profits/preview",
    tag = "Profits",
    request_body = DistributeProfitPayload,
    responses(
        (status = 200, description = "Prévia do rateio, nada é gravado", body = DistributionPreview),
        (status = 400, description = "Dados inválidos"),
        (status = 422, description = "Lucro insuficiente ou capital zerado")
    ),
    security(("api_jwt" = []))
)]
pub async fn preview_distribution(
    State(app_state): State<AppState>,
    Json(payload): Json<DistributeProfitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let preview = app_state.investor_service
        .preview_distribution(&app_state.db_pool, payload.total_profit, payload.total_expenses)
        .await?;

    Ok((StatusCode::OK, Json(preview)))
}

// POST /api/profits/distribute
#[utoipa::path(
    post,
    path = "/api/profits/distribute",
    tag = "Profits",
    request_body = DistributeProfitPayload,
    responses(
        (status = 201, description = "Rateio confirmado e lançado por investidor", body = DistributionDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 422, description = "Lucro insuficiente ou capital zerado")
    ),
    security(("api_jwt" = []))
)]
pub async fn distribute(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<DistributeProfitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state.investor_service
        .distribute(
            &app_state.db_pool,
            payload.total_profit,
            payload.total_expenses,
            payload.month.as_deref(),
        )
        .await?;

    tracing::info!("💰 Rateio confirmado por {}", user.email);

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/profits
#[utoipa::path(
    get,
    path = "/api/profits",
    tag = "Profits",
    responses(
        (status = 200, description = "Rodadas de distribuição já confirmadas", body = Vec<DistributionDetail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_distributions(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let runs = app_state.investor_service
        .list_distributions(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(runs)))
}
