// src/handlers/investors.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{decimal_non_negative, month_key},
    },
    config::AppState,
    models::investor::{Investor, InvestorProfitEntry, InvestorView},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestorPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Ana Souza")]
    pub name: String,

    #[schema(example = "(11) 99888-7766")]
    pub contact: Option<String>,

    #[validate(custom(function = decimal_non_negative))]
    #[schema(example = "300000.00")]
    pub investment_amount: Decimal,
}

// POST /api/investors
#[utoipa::path(
    post,
    path = "/api/investors",
    tag = "Investors",
    request_body = CreateInvestorPayload,
    responses(
        (status = 201, description = "Investidor criado", body = Investor),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_investor(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateInvestorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let investor = app_state.investor_service
        .create_investor(
            &app_state.db_pool,
            &payload.name,
            payload.contact.as_deref(),
            payload.investment_amount,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(investor)))
}

// GET /api/investors
#[utoipa::path(
    get,
    path = "/api/investors",
    tag = "Investors",
    responses(
        (status = 200, description = "Investidores com lucros derivados", body = Vec<InvestorView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_investors(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let investors = app_state.investor_service
        .list_investors(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(investors)))
}

// GET /api/investors/{id}
#[utoipa::path(
    get,
    path = "/api/investors/{id}",
    tag = "Investors",
    params(
        ("id" = Uuid, Path, description = "ID do investidor")
    ),
    responses(
        (status = 200, description = "Investidor com lucros derivados", body = InvestorView),
        (status = 404, description = "Investidor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_investor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let investor = app_state.investor_service
        .get_investor(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(investor)))
}

// GET /api/investors/{id}/profits
#[utoipa::path(
    get,
    path = "/api/investors/{id}/profits",
    tag = "Investors",
    params(
        ("id" = Uuid, Path, description = "ID do investidor")
    ),
    responses(
        (status = 200, description = "Histórico mensal de lucros", body = Vec<InvestorProfitEntry>),
        (status = 404, description = "Investidor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_profits(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.investor_service
        .list_profit_history(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestorProfitPayload {
    #[validate(custom(function = decimal_non_negative))]
    #[schema(example = "30001.00")]
    pub profit: Decimal,

    #[validate(custom(function = month_key))]
    #[schema(example = "2025-08")]
    pub month: String,
}

// PUT /api/investors/{id}/profits
#[utoipa::path(
    put,
    path = "/api/investors/{id}/profits",
    tag = "Investors",
    params(
        ("id" = Uuid, Path, description = "ID do investidor")
    ),
    request_body = UpdateInvestorProfitPayload,
    responses(
        (status = 200, description = "Lucro da competência lançado (ou substituído)", body = InvestorProfitEntry),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Investidor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profit(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvestorProfitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entry = app_state.investor_service
        .update_profit(&app_state.db_pool, id, &payload.month, payload.profit)
        .await?;

    Ok((StatusCode::OK, Json(entry)))
}
