// src/handlers/installments.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{decimal_non_negative, decimal_positive},
    },
    config::AppState,
    models::installment::{
        InstallmentRecord, InstallmentUnit, PaymentAdjustment, PaymentResult, PlanDetail,
        PlanSummary,
    },
};

// =============================================================================
//  ÁREA 1: PLANOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstallmentPlanPayload {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub customer_id: Uuid,

    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    #[schema(example = "Geladeira Frost Free 410L")]
    pub product_name: String,
    pub product_description: Option<String>,

    #[validate(custom(function = decimal_positive))]
    #[schema(example = "3600.00")]
    pub total_amount: Decimal,

    // A entrada pode ser zero; não pode passar do total (o serviço barra)
    #[validate(custom(function = decimal_non_negative))]
    #[schema(example = "600.00")]
    pub advance_amount: Decimal,

    #[validate(range(min = 1, message = "A quantidade de parcelas deve ser ao menos 1."))]
    #[schema(example = 10)]
    pub installment_count: u32,

    pub installment_unit: InstallmentUnit,

    #[schema(value_type = String, format = Date, example = "2025-07-01")]
    pub start_date: NaiveDate,

    #[validate(range(min = 1, max = 31, message = "O dia de vencimento deve estar entre 1 e 31."))]
    #[schema(example = 5)]
    pub due_day: u32,
}

// POST /api/installments
#[utoipa::path(
    post,
    path = "/api/installments",
    tag = "Installments",
    request_body = CreateInstallmentPlanPayload,
    responses(
        (status = 201, description = "Plano criado com cronograma completo", body = PlanDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 422, description = "Parâmetros financeiros inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_plan(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateInstallmentPlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state.installment_service
        .create_plan(
            &app_state.db_pool,
            payload.customer_id,
            &payload.product_name,
            payload.product_description.as_deref(),
            payload.total_amount,
            payload.advance_amount,
            payload.installment_count,
            payload.installment_unit,
            payload.start_date,
            payload.due_day,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/installments
#[utoipa::path(
    get,
    path = "/api/installments",
    tag = "Installments",
    responses(
        (status = 200, description = "Planos com progresso de pagamento", body = Vec<PlanSummary>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let plans = app_state.installment_service
        .list_plans(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(plans)))
}

// GET /api/installments/{id}
#[utoipa::path(
    get,
    path = "/api/installments/{id}",
    tag = "Installments",
    params(
        ("id" = Uuid, Path, description = "ID do plano")
    ),
    responses(
        (status = 200, description = "Plano com todas as parcelas", body = PlanDetail),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_plan(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.installment_service
        .get_plan_detail(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstallmentPlanPayload {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub product_name: String,
    pub product_description: Option<String>,

    #[validate(custom(function = decimal_positive))]
    #[schema(example = "3600.00")]
    pub total_amount: Decimal,

    #[validate(custom(function = decimal_non_negative))]
    #[schema(example = "600.00")]
    pub advance_amount: Decimal,
}

// PUT /api/installments/{id}
#[utoipa::path(
    put,
    path = "/api/installments/{id}",
    tag = "Installments",
    params(
        ("id" = Uuid, Path, description = "ID do plano")
    ),
    request_body = UpdateInstallmentPlanPayload,
    responses(
        (status = 200, description = "Plano atualizado, pendentes redistribuídas", body = PlanDetail),
        (status = 404, description = "Plano não encontrado"),
        (status = 409, description = "Novo total menor que o já recebido"),
        (status = 422, description = "Parâmetros financeiros inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_plan(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInstallmentPlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state.installment_service
        .update_plan(
            &app_state.db_pool,
            id,
            &payload.product_name,
            payload.product_description.as_deref(),
            payload.total_amount,
            payload.advance_amount,
        )
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/installments/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/installments/{id}/cancel",
    tag = "Installments",
    params(
        ("id" = Uuid, Path, description = "ID do plano")
    ),
    responses(
        (status = 200, description = "Plano cancelado", body = PlanDetail),
        (status = 404, description = "Plano não encontrado"),
        (status = 409, description = "Plano já cancelado ou concluído")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_plan(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.installment_service
        .cancel_plan(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// =============================================================================
//  ÁREA 2: PAGAMENTOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentPayload {
    #[validate(range(min = 1, message = "O número da parcela deve ser ao menos 1."))]
    #[schema(example = 3)]
    pub installment_number: i32,

    #[validate(length(min = 1, message = "A forma de pagamento é obrigatória."))]
    #[schema(example = "pix")]
    pub payment_method: String,

    pub notes: Option<String>,

    // Valor efetivamente recebido: pode diferir do nominal da parcela
    #[validate(custom(function = decimal_positive))]
    #[schema(example = "350.00")]
    pub custom_amount: Decimal,
}

// POST /api/installments/{id}/payments
#[utoipa::path(
    post,
    path = "/api/installments/{id}/payments",
    tag = "Installments",
    params(
        ("id" = Uuid, Path, description = "ID do plano")
    ),
    request_body = RecordPaymentPayload,
    responses(
        (status = 200, description = "Pagamento registrado e diferença redistribuída", body = PaymentResult),
        (status = 404, description = "Plano ou parcela não encontrados"),
        (status = 409, description = "Parcela já quitada"),
        (status = 422, description = "Valor de pagamento inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let result = app_state.installment_service
        .record_payment(
            &app_state.db_pool,
            id,
            payload.installment_number,
            payload.custom_amount,
            &payload.payment_method,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(result)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPaymentPayload {
    #[validate(range(min = 1, message = "O número da parcela deve ser ao menos 1."))]
    #[schema(example = 3)]
    pub installment_number: i32,

    #[validate(custom(function = decimal_positive))]
    #[schema(example = "350.00")]
    pub custom_amount: Decimal,
}

// POST /api/installments/{id}/payments/preview
#[utoipa::path(
    post,
    path = "/api/installments/{id}/payments/preview",
    tag = "Installments",
    params(
        ("id" = Uuid, Path, description = "ID do plano")
    ),
    request_body = PreviewPaymentPayload,
    responses(
        (status = 200, description = "Prévia da redistribuição, nada é gravado", body = PaymentAdjustment),
        (status = 404, description = "Parcela não encontrada"),
        (status = 409, description = "Parcela já quitada")
    ),
    security(("api_jwt" = []))
)]
pub async fn preview_payment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PreviewPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let adjustment = app_state.installment_service
        .preview_payment(
            &app_state.db_pool,
            id,
            payload.installment_number,
            payload.custom_amount,
        )
        .await?;

    Ok((StatusCode::OK, Json(adjustment)))
}

// POST /api/installments/{id}/records/{number}/unpay
#[utoipa::path(
    post,
    path = "/api/installments/{id}/records/{number}/unpay",
    tag = "Installments",
    params(
        ("id" = Uuid, Path, description = "ID do plano"),
        ("number" = i32, Path, description = "Número da parcela")
    ),
    responses(
        (status = 200, description = "Parcela estornada para pendente", body = InstallmentRecord),
        (status = 404, description = "Plano ou parcela não encontrados"),
        (status = 409, description = "Parcela não estava quitada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_unpaid(
    State(app_state): State<AppState>,
    Path((id, number)): Path<(Uuid, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let record = app_state.installment_service
        .mark_unpaid(&app_state.db_pool, id, number)
        .await?;

    Ok((StatusCode::OK, Json(record)))
}
