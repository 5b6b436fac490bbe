// src/handlers/loans.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{decimal_non_negative, decimal_positive},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::loan::{LoanDetail, LoanPayment, LoanStatus, LoanView},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanPayload {
    #[validate(length(min = 1, message = "O nome do investidor é obrigatório."))]
    #[schema(example = "João Pereira")]
    pub investor_name: String,

    #[validate(custom(function = decimal_positive))]
    #[schema(example = "100000.00")]
    pub loan_amount: Decimal,

    // Taxa flat em % sobre o principal, por mês de contrato
    #[validate(custom(function = decimal_non_negative))]
    #[schema(example = "10.00")]
    pub interest_rate: Decimal,

    #[validate(range(min = 1, message = "A duração deve ser de ao menos 1 mês."))]
    #[schema(example = 12)]
    pub duration_months: u32,

    pub notes: Option<String>,
}

// POST /api/loans
#[utoipa::path(
    post,
    path = "/api/loans",
    tag = "Loans",
    request_body = CreateLoanPayload,
    responses(
        (status = 201, description = "Empréstimo criado com juros calculados", body = LoanView),
        (status = 400, description = "Dados inválidos"),
        (status = 422, description = "Parâmetros do empréstimo inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_loan(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLoanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let loan = app_state.loan_service
        .create_loan(
            &app_state.db_pool,
            &payload.investor_name,
            payload.loan_amount,
            payload.interest_rate,
            payload.duration_months,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(loan)))
}

// GET /api/loans
#[utoipa::path(
    get,
    path = "/api/loans",
    tag = "Loans",
    responses(
        (status = 200, description = "Lista de empréstimos com saldo devedor", body = Vec<LoanView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_loans(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let loans = app_state.loan_service.list_loans(&app_state.db_pool).await?;

    Ok((StatusCode::OK, Json(loans)))
}

// GET /api/loans/{id}
#[utoipa::path(
    get,
    path = "/api/loans/{id}",
    tag = "Loans",
    params(
        ("id" = Uuid, Path, description = "ID do empréstimo")
    ),
    responses(
        (status = 200, description = "Empréstimo com histórico de pagamentos", body = LoanDetail),
        (status = 404, description = "Empréstimo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_loan(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.loan_service
        .get_loan_detail(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordLoanPaymentPayload {
    #[validate(custom(function = decimal_positive))]
    #[schema(example = "18334.00")]
    pub amount: Decimal,

    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanPaymentResponse {
    pub payment: LoanPayment,
    pub loan: LoanView,
}

// POST /api/loans/{id}/payments
#[utoipa::path(
    post,
    path = "/api/loans/{id}/payments",
    operation_id = "record_loan_payment",
    tag = "Loans",
    params(
        ("id" = Uuid, Path, description = "ID do empréstimo")
    ),
    request_body = RecordLoanPaymentPayload,
    responses(
        (status = 200, description = "Pagamento registrado", body = LoanPaymentResponse),
        (status = 404, description = "Empréstimo não encontrado"),
        (status = 409, description = "Empréstimo não aceita pagamentos"),
        (status = 422, description = "Pagamento acima do saldo devedor")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordLoanPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (payment, loan) = app_state.loan_service
        .record_payment(&app_state.db_pool, id, payload.amount, payload.notes.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(LoanPaymentResponse { payment, loan })))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoanStatusPayload {
    #[schema(example = "defaulted")]
    pub status: LoanStatus,
}

// PUT /api/loans/{id}/status
#[utoipa::path(
    put,
    path = "/api/loans/{id}/status",
    tag = "Loans",
    params(
        ("id" = Uuid, Path, description = "ID do empréstimo")
    ),
    request_body = UpdateLoanStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = LoanView),
        (status = 404, description = "Empréstimo não encontrado"),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    // Transição administrativa: fica registrado quem pediu
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLoanStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let loan = app_state.loan_service
        .update_status(&app_state.db_pool, id, payload.status)
        .await?;

    tracing::info!("🔁 Status do empréstimo {} alterado por {}", id, user.email);

    Ok((StatusCode::OK, Json(loan)))
}
