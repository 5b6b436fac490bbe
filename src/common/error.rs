use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    #[error("Plano de crediário não encontrado")]
    PlanNotFound,

    #[error("Parcela não encontrada")]
    InstallmentNotFound,

    #[error("Empréstimo não encontrado")]
    LoanNotFound,

    #[error("Investidor não encontrado")]
    InvestorNotFound,

    // --- Conflitos de estado ---

    #[error("Parcela já quitada")]
    InstallmentAlreadyPaid,

    #[error("Parcela ainda não foi quitada")]
    InstallmentNotPaid,

    #[error("Novo total menor que o que já foi recebido")]
    PlanAmountBelowPaid,

    #[error("Plano cancelado não recebe movimentações")]
    PlanCancelled,

    #[error("Plano já concluído")]
    PlanAlreadyCompleted,

    #[error("Empréstimo não aceita pagamentos no status atual")]
    LoanNotPayable,

    #[error("Transição de status de empréstimo não permitida")]
    LoanStatusNotAllowed,

    // --- Guardas aritméticas ---
    // Nunca deixamos divisão por zero virar NaN/Infinity na resposta.

    #[error("O lucro informado deve ser maior que as despesas")]
    ProfitBelowExpenses,

    #[error("Não há capital investido para ratear")]
    NoInvestedCapital,

    #[error("Pagamento acima do saldo devedor")]
    PaymentExceedsRemaining,

    #[error("Valor de pagamento inválido")]
    InvalidPaymentAmount,

    #[error("Parâmetros do plano inválidos: {0}")]
    InvalidPlanTerms(String),

    #[error("Parâmetros do empréstimo inválidos: {0}")]
    InvalidLoanTerms(String),

    #[error("Competência inválida (use o formato YYYY-MM)")]
    InvalidProfitMonth,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.".to_string()),

            ref e @ (AppError::UserNotFound
            | AppError::CustomerNotFound
            | AppError::PlanNotFound
            | AppError::InstallmentNotFound
            | AppError::LoanNotFound
            | AppError::InvestorNotFound) => (StatusCode::NOT_FOUND, e.to_string()),

            ref e @ (AppError::InstallmentAlreadyPaid
            | AppError::InstallmentNotPaid
            | AppError::PlanAmountBelowPaid
            | AppError::PlanCancelled
            | AppError::PlanAlreadyCompleted
            | AppError::LoanNotPayable
            | AppError::LoanStatusNotAllowed) => (StatusCode::CONFLICT, e.to_string()),

            ref e @ (AppError::ProfitBelowExpenses
            | AppError::NoInvestedCapital
            | AppError::PaymentExceedsRemaining
            | AppError::InvalidPaymentAmount
            | AppError::InvalidPlanTerms(_)
            | AppError::InvalidLoanTerms(_)
            | AppError::InvalidProfitMonth) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
