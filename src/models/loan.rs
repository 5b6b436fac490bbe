// src/models/loan.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loan_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Active,
    Completed,
    Defaulted,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: Uuid,

    #[schema(example = "João Pereira")]
    pub investor_name: String,

    // Principal emprestado
    #[schema(example = "100000.00")]
    pub loan_amount: Decimal,
    // Taxa flat em % (não composta)
    #[schema(example = "10.00")]
    pub interest_rate: Decimal,
    #[schema(example = 12)]
    pub duration_months: i32,

    // Derivados, calculados no servidor: nunca aceitos do cliente
    #[schema(example = "120000.00")]
    pub interest_amount: Decimal,
    #[schema(example = "220000.00")]
    pub total_amount: Decimal,
    #[schema(example = "18333.33")]
    pub monthly_payment: Decimal,

    #[schema(example = "36666.66")]
    pub paid_amount: Decimal,

    pub status: LoanStatus,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    pub fn remaining_amount(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayment {
    pub id: Uuid,
    pub loan_id: Uuid,
    #[schema(example = "18334.00")]
    pub amount: Decimal,
    pub notes: Option<String>,
    pub paid_at: DateTime<Utc>,
}

// Empréstimo como o painel enxerga, com o saldo devedor resolvido
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    #[serde(flatten)]
    pub loan: Loan,
    #[schema(example = "183334.00")]
    pub remaining_amount: Decimal,
}

impl From<Loan> for LoanView {
    fn from(loan: Loan) -> Self {
        let remaining_amount = loan.remaining_amount();
        Self { loan, remaining_amount }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetail {
    #[serde(flatten)]
    pub header: LoanView,
    pub payments: Vec<LoanPayment>,
}
