// src/models/installment.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "installment_unit", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum InstallmentUnit {
    Days,
    Weeks,
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "plan_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Active,
    Completed,
    Cancelled,
}

// Status persistido da parcela. "Atrasada" não entra aqui de propósito:
// é derivado na leitura (pendente + vencida), nunca gravado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "installment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Pending,
    Paid,
}

// Status exibido ao painel (inclui o derivado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Pending,
    Paid,
    Overdue,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub customer_id: Uuid,

    #[schema(example = "Geladeira Frost Free 410L")]
    pub product_name: String,
    pub product_description: Option<String>,

    #[schema(example = "3600.00")]
    pub total_amount: Decimal,
    #[schema(example = "600.00")]
    pub advance_amount: Decimal,
    #[schema(example = 10)]
    pub installment_count: i32,
    pub installment_unit: InstallmentUnit,
    #[schema(example = "300.00")]
    pub per_installment_amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2025-07-01")]
    pub start_date: NaiveDate,
    #[schema(example = 5)]
    pub due_day: i32,

    pub status: PlanStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentRecord {
    pub id: Uuid,
    pub plan_id: Uuid,

    #[schema(example = 1)]
    pub installment_number: i32,

    // Valor nominal devido (pode ser reajustado por redistribuição)
    #[schema(example = "300.00")]
    pub amount: Decimal,
    // O que foi efetivamente recebido
    #[schema(example = "300.00")]
    pub actual_paid_amount: Option<Decimal>,

    pub status: InstallmentStatus,

    #[schema(value_type = String, format = Date, example = "2025-08-05")]
    pub due_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date, example = "2025-08-03")]
    pub paid_date: Option<NaiveDate>,

    #[schema(example = "pix")]
    pub payment_method: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstallmentRecord {
    /// Status exibido: parcela pendente com vencimento no passado vira "overdue".
    pub fn display_status(&self, today: NaiveDate) -> DisplayStatus {
        match self.status {
            InstallmentStatus::Paid => DisplayStatus::Paid,
            InstallmentStatus::Pending if self.due_date < today => DisplayStatus::Overdue,
            InstallmentStatus::Pending => DisplayStatus::Pending,
        }
    }
}

// Parcela como o painel enxerga (com o status derivado resolvido)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentRecordView {
    #[serde(flatten)]
    pub record: InstallmentRecord,
    pub display_status: DisplayStatus,
}

// Linha da listagem de planos, com o progresso agregado
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "Maria da Silva")]
    pub customer_name: String,
    pub product_name: String,
    pub total_amount: Decimal,
    pub advance_amount: Decimal,
    pub installment_count: i32,
    pub per_installment_amount: Decimal,
    pub status: PlanStatus,
    #[schema(example = 4)]
    pub paid_count: i64,
    #[schema(example = "1200.00")]
    pub paid_sum: Decimal,
    #[schema(example = "1800.00")]
    pub remaining_balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetail {
    #[serde(flatten)]
    pub header: InstallmentPlan,
    pub customer_name: String,
    pub records: Vec<InstallmentRecordView>,
}

// Resultado da redistribuição de diferença de pagamento.
// Também serve de resposta do preview (não persiste nada).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAdjustment {
    // custom - nominal; zero = pagamento exato
    #[schema(example = "-50.00")]
    pub difference: Decimal,
    // Quantas parcelas pendentes posteriores receberam o ajuste
    #[schema(example = 5)]
    pub remaining_count: i64,
    // Ajuste com sinal aplicado a cada parcela restante
    #[schema(example = "-10.00")]
    pub adjustment_per_installment: Decimal,
    // Diferença que não pôde ser redistribuída (sem parcelas restantes).
    // Sempre reportada ao operador, nunca descartada em silêncio.
    #[schema(example = "0.00")]
    pub unallocated_difference: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub record: InstallmentRecord,
    pub adjustment: PaymentAdjustment,
    pub plan_status: PlanStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(status: InstallmentStatus, due: NaiveDate) -> InstallmentRecord {
        InstallmentRecord {
            id: Uuid::nil(),
            plan_id: Uuid::nil(),
            installment_number: 1,
            amount: dec!(300),
            actual_paid_amount: None,
            status,
            due_date: due,
            paid_date: None,
            payment_method: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn parcela_pendente_vencida_aparece_como_atrasada() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
        let overdue = record(InstallmentStatus::Pending, NaiveDate::from_ymd_opt(2025, 8, 9).unwrap());
        let on_time = record(InstallmentStatus::Pending, NaiveDate::from_ymd_opt(2025, 8, 10).unwrap());
        let future = record(InstallmentStatus::Pending, NaiveDate::from_ymd_opt(2025, 9, 10).unwrap());

        assert_eq!(overdue.display_status(today), DisplayStatus::Overdue);
        // Vencendo hoje ainda não está atrasada
        assert_eq!(on_time.display_status(today), DisplayStatus::Pending);
        assert_eq!(future.display_status(today), DisplayStatus::Pending);
    }

    #[test]
    fn parcela_quitada_nunca_aparece_como_atrasada() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
        let paid = record(InstallmentStatus::Paid, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(paid.display_status(today), DisplayStatus::Paid);
    }
}
