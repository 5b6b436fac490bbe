// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    // Parcelas vencendo hoje
    pub receivables_today: Decimal,
    // Parcelas pendentes já vencidas
    pub overdue_amount: Decimal,
    // Saldo nominal em aberto de todos os planos ativos
    pub open_installment_balance: Decimal,

    pub active_loans: i64,
    pub outstanding_loan_balance: Decimal,

    pub total_invested_capital: Decimal,
    // Lucro já lançado para a competência atual
    pub profit_distributed_this_month: Decimal,
}

// Recebimentos por dia (últimos 30 dias)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptsChartEntry {
    #[schema(example = "2025-08-01")]
    pub date: Option<String>,
    pub total: Option<Decimal>,
}

// Maiores devedores (saldo pendente de crediário)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopDebtorEntry {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub pending_amount: Option<Decimal>,
    pub overdue_count: Option<i64>,
}
