// src/models/investor.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Investor {
    pub id: Uuid,

    #[schema(example = "Ana Souza")]
    pub name: String,
    #[schema(example = "(11) 99888-7766")]
    pub contact: Option<String>,

    #[schema(example = "300000.00")]
    pub investment_amount: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Lançamento mensal de lucro (competência YYYY-MM)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestorProfitEntry {
    pub id: Uuid,
    pub investor_id: Uuid,
    #[schema(example = "2025-08")]
    pub month: String,
    #[schema(example = "30001.00")]
    pub profit: Decimal,
    pub created_at: DateTime<Utc>,
}

// Investidor como o painel enxerga, com os derivados do histórico
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestorView {
    #[serde(flatten)]
    pub investor: Investor,

    #[schema(example = "30001.00")]
    pub current_month_profit: Decimal,
    #[schema(example = "28500.00")]
    pub previous_month_profit: Decimal,
    #[schema(example = "145000.00")]
    pub total_profit_earned: Decimal,
    // Fatia do capital total investido, em %: a mesma razão usada no rateio
    #[schema(example = "30.00")]
    pub profit_percentage: Decimal,
}

// --- Rateio de lucros ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitShare {
    pub investor_id: Uuid,
    #[schema(example = "Ana Souza")]
    pub investor_name: String,
    // investimento / capital total
    #[schema(example = "0.30")]
    pub ratio: Decimal,
    // round(líquido × ratio) + 1
    #[schema(example = "30001.00")]
    pub profit_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributionPreview {
    #[schema(example = "150000.00")]
    pub total_profit: Decimal,
    #[schema(example = "50000.00")]
    pub total_expenses: Decimal,
    #[schema(example = "100000.00")]
    pub net_profit: Decimal,
    #[schema(example = "1000000.00")]
    pub total_investment: Decimal,
    pub distribution: Vec<ProfitShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitDistributionRun {
    pub id: Uuid,
    #[schema(example = "2025-08")]
    pub month: String,
    pub total_profit: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub total_investment: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitDistributionItem {
    pub id: Uuid,
    pub distribution_id: Uuid,
    pub investor_id: Uuid,
    pub ratio: Decimal,
    pub profit_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributionDetail {
    #[serde(flatten)]
    pub header: ProfitDistributionRun,
    pub items: Vec<ProfitDistributionItem>,
}
