// src/db/investor_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::investor::{
        Investor, InvestorProfitEntry, ProfitDistributionItem, ProfitDistributionRun,
    },
};

#[derive(Clone)]
pub struct InvestorRepository {
    pool: PgPool,
}

impl InvestorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  INVESTIDORES
    // =========================================================================

    pub async fn create_investor<'e, E>(
        &self,
        executor: E,
        name: &str,
        contact: Option<&str>,
        investment_amount: Decimal,
    ) -> Result<Investor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let investor = sqlx::query_as::<_, Investor>(
            r#"
            INSERT INTO investors (name, contact, investment_amount)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(contact)
        .bind(investment_amount)
        .fetch_one(executor)
        .await?;

        Ok(investor)
    }

    pub async fn get_investor<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Investor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let investor = sqlx::query_as::<_, Investor>("SELECT * FROM investors WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(investor)
    }

    pub async fn list_investors<'e, E>(&self, executor: E) -> Result<Vec<Investor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let investors = sqlx::query_as::<_, Investor>("SELECT * FROM investors ORDER BY name ASC")
            .fetch_all(executor)
            .await?;

        Ok(investors)
    }

    // =========================================================================
    //  HISTÓRICO MENSAL DE LUCROS
    // =========================================================================

    // Um lançamento por competência: re-lançar o mesmo mês substitui o valor
    pub async fn upsert_profit_entry<'e, E>(
        &self,
        executor: E,
        investor_id: Uuid,
        month: &str,
        profit: Decimal,
    ) -> Result<InvestorProfitEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, InvestorProfitEntry>(
            r#"
            INSERT INTO investor_profits (investor_id, month, profit)
            VALUES ($1, $2, $3)
            ON CONFLICT (investor_id, month)
            DO UPDATE SET profit = EXCLUDED.profit, created_at = now()
            RETURNING *
            "#,
        )
        .bind(investor_id)
        .bind(month)
        .bind(profit)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    pub async fn list_profit_entries<'e, E>(
        &self,
        executor: E,
        investor_id: Uuid,
    ) -> Result<Vec<InvestorProfitEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, InvestorProfitEntry>(
            "SELECT * FROM investor_profits WHERE investor_id = $1 ORDER BY month ASC",
        )
        .bind(investor_id)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }

    pub async fn profit_for_month<'e, E>(
        &self,
        executor: E,
        investor_id: Uuid,
        month: &str,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profit = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(profit), 0)
            FROM investor_profits
            WHERE investor_id = $1 AND month = $2
            "#,
        )
        .bind(investor_id)
        .bind(month)
        .fetch_one(executor)
        .await?;

        Ok(profit)
    }

    pub async fn total_profit<'e, E>(
        &self,
        executor: E,
        investor_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(profit), 0) FROM investor_profits WHERE investor_id = $1",
        )
        .bind(investor_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    pub async fn total_investment<'e, E>(&self, executor: E) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(investment_amount), 0) FROM investors",
        )
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    // =========================================================================
    //  RODADAS DE DISTRIBUIÇÃO
    // =========================================================================

    pub async fn create_distribution<'e, E>(
        &self,
        executor: E,
        month: &str,
        total_profit: Decimal,
        total_expenses: Decimal,
        net_profit: Decimal,
        total_investment: Decimal,
    ) -> Result<ProfitDistributionRun, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let run = sqlx::query_as::<_, ProfitDistributionRun>(
            r#"
            INSERT INTO profit_distributions (
                month, total_profit, total_expenses, net_profit, total_investment
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(month)
        .bind(total_profit)
        .bind(total_expenses)
        .bind(net_profit)
        .bind(total_investment)
        .fetch_one(executor)
        .await?;

        Ok(run)
    }

    pub async fn insert_distribution_item<'e, E>(
        &self,
        executor: E,
        distribution_id: Uuid,
        investor_id: Uuid,
        ratio: Decimal,
        profit_amount: Decimal,
    ) -> Result<ProfitDistributionItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, ProfitDistributionItem>(
            r#"
            INSERT INTO profit_distribution_items (distribution_id, investor_id, ratio, profit_amount)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(distribution_id)
        .bind(investor_id)
        .bind(ratio)
        .bind(profit_amount)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn list_distributions<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<ProfitDistributionRun>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let runs = sqlx::query_as::<_, ProfitDistributionRun>(
            "SELECT * FROM profit_distributions ORDER BY created_at DESC",
        )
        .fetch_all(executor)
        .await?;

        Ok(runs)
    }

    pub async fn list_distribution_items<'e, E>(
        &self,
        executor: E,
        distribution_id: Uuid,
    ) -> Result<Vec<ProfitDistributionItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, ProfitDistributionItem>(
            "SELECT * FROM profit_distribution_items WHERE distribution_id = $1",
        )
        .bind(distribution_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }
}
