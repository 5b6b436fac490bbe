// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardSummary, ReceiptsChartEntry, TopDebtorEntry},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Resumo Geral
    pub async fn get_summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Iniciamos uma transação (Snapshot consistente dos dados)
        let mut tx = executor.begin().await?;

        // A. Parcelas vencendo hoje
        let receivables_today = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM installment_records
            WHERE status = 'PENDING' AND due_date = CURRENT_DATE
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // B. Parcelas já vencidas
        let overdue_amount = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM installment_records
            WHERE status = 'PENDING' AND due_date < CURRENT_DATE
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // C. Saldo nominal em aberto (planos ativos)
        let open_installment_balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(r.amount), 0)
            FROM installment_records r
            JOIN installment_plans p ON p.id = r.plan_id
            WHERE r.status = 'PENDING' AND p.status = 'ACTIVE'
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // D. Empréstimos ativos e saldo devedor
        let active_loans = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM loans WHERE status = 'ACTIVE'",
        )
        .fetch_one(&mut *tx)
        .await?;

        let outstanding_loan_balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount - paid_amount), 0)
            FROM loans
            WHERE status = 'ACTIVE'
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // E. Capital investido total
        let total_invested_capital = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(investment_amount), 0) FROM investors",
        )
        .fetch_one(&mut *tx)
        .await?;

        // F. Lucro lançado na competência atual
        let profit_distributed_this_month = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(profit), 0)
            FROM investor_profits
            WHERE month = to_char(CURRENT_DATE, 'YYYY-MM')
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // Fecha a transação (Commit ou Rollback tanto faz pra leitura, mas commit é clean)
        tx.commit().await?;

        Ok(DashboardSummary {
            receivables_today,
            overdue_amount,
            open_installment_balance,
            active_loans,
            outstanding_loan_balance,
            total_invested_capital,
            profit_distributed_this_month,
        })
    }

    // 2. Gráfico de Linha (Recebimentos dos últimos 30 dias)
    pub async fn get_receipts_last_30_days<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<ReceiptsChartEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, ReceiptsChartEntry>(
            r#"
            SELECT
                to_char(paid_date, 'YYYY-MM-DD') AS date,
                SUM(actual_paid_amount) AS total
            FROM installment_records
            WHERE status = 'PAID'
              AND paid_date >= (CURRENT_DATE - INTERVAL '30 days')
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(data)
    }

    // 3. Top 5 devedores (maior saldo pendente de crediário)
    pub async fn get_top_debtors<'e, E>(&self, executor: E) -> Result<Vec<TopDebtorEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, TopDebtorEntry>(
            r#"
            SELECT
                c.id AS customer_id,
                c.full_name AS customer_name,
                SUM(r.amount) AS pending_amount,
                COUNT(r.id) FILTER (WHERE r.due_date < CURRENT_DATE) AS overdue_count
            FROM installment_records r
            JOIN installment_plans p ON p.id = r.plan_id
            JOIN customers c ON c.id = p.customer_id
            WHERE r.status = 'PENDING'
            GROUP BY c.id, c.full_name
            ORDER BY pending_amount DESC
            LIMIT 5
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(data)
    }
}
