// src/db/installment_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::installment::{
        InstallmentPlan, InstallmentRecord, InstallmentUnit, PlanStatus, PlanSummary,
    },
};

#[derive(Clone)]
pub struct InstallmentRepository {
    pool: PgPool,
}

impl InstallmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PLANOS
    // =========================================================================

    pub async fn create_plan<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        product_name: &str,
        product_description: Option<&str>,
        total_amount: Decimal,
        advance_amount: Decimal,
        installment_count: i32,
        installment_unit: InstallmentUnit,
        per_installment_amount: Decimal,
        start_date: NaiveDate,
        due_day: i32,
    ) -> Result<InstallmentPlan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan = sqlx::query_as::<_, InstallmentPlan>(
            r#"
            INSERT INTO installment_plans (
                customer_id, product_name, product_description,
                total_amount, advance_amount, installment_count,
                installment_unit, per_installment_amount, start_date, due_day
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(product_name)
        .bind(product_description)
        .bind(total_amount)
        .bind(advance_amount)
        .bind(installment_count)
        .bind(installment_unit)
        .bind(per_installment_amount)
        .bind(start_date)
        .bind(due_day)
        .fetch_one(executor)
        .await?;

        Ok(plan)
    }

    pub async fn get_plan<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<InstallmentPlan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan =
            sqlx::query_as::<_, InstallmentPlan>("SELECT * FROM installment_plans WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(plan)
    }

    // Listagem com progresso agregado (parcelas quitadas, recebido, saldo)
    pub async fn list_plan_summaries<'e, E>(&self, executor: E) -> Result<Vec<PlanSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let summaries = sqlx::query_as::<_, PlanSummary>(
            r#"
            SELECT
                p.id,
                p.customer_id,
                c.full_name AS customer_name,
                p.product_name,
                p.total_amount,
                p.advance_amount,
                p.installment_count,
                p.per_installment_amount,
                p.status,
                COUNT(r.id) FILTER (WHERE r.status = 'PAID') AS paid_count,
                COALESCE(SUM(r.actual_paid_amount) FILTER (WHERE r.status = 'PAID'), 0) AS paid_sum,
                COALESCE(SUM(r.amount) FILTER (WHERE r.status = 'PENDING'), 0) AS remaining_balance
            FROM installment_plans p
            JOIN customers c ON c.id = p.customer_id
            LEFT JOIN installment_records r ON r.plan_id = p.id
            GROUP BY p.id, c.full_name
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(summaries)
    }

    pub async fn update_plan_amounts<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        product_name: &str,
        product_description: Option<&str>,
        total_amount: Decimal,
        advance_amount: Decimal,
        per_installment_amount: Decimal,
    ) -> Result<InstallmentPlan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan = sqlx::query_as::<_, InstallmentPlan>(
            r#"
            UPDATE installment_plans
            SET product_name = $2,
                product_description = $3,
                total_amount = $4,
                advance_amount = $5,
                per_installment_amount = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(product_name)
        .bind(product_description)
        .bind(total_amount)
        .bind(advance_amount)
        .bind(per_installment_amount)
        .fetch_one(executor)
        .await?;

        Ok(plan)
    }

    pub async fn update_plan_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: PlanStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE installment_plans SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  PARCELAS
    // =========================================================================

    pub async fn insert_record<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        installment_number: i32,
        amount: Decimal,
        due_date: NaiveDate,
    ) -> Result<InstallmentRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, InstallmentRecord>(
            r#"
            INSERT INTO installment_records (plan_id, installment_number, amount, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(plan_id)
        .bind(installment_number)
        .bind(amount)
        .bind(due_date)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    pub async fn list_records<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
    ) -> Result<Vec<InstallmentRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, InstallmentRecord>(
            "SELECT * FROM installment_records WHERE plan_id = $1 ORDER BY installment_number ASC",
        )
        .bind(plan_id)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    pub async fn get_record_by_number<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        installment_number: i32,
    ) -> Result<Option<InstallmentRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, InstallmentRecord>(
            "SELECT * FROM installment_records WHERE plan_id = $1 AND installment_number = $2",
        )
        .bind(plan_id)
        .bind(installment_number)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    // Soma do que já entrou (parcelas quitadas)
    pub async fn paid_sum<'e, E>(&self, executor: E, plan_id: Uuid) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sum = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(actual_paid_amount), 0)
            FROM installment_records
            WHERE plan_id = $1 AND status = 'PAID'
            "#,
        )
        .bind(plan_id)
        .fetch_one(executor)
        .await?;

        Ok(sum)
    }

    pub async fn pending_count<'e, E>(&self, executor: E, plan_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM installment_records WHERE plan_id = $1 AND status = 'PENDING'",
        )
        .bind(plan_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    // Parcelas pendentes DEPOIS da parcela informada (alvo da redistribuição)
    pub async fn pending_count_after<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        installment_number: i32,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM installment_records
            WHERE plan_id = $1 AND status = 'PENDING' AND installment_number > $2
            "#,
        )
        .bind(plan_id)
        .bind(installment_number)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn mark_record_paid<'e, E>(
        &self,
        executor: E,
        record_id: Uuid,
        actual_paid_amount: Decimal,
        paid_date: NaiveDate,
        payment_method: &str,
        notes: Option<&str>,
    ) -> Result<InstallmentRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, InstallmentRecord>(
            r#"
            UPDATE installment_records
            SET status = 'PAID',
                actual_paid_amount = $2,
                paid_date = $3,
                payment_method = $4,
                notes = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(record_id)
        .bind(actual_paid_amount)
        .bind(paid_date)
        .bind(payment_method)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    // Estorno administrativo: volta a parcela para pendente
    pub async fn mark_record_unpaid<'e, E>(
        &self,
        executor: E,
        record_id: Uuid,
    ) -> Result<InstallmentRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, InstallmentRecord>(
            r#"
            UPDATE installment_records
            SET status = 'PENDING',
                actual_paid_amount = NULL,
                paid_date = NULL,
                payment_method = NULL,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(record_id)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    // Aplica o ajuste (com sinal) ao nominal das pendentes posteriores
    pub async fn adjust_pending_after<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        installment_number: i32,
        delta: Decimal,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE installment_records
            SET amount = amount + $3, updated_at = now()
            WHERE plan_id = $1 AND status = 'PENDING' AND installment_number > $2
            "#,
        )
        .bind(plan_id)
        .bind(installment_number)
        .bind(delta)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    // Edição do plano: sobrescreve o nominal de TODAS as pendentes
    pub async fn set_pending_amounts<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        amount: Decimal,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE installment_records
            SET amount = $2, updated_at = now()
            WHERE plan_id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(plan_id)
        .bind(amount)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
