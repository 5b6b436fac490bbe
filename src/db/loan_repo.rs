// src/db/loan_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::loan::{Loan, LoanPayment, LoanStatus},
};

#[derive(Clone)]
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_loan<'e, E>(
        &self,
        executor: E,
        investor_name: &str,
        loan_amount: Decimal,
        interest_rate: Decimal,
        duration_months: i32,
        interest_amount: Decimal,
        total_amount: Decimal,
        monthly_payment: Decimal,
        notes: Option<&str>,
    ) -> Result<Loan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (
                investor_name, loan_amount, interest_rate, duration_months,
                interest_amount, total_amount, monthly_payment, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(investor_name)
        .bind(loan_amount)
        .bind(interest_rate)
        .bind(duration_months)
        .bind(interest_amount)
        .bind(total_amount)
        .bind(monthly_payment)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(loan)
    }

    pub async fn get_loan<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Loan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(loan)
    }

    pub async fn list_loans<'e, E>(&self, executor: E) -> Result<Vec<Loan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY created_at DESC")
            .fetch_all(executor)
            .await?;

        Ok(loans)
    }

    pub async fn add_payment<'e, E>(
        &self,
        executor: E,
        loan_id: Uuid,
        amount: Decimal,
        notes: Option<&str>,
    ) -> Result<LoanPayment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, LoanPayment>(
            r#"
            INSERT INTO loan_payments (loan_id, amount, notes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(amount)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        loan_id: Uuid,
    ) -> Result<Vec<LoanPayment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, LoanPayment>(
            "SELECT * FROM loan_payments WHERE loan_id = $1 ORDER BY paid_at ASC",
        )
        .bind(loan_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }

    // Acumula o pagamento no total já quitado do empréstimo
    pub async fn add_to_paid_amount<'e, E>(
        &self,
        executor: E,
        loan_id: Uuid,
        amount: Decimal,
    ) -> Result<Loan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET paid_amount = paid_amount + $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(amount)
        .fetch_one(executor)
        .await?;

        Ok(loan)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        loan_id: Uuid,
        status: LoanStatus,
    ) -> Result<Loan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loan = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(loan_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(loan)
    }
}
