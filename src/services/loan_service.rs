// src/services/loan_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, rounding},
    db::LoanRepository,
    models::loan::{LoanDetail, LoanPayment, LoanStatus, LoanView},
    services::ledger,
};

#[derive(Clone)]
pub struct LoanService {
    repo: LoanRepository,
}

impl LoanService {
    pub fn new(repo: LoanRepository) -> Self {
        Self { repo }
    }

    /// Cria o empréstimo calculando juros, total e mensalidade no servidor.
    /// Valores derivados nunca são aceitos do cliente.
    pub async fn create_loan<'e, E>(
        &self,
        executor: E,
        investor_name: &str,
        loan_amount: Decimal,
        interest_rate: Decimal,
        duration_months: u32,
        notes: Option<&str>,
    ) -> Result<LoanView, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let economics = ledger::loan_economics(loan_amount, interest_rate, duration_months)?;

        let loan = self.repo.create_loan(
            executor,
            investor_name,
            loan_amount,
            interest_rate,
            duration_months as i32,
            economics.interest_amount,
            economics.total_amount,
            rounding::round_money(economics.monthly_payment),
            notes,
        ).await?;

        tracing::info!(
            "🏦 Empréstimo de {} captado de {} ({} meses)",
            loan_amount, investor_name, duration_months
        );

        Ok(loan.into())
    }

    pub async fn list_loans<'e, E>(&self, executor: E) -> Result<Vec<LoanView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loans = self.repo.list_loans(executor).await?;
        Ok(loans.into_iter().map(LoanView::from).collect())
    }

    pub async fn get_loan_detail<'e, E>(
        &self,
        executor: E,
        loan_id: Uuid,
    ) -> Result<LoanDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let loan = self.repo
            .get_loan(&mut *tx, loan_id)
            .await?
            .ok_or(AppError::LoanNotFound)?;

        let payments = self.repo.list_payments(&mut *tx, loan_id).await?;

        tx.commit().await?;

        Ok(LoanDetail { header: loan.into(), payments })
    }

    /// Registra um pagamento: precisa caber no saldo devedor. Zerou o saldo,
    /// o empréstimo é concluído na mesma transação.
    pub async fn record_payment<'e, E>(
        &self,
        executor: E,
        loan_id: Uuid,
        amount: Decimal,
        notes: Option<&str>,
    ) -> Result<(LoanPayment, LoanView), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let loan = self.repo
            .get_loan(&mut *tx, loan_id)
            .await?
            .ok_or(AppError::LoanNotFound)?;

        if loan.status != LoanStatus::Active {
            return Err(AppError::LoanNotPayable);
        }

        ledger::validate_loan_payment(amount, loan.remaining_amount())?;

        let payment = self.repo.add_payment(&mut *tx, loan_id, amount, notes).await?;
        let mut updated = self.repo.add_to_paid_amount(&mut *tx, loan_id, amount).await?;

        if updated.remaining_amount().is_zero() {
            updated = self.repo.update_status(&mut *tx, loan_id, LoanStatus::Completed).await?;
            tracing::info!("✅ Empréstimo {} quitado por completo", loan_id);
        }

        tx.commit().await?;

        Ok((payment, updated.into()))
    }

    /// Transição administrativa de status. "Concluído" não entra aqui:
    /// só se chega lá quitando o saldo.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        loan_id: Uuid,
        status: LoanStatus,
    ) -> Result<LoanView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if status == LoanStatus::Completed {
            return Err(AppError::LoanStatusNotAllowed);
        }

        let mut tx = executor.begin().await?;

        let loan = self.repo
            .get_loan(&mut *tx, loan_id)
            .await?
            .ok_or(AppError::LoanNotFound)?;

        if loan.status == LoanStatus::Completed {
            return Err(AppError::LoanStatusNotAllowed);
        }

        let updated = self.repo.update_status(&mut *tx, loan_id, status).await?;

        tx.commit().await?;

        Ok(updated.into())
    }
}
