// src/services/installment_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, InstallmentRepository},
    models::installment::{
        InstallmentPlan, InstallmentRecord, InstallmentRecordView, InstallmentStatus,
        InstallmentUnit, PaymentAdjustment, PaymentResult, PlanDetail, PlanStatus, PlanSummary,
    },
    services::ledger::{self, ScheduleParams},
};

#[derive(Clone)]
pub struct InstallmentService {
    repo: InstallmentRepository,
    customer_repo: CustomerRepository,
}

impl InstallmentService {
    pub fn new(repo: InstallmentRepository, customer_repo: CustomerRepository) -> Self {
        Self { repo, customer_repo }
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    /// Cria o plano e gera o cronograma completo numa única transação.
    pub async fn create_plan<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        product_name: &str,
        product_description: Option<&str>,
        total_amount: Decimal,
        advance_amount: Decimal,
        installment_count: u32,
        installment_unit: InstallmentUnit,
        start_date: NaiveDate,
        due_day: u32,
    ) -> Result<PlanDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // O cronograma inteiro é derivado ANTES de abrir a transação:
        // se os parâmetros são inválidos, nada toca o banco.
        let schedule = ledger::build_schedule(&ScheduleParams {
            total_amount,
            advance_amount,
            installment_count,
            start_date,
            due_day,
        })?;

        let mut tx = executor.begin().await?;

        let customer = self.customer_repo
            .get_customer(&mut *tx, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let per_installment_amount =
            ledger::per_installment_amount(total_amount, advance_amount, installment_count);

        let plan = self.repo.create_plan(
            &mut *tx,
            customer_id,
            product_name,
            product_description,
            total_amount,
            advance_amount,
            installment_count as i32,
            installment_unit,
            per_installment_amount,
            start_date,
            due_day as i32,
        ).await?;

        let mut records = Vec::with_capacity(schedule.len());
        for entry in &schedule {
            let record = self.repo.insert_record(
                &mut *tx,
                plan.id,
                entry.installment_number,
                entry.amount,
                entry.due_date,
            ).await?;
            records.push(record);
        }

        tx.commit().await?;

        tracing::info!(
            "📋 Plano criado para {}: {} parcelas de {}",
            customer.full_name, installment_count, per_installment_amount
        );

        Ok(Self::into_detail(plan, customer.full_name, records))
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list_plans<'e, E>(&self, executor: E) -> Result<Vec<PlanSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_plan_summaries(executor).await
    }

    pub async fn get_plan_detail<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
    ) -> Result<PlanDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let plan = self.repo
            .get_plan(&mut *tx, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let customer = self.customer_repo
            .get_customer(&mut *tx, plan.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let records = self.repo.list_records(&mut *tx, plan_id).await?;

        tx.commit().await?;

        Ok(Self::into_detail(plan, customer.full_name, records))
    }

    // =========================================================================
    //  EDIÇÃO
    // =========================================================================

    /// Edita valores do plano e redistribui o novo saldo apenas sobre as
    /// parcelas pendentes. As quitadas ficam como estão.
    pub async fn update_plan<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        product_name: &str,
        product_description: Option<&str>,
        total_amount: Decimal,
        advance_amount: Decimal,
    ) -> Result<PlanDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let plan = self.repo
            .get_plan(&mut *tx, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        ledger::validate_plan_terms(
            total_amount,
            advance_amount,
            plan.installment_count as u32,
            plan.due_day as u32,
        )?;

        let paid_sum = self.repo.paid_sum(&mut *tx, plan_id).await?;

        // O novo acordo precisa ao menos cobrir o que já entrou no caixa
        if total_amount - advance_amount < paid_sum {
            return Err(AppError::PlanAmountBelowPaid);
        }

        let remaining_count = self.repo.pending_count(&mut *tx, plan_id).await?;
        let new_per = ledger::remaining_per_installment(
            total_amount,
            advance_amount,
            paid_sum,
            remaining_count as u32,
        );

        if remaining_count > 0 {
            self.repo.set_pending_amounts(&mut *tx, plan_id, new_per).await?;
        }

        let updated = self.repo.update_plan_amounts(
            &mut *tx,
            plan_id,
            product_name,
            product_description,
            total_amount,
            advance_amount,
            new_per,
        ).await?;

        let customer = self.customer_repo
            .get_customer(&mut *tx, updated.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let records = self.repo.list_records(&mut *tx, plan_id).await?;

        tx.commit().await?;

        Ok(Self::into_detail(updated, customer.full_name, records))
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    /// Prévia da redistribuição: só calcula, não grava nada.
    pub async fn preview_payment<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        installment_number: i32,
        custom_amount: Decimal,
    ) -> Result<PaymentAdjustment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let record = self.repo
            .get_record_by_number(&mut *tx, plan_id, installment_number)
            .await?
            .ok_or(AppError::InstallmentNotFound)?;

        if record.status == InstallmentStatus::Paid {
            return Err(AppError::InstallmentAlreadyPaid);
        }

        let remaining = self.repo
            .pending_count_after(&mut *tx, plan_id, installment_number)
            .await?;

        tx.commit().await?;

        Ok(ledger::distribute_payment_difference(custom_amount, record.amount, remaining))
    }

    /// Registra o recebimento de uma parcela. Se o valor difere do nominal,
    /// a diferença é redistribuída nas pendentes posteriores: tudo na mesma
    /// transação, para o cronograma nunca ficar pela metade.
    pub async fn record_payment<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        installment_number: i32,
        custom_amount: Decimal,
        payment_method: &str,
        notes: Option<&str>,
    ) -> Result<PaymentResult, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if custom_amount <= Decimal::ZERO {
            return Err(AppError::InvalidPaymentAmount);
        }

        let mut tx = executor.begin().await?;

        let plan = self.repo
            .get_plan(&mut *tx, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        if plan.status == PlanStatus::Cancelled {
            return Err(AppError::PlanCancelled);
        }

        let record = self.repo
            .get_record_by_number(&mut *tx, plan_id, installment_number)
            .await?
            .ok_or(AppError::InstallmentNotFound)?;

        if record.status == InstallmentStatus::Paid {
            return Err(AppError::InstallmentAlreadyPaid);
        }

        let remaining = self.repo
            .pending_count_after(&mut *tx, plan_id, installment_number)
            .await?;

        let adjustment =
            ledger::distribute_payment_difference(custom_amount, record.amount, remaining);

        let today = Utc::now().date_naive();
        let paid_record = self.repo.mark_record_paid(
            &mut *tx,
            record.id,
            custom_amount,
            today,
            payment_method,
            notes,
        ).await?;

        if !adjustment.adjustment_per_installment.is_zero() {
            self.repo.adjust_pending_after(
                &mut *tx,
                plan_id,
                installment_number,
                adjustment.adjustment_per_installment,
            ).await?;
        }

        if !adjustment.unallocated_difference.is_zero() {
            // Sem parcelas restantes: o operador precisa ver essa sobra
            tracing::warn!(
                "💸 Diferença de {} sem parcelas para redistribuir no plano {}",
                adjustment.unallocated_difference, plan_id
            );
        }

        // Última pendente quitada? O plano está concluído.
        let still_pending = self.repo.pending_count(&mut *tx, plan_id).await?;
        let plan_status = if still_pending == 0 {
            self.repo.update_plan_status(&mut *tx, plan_id, PlanStatus::Completed).await?;
            PlanStatus::Completed
        } else {
            plan.status
        };

        tx.commit().await?;

        Ok(PaymentResult { record: paid_record, adjustment, plan_status })
    }

    /// Cancela um plano ativo. O que já foi pago fica no histórico;
    /// as pendentes deixam de ser cobradas.
    pub async fn cancel_plan<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
    ) -> Result<PlanDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let plan = self.repo
            .get_plan(&mut *tx, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        match plan.status {
            PlanStatus::Cancelled => return Err(AppError::PlanCancelled),
            PlanStatus::Completed => return Err(AppError::PlanAlreadyCompleted),
            PlanStatus::Active => {}
        }

        self.repo.update_plan_status(&mut *tx, plan_id, PlanStatus::Cancelled).await?;

        let customer = self.customer_repo
            .get_customer(&mut *tx, plan.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let records = self.repo.list_records(&mut *tx, plan_id).await?;
        let updated = self.repo
            .get_plan(&mut *tx, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        tx.commit().await?;

        Ok(Self::into_detail(updated, customer.full_name, records))
    }

    /// Estorno administrativo: parcela quitada volta a pendente.
    pub async fn mark_unpaid<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        installment_number: i32,
    ) -> Result<InstallmentRecord, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let plan = self.repo
            .get_plan(&mut *tx, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let record = self.repo
            .get_record_by_number(&mut *tx, plan_id, installment_number)
            .await?
            .ok_or(AppError::InstallmentNotFound)?;

        if record.status != InstallmentStatus::Paid {
            return Err(AppError::InstallmentNotPaid);
        }

        let reverted = self.repo.mark_record_unpaid(&mut *tx, record.id).await?;

        // Plano concluído volta a ativo ao reabrir uma parcela
        if plan.status == PlanStatus::Completed {
            self.repo.update_plan_status(&mut *tx, plan_id, PlanStatus::Active).await?;
        }

        tx.commit().await?;

        Ok(reverted)
    }

    fn into_detail(
        plan: InstallmentPlan,
        customer_name: String,
        records: Vec<InstallmentRecord>,
    ) -> PlanDetail {
        let today = Utc::now().date_naive();
        let records = records
            .into_iter()
            .map(|record| InstallmentRecordView {
                display_status: record.display_status(today),
                record,
            })
            .collect();

        PlanDetail { header: plan, customer_name, records }
    }
}
