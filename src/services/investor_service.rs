// src/services/investor_service.rs

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, rounding},
    db::InvestorRepository,
    models::investor::{
        DistributionDetail, DistributionPreview, Investor, InvestorProfitEntry, InvestorView,
    },
    services::ledger,
};

#[derive(Clone)]
pub struct InvestorService {
    repo: InvestorRepository,
}

impl InvestorService {
    pub fn new(repo: InvestorRepository) -> Self {
        Self { repo }
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
        self.repo.create_investor(executor, name, contact, investment_amount).await
    }

    pub async fn list_investors<'e, E>(&self, executor: E) -> Result<Vec<InvestorView>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let investors = self.repo.list_investors(&mut *tx).await?;
        let total_investment = self.repo.total_investment(&mut *tx).await?;

        let mut views = Vec::with_capacity(investors.len());
        for investor in investors {
            views.push(self.build_view(&mut *tx, investor, total_investment).await?);
        }

        tx.commit().await?;

        Ok(views)
    }

    pub async fn get_investor<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<InvestorView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let investor = self.repo
            .get_investor(&mut *tx, id)
            .await?
            .ok_or(AppError::InvestorNotFound)?;

        let total_investment = self.repo.total_investment(&mut *tx).await?;
        let view = self.build_view(&mut *tx, investor, total_investment).await?;

        tx.commit().await?;

        Ok(view)
    }

    pub async fn list_profit_history<'e, E>(
        &self,
        executor: E,
        investor_id: Uuid,
    ) -> Result<Vec<InvestorProfitEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.repo
            .get_investor(&mut *tx, investor_id)
            .await?
            .ok_or(AppError::InvestorNotFound)?;

        let entries = self.repo.list_profit_entries(&mut *tx, investor_id).await?;

        tx.commit().await?;

        Ok(entries)
    }

    /// Lança (ou substitui) o lucro de um investidor numa competência.
    pub async fn update_profit<'e, E>(
        &self,
        executor: E,
        investor_id: Uuid,
        month: &str,
        profit: Decimal,
    ) -> Result<InvestorProfitEntry, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.repo
            .get_investor(&mut *tx, investor_id)
            .await?
            .ok_or(AppError::InvestorNotFound)?;

        let entry = self.repo.upsert_profit_entry(&mut *tx, investor_id, month, profit).await?;

        tx.commit().await?;

        Ok(entry)
    }

    // =========================================================================
    //  RATEIO DE LUCROS
    // =========================================================================

    /// Prévia do rateio: o operador revisa antes de confirmar. Nada persiste.
    pub async fn preview_distribution<'e, E>(
        &self,
        executor: E,
        total_profit: Decimal,
        total_expenses: Decimal,
    ) -> Result<DistributionPreview, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let net = ledger::net_profit(total_profit, total_expenses)?;

        let investors = self.repo.list_investors(executor).await?;
        let entries: Vec<(Uuid, String, Decimal)> = investors
            .iter()
            .map(|i| (i.id, i.name.clone(), i.investment_amount))
            .collect();

        let (total_investment, distribution) = ledger::distribute_profit(net, &entries)?;

        Ok(DistributionPreview {
            total_profit,
            total_expenses,
            net_profit: net,
            total_investment,
            distribution,
        })
    }

    /// Confirma o rateio: grava a rodada, os itens e o lançamento mensal de
    /// cada investidor numa única transação.
    pub async fn distribute<'e, E>(
        &self,
        executor: E,
        total_profit: Decimal,
        total_expenses: Decimal,
        month: Option<&str>,
    ) -> Result<DistributionDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let net = ledger::net_profit(total_profit, total_expenses)?;
        let month = month.map(str::to_owned).unwrap_or_else(current_month_key);

        let mut tx = executor.begin().await?;

        let investors = self.repo.list_investors(&mut *tx).await?;
        let entries: Vec<(Uuid, String, Decimal)> = investors
            .iter()
            .map(|i| (i.id, i.name.clone(), i.investment_amount))
            .collect();

        let (total_investment, shares) = ledger::distribute_profit(net, &entries)?;

        let run = self.repo.create_distribution(
            &mut *tx,
            &month,
            total_profit,
            total_expenses,
            net,
            total_investment,
        ).await?;

        let mut items = Vec::with_capacity(shares.len());
        for share in &shares {
            let item = self.repo.insert_distribution_item(
                &mut *tx,
                run.id,
                share.investor_id,
                share.ratio,
                share.profit_amount,
            ).await?;

            // O histórico mensal do investidor acompanha a rodada
            self.repo.upsert_profit_entry(
                &mut *tx,
                share.investor_id,
                &month,
                share.profit_amount,
            ).await?;

            items.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            "💰 Lucro de {} rateado entre {} investidores na competência {}",
            net, shares.len(), month
        );

        Ok(DistributionDetail { header: run, items })
    }

    pub async fn list_distributions<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<DistributionDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let runs = self.repo.list_distributions(&mut *tx).await?;

        let mut details = Vec::with_capacity(runs.len());
        for run in runs {
            let items = self.repo.list_distribution_items(&mut *tx, run.id).await?;
            details.push(DistributionDetail { header: run, items });
        }

        tx.commit().await?;

        Ok(details)
    }

    // =========================================================================
    //  DERIVADOS
    // =========================================================================

    // Roda dentro da transação de quem chama (daí o &mut PgConnection)
    async fn build_view(
        &self,
        conn: &mut sqlx::PgConnection,
        investor: Investor,
        total_investment: Decimal,
    ) -> Result<InvestorView, AppError> {
        let current = self.repo
            .profit_for_month(&mut *conn, investor.id, &current_month_key())
            .await?;
        let previous = self.repo
            .profit_for_month(&mut *conn, investor.id, &previous_month_key())
            .await?;
        let total_earned = self.repo.total_profit(&mut *conn, investor.id).await?;

        // Fatia do capital em %: zero capital total exibe 0, nunca divide
        let profit_percentage = if total_investment.is_zero() {
            Decimal::ZERO
        } else {
            rounding::round_money(
                investor.investment_amount / total_investment * Decimal::ONE_HUNDRED,
            )
        };

        Ok(InvestorView {
            investor,
            current_month_profit: current,
            previous_month_profit: previous,
            total_profit_earned: total_earned,
            profit_percentage,
        })
    }
}

// Competência atual no formato YYYY-MM
fn current_month_key() -> String {
    Utc::now().format("%Y-%m").to_string()
}

fn previous_month_key() -> String {
    let today = Utc::now().date_naive();
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    format!("{year:04}-{month:02}")
}
