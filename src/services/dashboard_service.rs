// src/services/dashboard_service.rs

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::{DashboardSummary, ReceiptsChartEntry, TopDebtorEntry},
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn get_summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.repo.get_summary(executor).await
    }

    pub async fn get_receipts_chart<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<ReceiptsChartEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.get_receipts_last_30_days(executor).await
    }

    pub async fn get_top_debtors<'e, E>(&self, executor: E) -> Result<Vec<TopDebtorEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.get_top_debtors(executor).await
    }
}
