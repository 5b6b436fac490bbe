// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CustomerRepository, DashboardRepository, InstallmentRepository, InvestorRepository,
        LoanRepository, UserRepository,
    },
    services::{
        auth::AuthService, customer_service::CustomerService, dashboard_service::DashboardService,
        installment_service::InstallmentService, investor_service::InvestorService,
        loan_service::LoanService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub customer_service: CustomerService,
    pub installment_service: InstallmentService,
    pub loan_service: LoanService,
    pub investor_service: InvestorService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // A assinatura retorna um Result!
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?; // <-- Se falhar, retorna um Err em vez de dar panic ou exit

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let installment_repo = InstallmentRepository::new(db_pool.clone());
        let loan_repo = LoanRepository::new(db_pool.clone());
        let investor_repo = InvestorRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret.clone(), db_pool.clone());
        let customer_service = CustomerService::new(customer_repo.clone());
        let installment_service = InstallmentService::new(installment_repo, customer_repo);
        let loan_service = LoanService::new(loan_repo);
        let investor_service = InvestorService::new(investor_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);

        // Retorna Ok com o estado montado
        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            customer_service,
            installment_service,
            loan_service,
            investor_service,
            dashboard_service,
        })
    }
}
