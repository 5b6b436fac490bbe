//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Lida com o Result retornado por AppState::new()
    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Define as rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let customer_routes = Router::new()
        .route("/"
               ,post(handlers::customers::create_customer)
               .get(handlers::customers::list_customers)
        )
        .route("/{id}"
               ,get(handlers::customers::get_customer)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let installment_routes = Router::new()
        .route("/"
               ,post(handlers::installments::create_plan)
               .get(handlers::installments::list_plans)
        )
        .route("/{id}"
               ,get(handlers::installments::get_plan)
               .put(handlers::installments::update_plan)
        )
        .route("/{id}/cancel"
               ,post(handlers::installments::cancel_plan)
        )
        // Recebimento de parcela (com redistribuição de diferença)
        .route("/{id}/payments"
               ,post(handlers::installments::record_payment)
        )
        .route("/{id}/payments/preview"
               ,post(handlers::installments::preview_payment)
        )
        // Estorno administrativo
        .route("/{id}/records/{number}/unpay"
               ,post(handlers::installments::mark_unpaid)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let loan_routes = Router::new()
        .route("/"
               ,post(handlers::loans::create_loan)
               .get(handlers::loans::list_loans)
        )
        .route("/{id}"
               ,get(handlers::loans::get_loan)
        )
        .route("/{id}/payments"
               ,post(handlers::loans::record_payment)
        )
        .route("/{id}/status"
               ,put(handlers::loans::update_status)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let investor_routes = Router::new()
        .route("/"
               ,post(handlers::investors::create_investor)
               .get(handlers::investors::list_investors)
        )
        .route("/{id}"
               ,get(handlers::investors::get_investor)
        )
        .route("/{id}/profits"
               ,get(handlers::investors::list_profits)
               .put(handlers::investors::update_profit)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let profit_routes = Router::new()
        // O operador revisa a prévia antes de confirmar o rateio
        .route("/preview", post(handlers::profits::preview_distribution))
        .route("/distribute", post(handlers::profits::distribute))
        .route("/", get(handlers::profits::list_distributions))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/receipts-chart", get(handlers::dashboard::get_receipts_chart))
        .route("/top-debtors", get(handlers::dashboard::get_top_debtors))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/installments", installment_routes)
        .nest("/api/loans", loan_routes)
        .nest("/api/investors", investor_routes)
        .nest("/api/profits", profit_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
