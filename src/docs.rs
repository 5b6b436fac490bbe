// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Customers ---
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::get_customer,

        // --- Installments ---
        handlers::installments::create_plan,
        handlers::installments::list_plans,
        handlers::installments::get_plan,
        handlers::installments::update_plan,
        handlers::installments::cancel_plan,
        handlers::installments::record_payment,
        handlers::installments::preview_payment,
        handlers::installments::mark_unpaid,

        // --- Loans ---
        handlers::loans::create_loan,
        handlers::loans::list_loans,
        handlers::loans::get_loan,
        handlers::loans::record_payment,
        handlers::loans::update_status,

        // --- Investors ---
        handlers::investors::create_investor,
        handlers::investors::list_investors,
        handlers::investors::get_investor,
        handlers::investors::list_profits,
        handlers::investors::update_profit,

        // --- Profits ---
        handlers::profits::preview_distribution,
        handlers::profits::distribute,
        handlers::profits::list_distributions,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_receipts_chart,
        handlers::dashboard::get_top_debtors,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Customers ---
            models::customer::Customer,
            handlers::customers::CreateCustomerPayload,

            // --- Installments ---
            models::installment::InstallmentUnit,
            models::installment::PlanStatus,
            models::installment::InstallmentStatus,
            models::installment::DisplayStatus,
            models::installment::InstallmentPlan,
            models::installment::InstallmentRecord,
            models::installment::InstallmentRecordView,
            models::installment::PlanSummary,
            models::installment::PlanDetail,
            models::installment::PaymentAdjustment,
            models::installment::PaymentResult,
            handlers::installments::CreateInstallmentPlanPayload,
            handlers::installments::UpdateInstallmentPlanPayload,
            handlers::installments::RecordPaymentPayload,
            handlers::installments::PreviewPaymentPayload,

            // --- Loans ---
            models::loan::LoanStatus,
            models::loan::Loan,
            models::loan::LoanPayment,
            models::loan::LoanView,
            models::loan::LoanDetail,
            handlers::loans::CreateLoanPayload,
            handlers::loans::RecordLoanPaymentPayload,
            handlers::loans::UpdateLoanStatusPayload,
            handlers::loans::LoanPaymentResponse,

            // --- Investors ---
            models::investor::Investor,
            models::investor::InvestorProfitEntry,
            models::investor::InvestorView,
            models::investor::ProfitShare,
            models::investor::DistributionPreview,
            models::investor::ProfitDistributionRun,
            models::investor::ProfitDistributionItem,
            models::investor::DistributionDetail,
            handlers::investors::CreateInvestorPayload,
            handlers::investors::UpdateInvestorProfitPayload,
            handlers::profits::DistributeProfitPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::ReceiptsChartEntry,
            models::dashboard::TopDebtorEntry,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Customers", description = "Clientes do Crediário"),
        (name = "Installments", description = "Planos de Crediário e Parcelas"),
        (name = "Loans", description = "Empréstimos de Investidores"),
        (name = "Investors", description = "Investidores e Histórico de Lucros"),
        (name = "Profits", description = "Rateio de Lucros"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
