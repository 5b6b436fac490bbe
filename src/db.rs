pub mod user_repo;
pub use user_repo::UserRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod installment_repo;
pub use installment_repo::InstallmentRepository;
pub mod loan_repo;
pub use loan_repo::LoanRepository;
pub mod investor_repo;
pub use investor_repo::InvestorRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
