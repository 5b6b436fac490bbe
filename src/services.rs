pub mod auth;
pub mod customer_service;
pub mod dashboard_service;
pub mod installment_service;
pub mod investor_service;
pub mod ledger;
pub mod loan_service;
