pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod installments;
pub mod investors;
pub mod loans;
pub mod profits;
