pub mod account_service;
pub mod domain;
pub mod orchestrator;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use account_service::AccountService;
