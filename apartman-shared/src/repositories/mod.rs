pub mod announcement_repository;
pub mod audit_log;
pub mod payment_repository;
pub mod settings_repository;
pub mod token_registry;
pub mod user_repository;
