pub mod authentication;
pub mod config;
pub mod formatting;
pub mod requests;
pub mod responses;
pub mod token_validation;
