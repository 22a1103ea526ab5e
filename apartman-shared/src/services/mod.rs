pub mod cognito_services;
pub mod dispatcher;
pub mod messaging;
