pub mod announcement;
pub mod device_token;
pub mod errors;
pub mod issue;
pub mod notifications;
pub mod payment;
pub mod user;
