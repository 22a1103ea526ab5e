use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::errors::DynamoDbError;

/// Coarse failure taxonomy shared across the notification and callable layers.
/// Callers decide whether to aggregate, log, or propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    ProviderFailure,
    NotFound,
    PermissionDenied,
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("FCM push failed: {0}")]
    FcmPushFailed(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl NotificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotificationError::InvalidPayload(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::ProviderFailure,
        }
    }

    /// Stable code carried in dispatch results for short-circuit failures.
    pub fn code(&self) -> &'static str {
        match self {
            NotificationError::InvalidPayload(_) => "invalid-payload",
            NotificationError::FcmPushFailed(_) => "send-failed",
            NotificationError::TokenExchangeFailed(_) => "token-exchange-failed",
            NotificationError::Http(_) => "network-error",
        }
    }
}

/// Errors surfaced by the admin-only callable endpoints. The standard codes
/// mirror what the client already handles.
#[derive(Debug, Error)]
pub enum CallableError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal: {0}")]
    Internal(String),
}

impl CallableError {
    pub fn code(&self) -> &'static str {
        match self {
            CallableError::Unauthenticated(_) => "unauthenticated",
            CallableError::PermissionDenied(_) => "permission-denied",
            CallableError::InvalidArgument(_) => "invalid-argument",
            CallableError::NotFound(_) => "not-found",
            CallableError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CallableError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            CallableError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            CallableError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CallableError::NotFound(_) => StatusCode::NOT_FOUND,
            // Operational failures keep the structured { success: false } body
            // instead of an HTTP-level error.
            CallableError::Internal(_) => StatusCode::OK,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CallableError::Unauthenticated(_) | CallableError::PermissionDenied(_) => {
                ErrorKind::PermissionDenied
            }
            CallableError::InvalidArgument(_) => ErrorKind::InvalidInput,
            CallableError::NotFound(_) => ErrorKind::NotFound,
            CallableError::Internal(_) => ErrorKind::ProviderFailure,
        }
    }
}

impl From<DynamoDbError> for CallableError {
    fn from(err: DynamoDbError) -> Self {
        CallableError::Internal(err.to_string())
    }
}
