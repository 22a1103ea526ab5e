use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// FCM rejects more tokens per call than this; larger fan-outs are chunked.
pub const MAX_TOKENS_PER_SEND: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    PaymentRequest,
    PaymentConfirmation,
    IssueUpdate,
    Announcement,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::PaymentRequest => "payment_request",
            NotificationType::PaymentConfirmation => "payment_confirmation",
            NotificationType::IssueUpdate => "issue_update",
            NotificationType::Announcement => "announcement",
        }
    }
}

/// Notification content plus data fields, before per-token expansion. An
/// empty title or body fails dispatch validation up front.
#[derive(Debug, Clone, Default)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, Value>,
}

impl PushPayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn has_notification(&self) -> bool {
        !self.title.trim().is_empty() && !self.body.trim().is_empty()
    }
}

/// One message per token, in the provider's wire shape. Data values are
/// already stringified and the web click target resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
    pub link: String,
}

impl PushMessage {
    pub fn to_fcm_json(&self) -> Value {
        serde_json::json!({
            "message": {
                "token": self.token,
                "notification": {
                    "title": self.title,
                    "body": self.body,
                },
                "data": self.data,
                "webpush": {
                    "fcm_options": {
                        "link": self.link,
                    }
                }
            }
        })
    }
}

/// Provider-reported outcome for a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendErrorCode {
    /// The registration no longer exists; the token must be pruned.
    Unregistered,
    /// The token is malformed as far as the provider is concerned.
    InvalidToken,
    Unavailable,
    Internal,
    Other(String),
}

impl SendErrorCode {
    /// Permanent invalidity warrants deleting the token from the registry.
    pub fn is_permanent_invalidity(&self) -> bool {
        matches!(self, SendErrorCode::Unregistered | SendErrorCode::InvalidToken)
    }
}

#[derive(Debug, Clone)]
pub struct SendResponse {
    pub token: String,
    pub success: bool,
    pub error: Option<SendErrorCode>,
}

#[derive(Debug, Default)]
pub struct BatchSendOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchError {
    pub code: String,
    pub message: String,
}

/// Result of one dispatcher call: per-token accounting plus an optional
/// batch-level error for short-circuit failures.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
    pub error: Option<DispatchError>,
}

impl DispatchSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failed_for(token_count: usize, code: &str, message: String) -> Self {
        Self {
            success_count: 0,
            failure_count: token_count,
            responses: Vec::new(),
            error: Some(DispatchError {
                code: code.to_string(),
                message,
            }),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ServiceAccountKey {
    pub private_key: String,
    pub client_email: String,
    pub token_uri: String,
    pub project_id: String,
}

#[derive(Serialize)]
pub struct FirebaseClaims<'a> {
    pub iss: &'a str,
    pub scope: &'a str,
    pub aud: &'a str,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}
