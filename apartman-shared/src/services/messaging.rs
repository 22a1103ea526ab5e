use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::models::errors::NotificationError;
use crate::models::notifications::{
    BatchSendOutcome, FirebaseClaims, PushMessage, SendErrorCode, SendResponse, ServiceAccountKey,
    TokenResponse,
};

/// Concurrent in-flight sends per dispatch; FCM v1 has no batch endpoint, so
/// one logical send fans out into bounded per-token requests.
const SEND_CONCURRENCY: usize = 8;

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Provider seam for push delivery. One call per dispatch; the outcome
/// carries per-token results in message order.
#[async_trait]
pub trait PushMessenger: Send + Sync {
    async fn send_each(
        &self,
        messages: &[PushMessage],
    ) -> Result<BatchSendOutcome, NotificationError>;
}

/// FCM HTTP v1 client holding the service account and a cached OAuth token.
/// One instance per runtime; pass it into handlers explicitly.
pub struct FcmMessenger {
    key: ServiceAccountKey,
    http: reqwest::Client,
    cached_token: Arc<RwLock<Option<(String, DateTime<Utc>)>>>,
}

impl FcmMessenger {
    pub fn new(key_path: &str) -> Self {
        let key = load_service_account_key(key_path);
        Self {
            key,
            http: reqwest::Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    async fn get_access_token(&self) -> Result<String, NotificationError> {
        let refresh_margin = Duration::minutes(5);
        let now = Utc::now();

        let mut guard = self.cached_token.write().await;
        if let Some((token, expiry)) = guard.as_ref() {
            if *expiry - refresh_margin > now {
                return Ok(token.clone());
            }
            log::info!("[Push] FCM token near expiry, refreshing");
        }

        let jwt = create_jwt(&self.key)?;
        let token = self.exchange_jwt_for_token(&jwt).await?;

        let expiry = Utc::now() + Duration::minutes(50);
        *guard = Some((token.clone(), expiry));
        log::info!("[Push] New FCM access token cached (valid until {})", expiry);

        Ok(token)
    }

    async fn exchange_jwt_for_token(&self, jwt: &str) -> Result<String, NotificationError> {
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt),
        ];

        let res = self.http.post(&self.key.token_uri).form(&params).send().await?;

        if !res.status().is_success() {
            let body = res.text().await?;
            return Err(NotificationError::TokenExchangeFailed(format!(
                "Token exchange failed: {}",
                body
            )));
        }

        let token_response: TokenResponse = res.json().await?;
        Ok(token_response.access_token)
    }

    async fn send_one(&self, access_token: &str, message: &PushMessage) -> SendResponse {
        let url = format!(
            "https://fcm.googleapis.com/v1/projects/{}/messages:send",
            self.key.project_id
        );

        let result = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&message.to_fcm_json())
            .send()
            .await;

        match result {
            Ok(res) if res.status().is_success() => SendResponse {
                token: message.token.clone(),
                success: true,
                error: None,
            },
            Ok(res) => {
                let status = res.status();
                let body: Value = res.json().await.unwrap_or(Value::Null);
                let code = map_fcm_error(status, &body);
                log::warn!(
                    "[Push] Send failed with {} for ...{}: {:?}",
                    status,
                    crate::models::device_token::token_tail(&message.token),
                    code
                );
                SendResponse {
                    token: message.token.clone(),
                    success: false,
                    error: Some(code),
                }
            }
            Err(e) => {
                log::warn!("[Push] Network error during send: {}", e);
                SendResponse {
                    token: message.token.clone(),
                    success: false,
                    error: Some(SendErrorCode::Unavailable),
                }
            }
        }
    }
}

#[async_trait]
impl PushMessenger for FcmMessenger {
    async fn send_each(
        &self,
        messages: &[PushMessage],
    ) -> Result<BatchSendOutcome, NotificationError> {
        if messages.is_empty() {
            return Ok(BatchSendOutcome::default());
        }

        let access_token = self.get_access_token().await?;

        let sends: Vec<_> = messages
            .iter()
            .map(|message| self.send_one(&access_token, message))
            .collect();
        let responses: Vec<SendResponse> = stream::iter(sends)
            .buffered(SEND_CONCURRENCY)
            .collect()
            .await;

        let success_count = responses.iter().filter(|r| r.success).count();
        Ok(BatchSendOutcome {
            success_count,
            failure_count: responses.len() - success_count,
            responses,
        })
    }
}

/// Maps an FCM v1 error response to a per-token error code. UNREGISTERED
/// (usually a 404) and INVALID_ARGUMENT mark the registration as dead.
fn map_fcm_error(status: reqwest::StatusCode, body: &Value) -> SendErrorCode {
    let error_code = body["error"]["details"]
        .as_array()
        .and_then(|details| {
            details
                .iter()
                .find_map(|d| d["errorCode"].as_str())
        })
        .or_else(|| body["error"]["status"].as_str());

    match error_code {
        Some("UNREGISTERED") | Some("NOT_FOUND") => SendErrorCode::Unregistered,
        Some("INVALID_ARGUMENT") => SendErrorCode::InvalidToken,
        Some("UNAVAILABLE") | Some("QUOTA_EXCEEDED") => SendErrorCode::Unavailable,
        Some("INTERNAL") => SendErrorCode::Internal,
        Some(other) => SendErrorCode::Other(other.to_string()),
        None => match status.as_u16() {
            404 => SendErrorCode::Unregistered,
            400 => SendErrorCode::InvalidToken,
            503 => SendErrorCode::Unavailable,
            500 => SendErrorCode::Internal,
            other => SendErrorCode::Other(other.to_string()),
        },
    }
}

fn load_service_account_key(path: &str) -> ServiceAccountKey {
    let data = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Unable to read key file at {}: {}", path, e));

    serde_json::from_str(&data)
        .unwrap_or_else(|e| panic!("Invalid service account JSON in {}: {}", path, e))
}

fn create_jwt(sa: &ServiceAccountKey) -> Result<String, NotificationError> {
    let now = Utc::now();
    let claims = FirebaseClaims {
        iss: &sa.client_email,
        scope: FCM_SCOPE,
        aud: &sa.token_uri,
        iat: now.timestamp(),
        exp: (now + Duration::minutes(60)).timestamp(),
    };

    let key = EncodingKey::from_rsa_pem(sa.private_key.replace("\\n", "\n").as_bytes())
        .map_err(|e| NotificationError::TokenExchangeFailed(format!("Invalid private key: {}", e)))?;

    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| NotificationError::TokenExchangeFailed(format!("JWT creation failed: {}", e)))
}
