use http::Response;
use lambda_http::{Body, Request};
use serde_json::Value;
use std::sync::Arc;

use chrono::Utc;

use apartman_shared::database::client::get_dynamodb_client;
use apartman_shared::models::device_token::{is_plausible_token, DeviceTokenRecord};
use apartman_shared::models::errors::CallableError;
use apartman_shared::repositories::token_registry::{DynamoTokenRegistry, TokenRegistry};
use apartman_shared::utilities::authentication::require_caller;
use apartman_shared::utilities::config;
use apartman_shared::utilities::requests::extract_bearer_token;
use apartman_shared::utilities::responses::{callable_failure, callable_success};

/// Registers the caller's own device token. Re-registering an existing token
/// refreshes its timestamp; the registry keeps only the newest two active.
pub async fn handler(event: Request, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let token = extract_bearer_token(&event);
    let device_token = body.get("token").and_then(|v| v.as_str());
    let device = body.get("device").and_then(|v| v.as_str()).unwrap_or("unknown");

    match register(token, device_token, device).await {
        Ok(message) => callable_success(message),
        Err(err) => {
            log::error!("register_token: {}", err);
            callable_failure(&err)
        }
    }
}

async fn register(
    token: Option<&str>,
    device_token: Option<&str>,
    device: &str,
) -> Result<String, CallableError> {
    let caller = require_caller(token).await?;

    let device_token = device_token
        .filter(|t| is_plausible_token(t))
        .ok_or_else(|| {
            CallableError::InvalidArgument("Geçerli bir cihaz token'ı sağlanmalıdır".to_string())
        })?;

    let registry = DynamoTokenRegistry::new(
        Arc::new(get_dynamodb_client().await),
        config::get_tokens_table(),
    );

    let record = DeviceTokenRecord::new(
        device_token.to_string(),
        device.to_string(),
        Utc::now(),
    );
    registry.store_token(&caller.user_id, &record).await?;

    log::info!(
        "Kullanıcı ({}) için cihaz token'ı kaydedildi ({})",
        caller.user_id,
        device
    );
    Ok("Cihaz token'ı kaydedildi".to_string())
}
