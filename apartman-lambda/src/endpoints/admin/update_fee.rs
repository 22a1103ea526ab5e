use http::Response;
use lambda_http::{Body, Request};
use serde_json::Value;
use std::sync::Arc;

use apartman_shared::database::client::get_dynamodb_client;
use apartman_shared::models::errors::CallableError;
use apartman_shared::repositories::settings_repository::{DynamoSettingsStore, SettingsStore};
use apartman_shared::repositories::user_repository::UserDirectory;
use apartman_shared::utilities::authentication::require_admin;
use apartman_shared::utilities::config;
use apartman_shared::utilities::requests::extract_bearer_token;
use apartman_shared::utilities::responses::{callable_failure, callable_success};

/// Sets the building-wide dues amount the monthly job reads, then mirrors it
/// onto every profile so the client can show each user their fee.
pub async fn handler(event: Request, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let token = extract_bearer_token(&event);
    let amount = body.get("amount").and_then(|v| v.as_f64());

    match update_fee(token, amount).await {
        Ok(message) => callable_success(message),
        Err(err) => {
            log::error!("update_fee: {}", err);
            callable_failure(&err)
        }
    }
}

async fn update_fee(token: Option<&str>, amount: Option<f64>) -> Result<String, CallableError> {
    let users = super::user_directory().await;
    require_admin(token, &users).await?;

    let amount = amount
        .filter(|a| *a > 0.0)
        .ok_or_else(|| {
            CallableError::InvalidArgument("Geçerli bir aidat tutarı sağlanmalıdır".to_string())
        })?;

    let settings = DynamoSettingsStore::new(
        Arc::new(get_dynamodb_client().await),
        config::get_settings_table(),
    );
    settings.set_fee_amount(amount).await?;

    mirror_fee_to_profiles(&users, amount).await;

    log::info!("Aidat tutarı {} olarak güncellendi", amount);
    Ok("Aidat tutarı güncellendi".to_string())
}

/// Rewrites the denormalized `fee` field on every profile, admins included.
/// Best effort; the settings row is the source of truth.
async fn mirror_fee_to_profiles(users: &dyn UserDirectory, amount: f64) {
    match users.all_user_ids().await {
        Ok(user_ids) => {
            for user_id in user_ids {
                if let Err(e) = users.set_fee(&user_id, amount).await {
                    log::error!("update_fee: {} güncellenemedi: {}", user_id, e);
                }
            }
        }
        Err(e) => log::error!("update_fee: kullanıcılar okunamadı: {}", e),
    }
}
