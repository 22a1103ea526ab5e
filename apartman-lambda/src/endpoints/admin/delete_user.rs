use http::Response;
use lambda_http::{Body, Request};
use serde_json::Value;

use apartman_shared::models::errors::CallableError;
use apartman_shared::services::cognito_services::{delete_auth_user, get_cognito_client};
use apartman_shared::utilities::authentication::require_admin;
use apartman_shared::utilities::requests::extract_bearer_token;
use apartman_shared::utilities::responses::{callable_failure, callable_success};

/// Removes the auth record only. The profile document is deleted by the
/// admin UI in its own flow.
pub async fn handler(event: Request, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let token = extract_bearer_token(&event);
    let user_id = body.get("user_id").and_then(|v| v.as_str());

    match delete_user(token, user_id).await {
        Ok(message) => callable_success(message),
        Err(err) => {
            log::error!("delete_user: {}", err);
            callable_failure(&err)
        }
    }
}

async fn delete_user(token: Option<&str>, user_id: Option<&str>) -> Result<String, CallableError> {
    let users = super::user_directory().await;
    let caller = require_admin(token, &users).await?;

    let user_id = user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CallableError::InvalidArgument("Kullanıcı ID gereklidir".to_string()))?;

    let client = get_cognito_client().await;
    delete_auth_user(&client, user_id).await?;

    log::info!(
        "Kullanıcının ({}) kimlik kaydı silindi, işlemi yapan: {}",
        user_id,
        caller.user_id
    );
    Ok("Kullanıcının kimlik kaydı silindi".to_string())
}
