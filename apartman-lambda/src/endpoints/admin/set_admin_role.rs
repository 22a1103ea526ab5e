use http::Response;
use lambda_http::{Body, Request};
use serde_json::Value;

use apartman_shared::models::errors::CallableError;
use apartman_shared::services::cognito_services::{get_cognito_client, set_admin_claim};
use apartman_shared::utilities::authentication::require_admin;
use apartman_shared::utilities::requests::extract_bearer_token;
use apartman_shared::utilities::responses::{callable_failure, callable_success};

pub async fn handler(event: Request, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let token = extract_bearer_token(&event);
    let user_id = body.get("user_id").and_then(|v| v.as_str());

    match set_admin_role(token, user_id).await {
        Ok(message) => callable_success(message),
        Err(err) => {
            log::error!("set_admin_role: {}", err);
            callable_failure(&err)
        }
    }
}

async fn set_admin_role(
    token: Option<&str>,
    user_id: Option<&str>,
) -> Result<String, CallableError> {
    let users = super::user_directory().await;
    let caller = require_admin(token, &users).await?;

    let user_id = user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CallableError::InvalidArgument("Kullanıcı ID gereklidir".to_string()))?;

    let client = get_cognito_client().await;
    set_admin_claim(&client, user_id).await?;

    log::info!(
        "Kullanıcı ({}) yönetici yapıldı, işlemi yapan: {}",
        user_id,
        caller.user_id
    );
    Ok(format!("{} kullanıcısı yönetici yapıldı", user_id))
}
