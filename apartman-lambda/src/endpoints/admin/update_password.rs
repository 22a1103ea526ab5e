use http::Response;
use lambda_http::{Body, Request};
use serde_json::Value;

use apartman_shared::models::errors::CallableError;
use apartman_shared::repositories::user_repository::UserDirectory;
use apartman_shared::services::cognito_services::{get_cognito_client, set_user_password};
use apartman_shared::utilities::authentication::require_admin;
use apartman_shared::utilities::requests::extract_bearer_token;
use apartman_shared::utilities::responses::{callable_failure, callable_success};

const MIN_PASSWORD_LEN: usize = 6;

pub async fn handler(event: Request, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let token = extract_bearer_token(&event);
    let user_id = body.get("user_id").and_then(|v| v.as_str());
    let new_password = body.get("new_password").and_then(|v| v.as_str());

    match update_password(token, user_id, new_password).await {
        Ok(message) => callable_success(message),
        Err(err) => {
            log::error!("update_password: {}", err);
            callable_failure(&err)
        }
    }
}

async fn update_password(
    token: Option<&str>,
    user_id: Option<&str>,
    new_password: Option<&str>,
) -> Result<String, CallableError> {
    let users = super::user_directory().await;
    require_admin(token, &users).await?;

    let user_id = user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CallableError::InvalidArgument("Kullanıcı ID gereklidir".to_string()))?;
    let new_password = new_password
        .filter(|p| p.chars().count() >= MIN_PASSWORD_LEN)
        .ok_or_else(|| {
            CallableError::InvalidArgument(
                "Geçerli bir şifre sağlanmalıdır (en az 6 karakter)".to_string(),
            )
        })?;

    // The profile must exist; a bare auth record without one is an orphan.
    if users.get_profile(user_id).await?.is_none() {
        return Err(CallableError::NotFound("Kullanıcı bulunamadı".to_string()));
    }

    let client = get_cognito_client().await;
    set_user_password(&client, user_id, new_password).await?;

    log::info!("Kullanıcının ({}) şifresi güncellendi", user_id);
    Ok("Şifre başarıyla güncellendi".to_string())
}
