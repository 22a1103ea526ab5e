use http::Response;
use lambda_http::{Body, Request};
use serde_json::Value;

use apartman_shared::models::errors::CallableError;
use apartman_shared::services::cognito_services::{get_cognito_client, update_login_email};
use apartman_shared::utilities::authentication::require_admin;
use apartman_shared::utilities::config;
use apartman_shared::utilities::requests::extract_bearer_token;
use apartman_shared::utilities::responses::{callable_failure, callable_success};

const PHONE_LEN: usize = 10;

/// Login identities are phone-derived emails, so changing the phone means
/// rewriting the email on the auth record.
pub async fn handler(event: Request, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let token = extract_bearer_token(&event);
    let user_id = body.get("user_id").and_then(|v| v.as_str());
    let new_phone = body.get("new_phone").and_then(|v| v.as_str());

    match update_phone(token, user_id, new_phone).await {
        Ok(message) => callable_success(message),
        Err(err) => {
            log::error!("update_phone: {}", err);
            callable_failure(&err)
        }
    }
}

async fn update_phone(
    token: Option<&str>,
    user_id: Option<&str>,
    new_phone: Option<&str>,
) -> Result<String, CallableError> {
    let users = super::user_directory().await;
    require_admin(token, &users).await?;

    let user_id = user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CallableError::InvalidArgument("Kullanıcı ID gereklidir".to_string()))?;
    let new_phone = new_phone
        .filter(|p| p.len() == PHONE_LEN && p.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| {
            CallableError::InvalidArgument(
                "Geçerli bir telefon numarası sağlanmalıdır (10 haneli)".to_string(),
            )
        })?;

    let new_email = format!("{}@{}", new_phone, config::get_login_email_domain());

    let client = get_cognito_client().await;
    update_login_email(&client, user_id, &new_email).await?;

    log::info!(
        "Kullanıcının ({}) giriş e-postası {} olarak güncellendi",
        user_id,
        new_email
    );
    Ok("Telefon numarası başarıyla güncellendi".to_string())
}
