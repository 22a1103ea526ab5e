use aws_sdk_cognitoidentityprovider::types::AttributeType;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;

use crate::models::errors::CallableError;
use crate::utilities::config;

pub async fn get_cognito_client() -> CognitoClient {
    let config = aws_config::load_from_env().await;
    CognitoClient::new(&config)
}

/// Marks the auth record as an admin. The profile document's `role` field is
/// maintained separately by the admin UI.
pub async fn set_admin_claim(client: &CognitoClient, user_id: &str) -> Result<(), CallableError> {
    let user_pool_id = config::get_user_pool_id();

    let attribute = AttributeType::builder()
        .name("custom:role")
        .value("admin")
        .build()
        .map_err(|e| CallableError::Internal(format!("Failed to build attribute: {}", e)))?;

    client
        .admin_update_user_attributes()
        .user_pool_id(user_pool_id)
        .username(user_id)
        .user_attributes(attribute)
        .send()
        .await
        .map_err(|err| {
            let service_error = err.into_service_error();
            if service_error.is_user_not_found_exception() {
                CallableError::NotFound("Kullanıcı bulunamadı".to_string())
            } else {
                CallableError::Internal(format!("Failed to set admin role: {}", service_error))
            }
        })?;

    Ok(())
}

pub async fn delete_auth_user(client: &CognitoClient, user_id: &str) -> Result<(), CallableError> {
    let user_pool_id = config::get_user_pool_id();

    client
        .admin_delete_user()
        .user_pool_id(user_pool_id)
        .username(user_id)
        .send()
        .await
        .map_err(|err| {
            let service_error = err.into_service_error();
            if service_error.is_user_not_found_exception() {
                CallableError::NotFound("Kullanıcı bulunamadı".to_string())
            } else {
                CallableError::Internal(format!("Failed to delete auth user: {}", service_error))
            }
        })?;

    Ok(())
}

pub async fn set_user_password(
    client: &CognitoClient,
    user_id: &str,
    new_password: &str,
) -> Result<(), CallableError> {
    let user_pool_id = config::get_user_pool_id();

    client
        .admin_set_user_password()
        .user_pool_id(user_pool_id)
        .username(user_id)
        .password(new_password)
        .permanent(true)
        .send()
        .await
        .map_err(|err| {
            let service_error = err.into_service_error();
            if service_error.is_user_not_found_exception() {
                CallableError::NotFound("Kullanıcı bulunamadı".to_string())
            } else {
                CallableError::Internal(format!("Failed to set password: {}", service_error))
            }
        })?;

    Ok(())
}

/// Rewrites the phone-derived login email on the auth record.
pub async fn update_login_email(
    client: &CognitoClient,
    user_id: &str,
    new_email: &str,
) -> Result<(), CallableError> {
    let user_pool_id = config::get_user_pool_id();

    let email = AttributeType::builder()
        .name("email")
        .value(new_email)
        .build()
        .map_err(|e| CallableError::Internal(format!("Failed to build attribute: {}", e)))?;
    let verified = AttributeType::builder()
        .name("email_verified")
        .value("true")
        .build()
        .map_err(|e| CallableError::Internal(format!("Failed to build attribute: {}", e)))?;

    client
        .admin_update_user_attributes()
        .user_pool_id(user_pool_id)
        .username(user_id)
        .user_attributes(email)
        .user_attributes(verified)
        .send()
        .await
        .map_err(|err| {
            let service_error = err.into_service_error();
            if service_error.is_user_not_found_exception() {
                CallableError::NotFound("Kullanıcı bulunamadı".to_string())
            } else {
                CallableError::Internal(format!("Failed to update email: {}", service_error))
            }
        })?;

    Ok(())
}
