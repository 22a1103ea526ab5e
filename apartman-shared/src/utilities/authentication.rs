use crate::models::errors::CallableError;
use crate::models::user::Role;
use crate::repositories::user_repository::UserDirectory;
use crate::utilities::config;
use crate::utilities::token_validation::validate_bearer_token;

pub struct AdminCaller {
    pub user_id: String,
}

pub struct Caller {
    pub user_id: String,
}

/// Validates the bearer token and returns the caller's id. Authentication
/// only; role checks happen against the profile store.
pub async fn require_caller(token: Option<&str>) -> Result<Caller, CallableError> {
    let token = token
        .ok_or_else(|| CallableError::Unauthenticated("İşlem için giriş yapmalısınız".to_string()))?;

    let user_pool_id = config::get_user_pool_id();
    let region = config::get_aws_region();

    let claims = validate_bearer_token(token, &user_pool_id, &region)
        .await
        .map_err(CallableError::Unauthenticated)?;

    Ok(Caller {
        user_id: claims.sub,
    })
}

/// Admin-only calls re-check the caller's profile role on every request; a
/// stale or missing profile is treated the same as a non-admin one.
pub async fn require_admin(
    token: Option<&str>,
    users: &dyn UserDirectory,
) -> Result<AdminCaller, CallableError> {
    let caller = require_caller(token).await?;

    let profile = users
        .get_profile(&caller.user_id)
        .await
        .map_err(|e| CallableError::Internal(e.to_string()))?;

    match profile {
        Some(profile) if profile.role == Role::Admin => Ok(AdminCaller {
            user_id: caller.user_id,
        }),
        _ => Err(CallableError::PermissionDenied(
            "Bu işlem için yönetici yetkisine sahip olmalısınız".to_string(),
        )),
    }
}
