pub mod delete_user;
pub mod set_admin_role;
pub mod update_fee;
pub mod update_password;
pub mod update_phone;

use std::sync::Arc;

use apartman_shared::database::client::get_dynamodb_client;
use apartman_shared::repositories::user_repository::DynamoUserDirectory;
use apartman_shared::utilities::config;

pub(crate) async fn user_directory() -> DynamoUserDirectory {
    DynamoUserDirectory::new(
        Arc::new(get_dynamodb_client().await),
        config::get_users_table(),
    )
}
