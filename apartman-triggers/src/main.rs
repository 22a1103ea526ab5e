use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use apartman_shared::database::client::get_dynamodb_client;
use apartman_shared::repositories::audit_log::DynamoAuditLog;
use apartman_shared::repositories::token_registry::DynamoTokenRegistry;
use apartman_shared::repositories::user_repository::DynamoUserDirectory;
use apartman_shared::services::messaging::FcmMessenger;
use apartman_shared::utilities::config;

use crate::events::DocumentEvent;
use crate::handlers::TriggerContext;

mod events;
mod handlers;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    std::panic::set_hook(Box::new(|info| {
        log::error!("Application panicked: {}", info);
    }));

    config::init();

    let db = Arc::new(get_dynamodb_client().await);
    let ctx = Arc::new(TriggerContext {
        registry: Arc::new(DynamoTokenRegistry::new(db.clone(), config::get_tokens_table())),
        users: Arc::new(DynamoUserDirectory::new(db.clone(), config::get_users_table())),
        audit: Arc::new(DynamoAuditLog::new(
            db.clone(),
            config::get_notification_logs_table(),
            config::get_logs_table(),
        )),
        messenger: Arc::new(FcmMessenger::new(&config::get_service_account_path())),
    });

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        let ctx = ctx.clone();
        async move {
            // A malformed envelope is logged and swallowed; re-throwing would
            // make the platform retry an event we can never handle.
            match serde_json::from_value::<DocumentEvent>(event.payload) {
                Ok(document_event) => {
                    Ok::<Value, Error>(handlers::route(&ctx, document_event).await)
                }
                Err(e) => {
                    log::error!("Geçersiz tetikleyici zarfı: {}", e);
                    Ok(Value::Null)
                }
            }
        }
    }))
    .await?;

    Ok(())
}
