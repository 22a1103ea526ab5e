use std::sync::Arc;

use serde_json::{json, Value};

use apartman_shared::models::notifications::DispatchSummary;
use apartman_shared::repositories::audit_log::AuditLog;
use apartman_shared::repositories::token_registry::TokenRegistry;
use apartman_shared::repositories::user_repository::UserDirectory;
use apartman_shared::services::messaging::PushMessenger;

use crate::events::{DocumentEvent, EventKind};

pub mod announcement_broadcast;
pub mod issue_update;
pub mod payment_confirmation;
pub mod payment_request;

/// Shared handles every trigger needs. Built once at cold start.
pub struct TriggerContext {
    pub registry: Arc<dyn TokenRegistry>,
    pub users: Arc<dyn UserDirectory>,
    pub audit: Arc<dyn AuditLog>,
    pub messenger: Arc<dyn PushMessenger>,
}

/// Routes a document event to its handler. Unwatched collections and kinds
/// are acknowledged without work so the platform never retries them.
pub async fn route(ctx: &TriggerContext, event: DocumentEvent) -> Value {
    match (event.collection.as_str(), event.kind) {
        ("payments", EventKind::Created) => payment_request::handle(ctx, &event).await,
        ("payments", EventKind::Updated) => payment_confirmation::handle(ctx, &event).await,
        ("issues", EventKind::Updated) => issue_update::handle(ctx, &event).await,
        ("announcements", EventKind::Created) => {
            announcement_broadcast::handle(ctx, &event, chrono::Utc::now()).await
        }
        (collection, kind) => {
            log::info!("İşlenmeyen tetikleyici: {} / {:?}", collection, kind);
            Value::Null
        }
    }
}

pub(crate) fn summary_json(summary: &DispatchSummary) -> Value {
    json!({
        "success_count": summary.success_count,
        "failure_count": summary.failure_count,
    })
}
