use serde_json::Value;

use apartman_shared::models::issue::{status_label, Issue};
use apartman_shared::models::notifications::{NotificationType, PushPayload};
use apartman_shared::repositories::token_registry::get_user_tokens;
use apartman_shared::services::dispatcher::send_notifications_and_cleanup;

use crate::events::DocumentEvent;
use crate::handlers::{summary_json, TriggerContext};

/// Issue update. Notifies the reporter when the status value changes; any
/// other edit (description, admin note) stays quiet.
pub async fn handle(ctx: &TriggerContext, event: &DocumentEvent) -> Value {
    let Some(after) = event.after_as::<Issue>() else {
        return Value::Null;
    };
    let before_status = event
        .before_as::<Issue>()
        .map(|before| before.status)
        .unwrap_or_default();

    if before_status == after.status {
        return Value::Null;
    }

    if after.user_id.is_empty() {
        log::warn!("Arıza güncellemesi ({}): kullanıcı id'si yok", event.document_id);
        return Value::Null;
    }

    let tokens = get_user_tokens(ctx.registry.as_ref(), &after.user_id).await;
    if tokens.is_empty() {
        return Value::Null;
    }

    let payload = update_payload(&event.document_id, &after);
    let summary = send_notifications_and_cleanup(
        ctx.messenger.as_ref(),
        ctx.registry.as_ref(),
        &tokens,
        &payload,
        Some(&after.user_id),
    )
    .await;

    summary_json(&summary)
}

fn update_payload(issue_id: &str, issue: &Issue) -> PushPayload {
    PushPayload::new(
        "Arıza Durumu Güncellendi 🛠️",
        format!(
            "\"{}\" başlıklı talebinizin durumu '{}' olarak güncellendi.",
            issue.title_label(),
            status_label(&issue.status)
        ),
    )
    .with_data("notification_type", NotificationType::IssueUpdate.as_str())
    .with_data("related_id", issue_id)
    .with_data("click_action", "/user/issues")
}
