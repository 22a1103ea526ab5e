use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde_json::{json, Value};

use apartman_shared::models::announcement::Announcement;
use apartman_shared::models::notifications::{
    NotificationType, PushPayload, MAX_TOKENS_PER_SEND,
};
use apartman_shared::models::user::UserProfile;
use apartman_shared::repositories::audit_log::NotificationLogEntry;
use apartman_shared::repositories::token_registry::get_user_tokens;
use apartman_shared::services::dispatcher::send_notifications_and_cleanup;

use crate::events::DocumentEvent;
use crate::handlers::TriggerContext;

/// New announcement. Fans the push out to every registered device in the
/// building; inactive or already-expired announcements are skipped.
pub async fn handle(ctx: &TriggerContext, event: &DocumentEvent, now: DateTime<Utc>) -> Value {
    let Some(announcement) = event.after_as::<Announcement>() else {
        return Value::Null;
    };

    if !announcement.is_broadcastable(now) {
        log::info!(
            "Duyuru ({}): pasif veya süresi dolmuş, yayın yok",
            event.document_id
        );
        return Value::Null;
    }

    let recipients = match ctx.users.residents().await {
        Ok(profiles) => profiles,
        Err(e) => {
            log::error!("Duyuru ({}): kullanıcılar okunamadı: {}", event.document_id, e);
            return Value::Null;
        }
    };

    let tokens = collect_unique_tokens(ctx, &recipients).await;
    if tokens.is_empty() {
        log::info!("Duyuru ({}): kayıtlı cihaz yok", event.document_id);
        return Value::Null;
    }

    let payload = broadcast_payload(&event.document_id, &announcement);

    let mut success_count = 0;
    let mut failure_count = 0;
    // Broadcast sends never clean up; tokens are not tied back to owners here.
    for chunk in tokens.chunks(MAX_TOKENS_PER_SEND) {
        let summary = send_notifications_and_cleanup(
            ctx.messenger.as_ref(),
            ctx.registry.as_ref(),
            chunk,
            &payload,
            None,
        )
        .await;
        success_count += summary.success_count;
        failure_count += summary.failure_count;
    }

    log::info!(
        "Duyuru ({}): {} başarılı, {} başarısız",
        event.document_id,
        success_count,
        failure_count
    );

    let log_entry = NotificationLogEntry {
        notification_type: NotificationType::Announcement.as_str().to_string(),
        related_id: event.document_id.clone(),
        target: "all_users".to_string(),
        title: announcement.title_label().to_string(),
        success_count,
        failure_count,
        sent_at: now,
    };
    if let Err(e) = ctx.audit.record_notification(&log_entry).await {
        log::error!("Duyuru ({}): bildirim kaydı yazılamadı: {}", event.document_id, e);
    }

    json!({
        "success_count": success_count,
        "failure_count": failure_count,
    })
}

/// Per-user token lists fetched concurrently, flattened in user order with
/// duplicates dropped. Shared family devices only get the push once.
async fn collect_unique_tokens(ctx: &TriggerContext, recipients: &[UserProfile]) -> Vec<String> {
    let fetches = recipients
        .iter()
        .map(|profile| get_user_tokens(ctx.registry.as_ref(), &profile.user_id));
    let per_user = join_all(fetches).await;

    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for token in per_user.into_iter().flatten() {
        if seen.insert(token.clone()) {
            tokens.push(token);
        }
    }
    tokens
}

fn broadcast_payload(announcement_id: &str, announcement: &Announcement) -> PushPayload {
    PushPayload::new(
        format!("{} 📢", announcement.title_label()),
        announcement.push_body(),
    )
    .with_data("notification_type", NotificationType::Announcement.as_str())
    .with_data("related_id", announcement_id)
    .with_data("click_action", "/user/announcements")
}
