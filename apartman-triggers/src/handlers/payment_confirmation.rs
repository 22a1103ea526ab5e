use serde_json::Value;

use apartman_shared::models::notifications::{NotificationType, PushPayload};
use apartman_shared::models::payment::Payment;
use apartman_shared::repositories::token_registry::get_user_tokens;
use apartman_shared::services::dispatcher::send_notifications_and_cleanup;
use apartman_shared::utilities::formatting::format_try;

use crate::events::DocumentEvent;
use crate::handlers::{summary_json, TriggerContext};

/// Payment update. Only the unsettled-to-settled transition notifies; edits
/// to an already settled payment or a reopening do nothing.
pub async fn handle(ctx: &TriggerContext, event: &DocumentEvent) -> Value {
    let Some(after) = event.after_as::<Payment>() else {
        return Value::Null;
    };
    let was_settled = event
        .before_as::<Payment>()
        .map(|before| before.is_settled())
        .unwrap_or(false);

    if was_settled || !after.is_settled() {
        return Value::Null;
    }

    if after.user_id.is_empty() {
        log::warn!("Ödeme onayı ({}): kullanıcı id'si yok", event.document_id);
        return Value::Null;
    }

    let tokens = get_user_tokens(ctx.registry.as_ref(), &after.user_id).await;
    if tokens.is_empty() {
        return Value::Null;
    }

    let payload = confirmation_payload(&event.document_id, &after);
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

fn confirmation_payload(payment_id: &str, payment: &Payment) -> PushPayload {
    PushPayload::new(
        "Ödeme Onayı ✅",
        format!(
            "{} tutarındaki {} ödemeniz alındı.",
            format_try(payment.amount),
            payment.type_label()
        ),
    )
    .with_data(
        "notification_type",
        NotificationType::PaymentConfirmation.as_str(),
    )
    .with_data("related_id", payment_id)
    .with_data("click_action", "/user/payments")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::events::DocumentEvent;
    use crate::handlers::test_support::{harness, long_token};

    fn updated_event(before: serde_json::Value, after: serde_json::Value) -> DocumentEvent {
        serde_json::from_value(json!({
            "collection": "payments",
            "kind": "updated",
            "document_id": "pay-7",
            "before": before,
            "after": after,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn settling_a_payment_notifies() {
        let h = harness();
        let token = long_token("a");
        h.registry.seed_active("u1", &[&token]);

        let event = updated_event(
            json!({ "user_id": "u1", "amount": 500.0, "is_paid": 0 }),
            json!({ "user_id": "u1", "amount": 500.0, "is_paid": 1 }),
        );
        let result = super::handle(&h.ctx, &event).await;

        let calls = h.messenger.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].title, "Ödeme Onayı ✅");
        assert!(calls[0][0].body.contains("ödemeniz alındı."));
        assert_eq!(calls[0][0].data["notification_type"], "payment_confirmation");
        assert_eq!(result["success_count"], 1);
    }

    #[tokio::test]
    async fn absent_before_counts_as_unsettled() {
        let h = harness();
        let token = long_token("a");
        h.registry.seed_active("u1", &[&token]);

        let event: DocumentEvent = serde_json::from_value(json!({
            "collection": "payments",
            "kind": "updated",
            "document_id": "pay-7",
            "after": { "user_id": "u1", "amount": 500.0, "is_paid": 1 },
        }))
        .unwrap();
        super::handle(&h.ctx, &event).await;

        assert_eq!(h.messenger.calls().len(), 1);
    }

    #[tokio::test]
    async fn editing_a_settled_payment_is_silent() {
        let h = harness();
        let token = long_token("a");
        h.registry.seed_active("u1", &[&token]);

        let event = updated_event(
            json!({ "user_id": "u1", "amount": 500.0, "is_paid": 1 }),
            json!({ "user_id": "u1", "amount": 510.0, "is_paid": 1 }),
        );
        super::handle(&h.ctx, &event).await;

        assert!(h.messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn still_unsettled_update_is_silent() {
        let h = harness();
        let event = updated_event(
            json!({ "user_id": "u1", "is_paid": 0 }),
            json!({ "user_id": "u1", "is_paid": 0 }),
        );
        super::handle(&h.ctx, &event).await;

        assert!(h.messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn reopening_a_payment_is_silent() {
        let h = harness();
        let event = updated_event(
            json!({ "user_id": "u1", "is_paid": 1 }),
            json!({ "user_id": "u1", "is_paid": 0 }),
        );
        super::handle(&h.ctx, &event).await;

        assert!(h.messenger.calls().is_empty());
    }
}
