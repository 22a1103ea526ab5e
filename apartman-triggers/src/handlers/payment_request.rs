use serde_json::Value;

use apartman_shared::models::notifications::{NotificationType, PushPayload};
use apartman_shared::models::payment::Payment;
use apartman_shared::services::dispatcher::send_notifications_and_cleanup;
use apartman_shared::repositories::token_registry::get_user_tokens;
use apartman_shared::utilities::formatting::format_try;

use crate::events::DocumentEvent;
use crate::handlers::{summary_json, TriggerContext};

/// New payment document. Unpaid payments notify the debtor; documents created
/// already settled (imports, corrections) stay quiet.
pub async fn handle(ctx: &TriggerContext, event: &DocumentEvent) -> Value {
    let Some(payment) = event.after_as::<Payment>() else {
        return Value::Null;
    };

    if payment.user_id.is_empty() {
        log::warn!("Ödeme talebi ({}): kullanıcı id'si yok", event.document_id);
        return Value::Null;
    }
    if payment.is_settled() {
        log::info!(
            "Ödeme talebi ({}): zaten ödenmiş, bildirim yok",
            event.document_id
        );
        return Value::Null;
    }

    let tokens = get_user_tokens(ctx.registry.as_ref(), &payment.user_id).await;
    if tokens.is_empty() {
        log::info!(
            "Ödeme talebi ({}): kullanıcının ({}) aktif token'ı yok",
            event.document_id,
            payment.user_id
        );
        return Value::Null;
    }

    let payload = request_payload(&event.document_id, &payment);
    let summary = send_notifications_and_cleanup(
        ctx.messenger.as_ref(),
        ctx.registry.as_ref(),
        &tokens,
        &payload,
        Some(&payment.user_id),
    )
    .await;

    summary_json(&summary)
}

fn request_payload(payment_id: &str, payment: &Payment) -> PushPayload {
    PushPayload::new(
        "Yeni Ödeme Talebi 💰",
        format!(
            "{} tutarındaki {} ödemeniz oluşturuldu.",
            format_try(payment.amount),
            payment.type_label()
        ),
    )
    .with_data("notification_type", NotificationType::PaymentRequest.as_str())
    .with_data("related_id", payment_id)
    .with_data("click_action", "/user/payments")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::events::DocumentEvent;
    use crate::handlers::test_support::{harness, long_token};

    fn created_event(after: serde_json::Value) -> DocumentEvent {
        serde_json::from_value(json!({
            "collection": "payments",
            "kind": "created",
            "document_id": "pay-1",
            "after": after,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn unpaid_payment_notifies_the_debtor() {
        let h = harness();
        let token = long_token("a");
        h.registry.seed_active("u1", &[&token]);

        let event = created_event(json!({
            "user_id": "u1",
            "amount": 1250.5,
            "type": "aidat",
            "is_paid": 0,
        }));
        let result = super::handle(&h.ctx, &event).await;

        let calls = h.messenger.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0][0].title, "Yeni Ödeme Talebi 💰");
        assert!(calls[0][0].body.contains("₺1.250,50"));
        assert!(calls[0][0].body.contains("aidat"));
        assert_eq!(calls[0][0].data["related_id"], "pay-1");
        assert_eq!(calls[0][0].data["notification_type"], "payment_request");
        assert_eq!(calls[0][0].link, "/user/payments");
        assert_eq!(result["success_count"], 1);
    }

    #[tokio::test]
    async fn settled_payment_is_silent() {
        let h = harness();
        let token = long_token("a");
        h.registry.seed_active("u1", &[&token]);

        let event = created_event(json!({
            "user_id": "u1",
            "amount": 100.0,
            "is_paid": 1,
        }));
        super::handle(&h.ctx, &event).await;

        assert!(h.messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_user_id_is_silent() {
        let h = harness();
        let event = created_event(json!({ "amount": 100.0, "is_paid": 0 }));
        super::handle(&h.ctx, &event).await;

        assert!(h.messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn no_tokens_means_no_send() {
        let h = harness();
        let event = created_event(json!({
            "user_id": "u1",
            "amount": 100.0,
            "is_paid": 0,
        }));
        super::handle(&h.ctx, &event).await;

        assert!(h.messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_type_falls_back_to_generic_label() {
        let h = harness();
        let token = long_token("a");
        h.registry.seed_active("u1", &[&token]);

        let event = created_event(json!({
            "user_id": "u1",
            "amount": 75.0,
            "is_paid": 0,
        }));
        super::handle(&h.ctx, &event).await;

        let calls = h.messenger.calls();
        assert!(calls[0][0].body.contains("Ödeme ödemeniz oluşturuldu."));
    }
}
