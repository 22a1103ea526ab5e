use std::collections::BTreeSet;

use futures::future::join_all;
use serde_json::Value;

use crate::models::device_token::is_plausible_token;
use crate::models::notifications::{DispatchSummary, PushMessage, PushPayload};
use crate::repositories::token_registry::TokenRegistry;
use crate::services::messaging::PushMessenger;

const DEFAULT_CLICK_TARGET: &str = "/";

/// Sends one payload to a set of tokens and prunes registrations the provider
/// reports as permanently invalid.
///
/// Failure policy: invalid input short-circuits before any provider call; a
/// batch-level provider failure becomes a synthetic all-failed summary. There
/// is no retry. Cleanup only happens when `user_id_for_cleanup` names the
/// owner of the tokens; broadcast sends log invalid tokens and leave them.
pub async fn send_notifications_and_cleanup(
    messenger: &dyn PushMessenger,
    registry: &dyn TokenRegistry,
    tokens: &[String],
    payload: &PushPayload,
    user_id_for_cleanup: Option<&str>,
) -> DispatchSummary {
    let send_label = user_id_for_cleanup.unwrap_or("toplu gönderim");

    if tokens.is_empty() {
        log::info!("dispatch: ({}) gönderilecek token yok", send_label);
        return DispatchSummary::empty();
    }

    if !payload.has_notification() {
        log::error!("dispatch: geçersiz payload yapısı (title/body eksik)");
        return DispatchSummary::failed_for(
            tokens.len(),
            "invalid-payload",
            "Payload notification alanı (title/body) eksik.".to_string(),
        );
    }

    let valid_tokens: Vec<&String> = tokens.iter().filter(|t| is_plausible_token(t)).collect();
    if valid_tokens.len() != tokens.len() {
        log::warn!(
            "dispatch: {} geçersiz formatlı token filtrelendi",
            tokens.len() - valid_tokens.len()
        );
    }
    if valid_tokens.is_empty() {
        log::info!("dispatch: ({}) gönderilecek geçerli token kalmadı", send_label);
        return DispatchSummary::empty();
    }

    let messages: Vec<PushMessage> = valid_tokens
        .iter()
        .map(|token| build_message(token, payload))
        .collect();

    log::info!("dispatch: ({}) {} mesaj gönderiliyor", send_label, messages.len());

    let outcome = match messenger.send_each(&messages).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("dispatch: toplu gönderim hatası: {}", e);
            return DispatchSummary::failed_for(valid_tokens.len(), e.code(), e.to_string());
        }
    };

    log::info!(
        "dispatch: sonuç ({}): {} başarılı, {} başarısız",
        send_label,
        outcome.success_count,
        outcome.failure_count
    );

    if outcome.failure_count > 0 {
        let tokens_to_remove: BTreeSet<&str> = outcome
            .responses
            .iter()
            .filter(|r| {
                r.error
                    .as_ref()
                    .is_some_and(|code| code.is_permanent_invalidity())
            })
            .map(|r| r.token.as_str())
            .collect();

        if !tokens_to_remove.is_empty() {
            match user_id_for_cleanup {
                Some(user_id) => {
                    log::info!(
                        "dispatch: ({}) için silinecek {} geçersiz token bulundu",
                        user_id,
                        tokens_to_remove.len()
                    );
                    cleanup_tokens(registry, user_id, &tokens_to_remove).await;
                }
                None => {
                    log::warn!(
                        "dispatch: toplu gönderimde {} geçersiz token bulundu, kullanıcı id'si \
                         olmadığı için temizlik atlandı",
                        tokens_to_remove.len()
                    );
                }
            }
        }
    }

    DispatchSummary {
        success_count: outcome.success_count,
        failure_count: outcome.failure_count,
        responses: outcome.responses,
        error: None,
    }
}

/// Best-effort deletes; one failed lookup/delete never aborts the rest.
async fn cleanup_tokens(registry: &dyn TokenRegistry, user_id: &str, tokens: &BTreeSet<&str>) {
    let deletes = tokens
        .iter()
        .map(|token| async move { (*token, registry.delete_token(user_id, token).await) });

    for (token, result) in join_all(deletes).await {
        match result {
            Ok(true) => log::info!(
                "dispatch: token silindi ({}): ...{}",
                user_id,
                crate::models::device_token::token_tail(token)
            ),
            Ok(false) => {}
            Err(e) => log::error!("dispatch: token silinirken hata ({}): {}", user_id, e),
        }
    }
}

fn build_message(token: &str, payload: &PushPayload) -> PushMessage {
    // The provider only accepts string data values.
    let data: std::collections::BTreeMap<String, String> = payload
        .data
        .iter()
        .map(|(k, v)| (k.clone(), stringify(v)))
        .collect();

    let link = data
        .get("click_action")
        .cloned()
        .unwrap_or_else(|| DEFAULT_CLICK_TARGET.to_string());

    PushMessage {
        token: token.to_string(),
        title: payload.title.clone(),
        body: payload.body.clone(),
        data,
        link,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::device_token::MIN_TOKEN_LEN;
    use crate::models::notifications::{SendErrorCode, SendResponse};
    use crate::utilities::test::{MockMessenger, MockTokenRegistry};

    fn token(tag: &str) -> String {
        format!("{}{}", tag, "x".repeat(MIN_TOKEN_LEN))
    }

    fn payload() -> PushPayload {
        PushPayload::new("Başlık", "Gövde")
            .with_data("notification_type", "payment_request")
            .with_data("related_id", "p1")
            .with_data("click_action", "/user/payments")
    }

    #[tokio::test]
    async fn missing_title_short_circuits_without_provider_call() {
        let messenger = MockMessenger::default();
        let registry = MockTokenRegistry::default();
        let tokens = vec![token("a"), token("b")];

        let summary = send_notifications_and_cleanup(
            &messenger,
            &registry,
            &tokens,
            &PushPayload::new("", "Gövde"),
            Some("u1"),
        )
        .await;

        assert_eq!(summary.failure_count, 2);
        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.error.as_ref().unwrap().code, "invalid-payload");
        assert!(messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn short_tokens_are_filtered_before_sending() {
        let messenger = MockMessenger::default();
        let registry = MockTokenRegistry::default();
        let tokens = vec![token("a"), "kısa-token".to_string()];

        let summary =
            send_notifications_and_cleanup(&messenger, &registry, &tokens, &payload(), Some("u1"))
                .await;

        let calls = messenger.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0][0].token, token("a"));
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 0);
    }

    #[tokio::test]
    async fn all_short_tokens_yield_zero_result_without_provider_call() {
        let messenger = MockMessenger::default();
        let registry = MockTokenRegistry::default();
        let tokens = vec!["a".to_string(), "b".to_string()];

        let summary =
            send_notifications_and_cleanup(&messenger, &registry, &tokens, &payload(), None).await;

        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.failure_count, 0);
        assert!(messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn data_is_stringified_and_click_action_defaults() {
        let messenger = MockMessenger::default();
        let registry = MockTokenRegistry::default();
        let tokens = vec![token("a")];
        let payload = PushPayload::new("t", "b")
            .with_data("related_id", 42)
            .with_data("empty", Value::Null);

        send_notifications_and_cleanup(&messenger, &registry, &tokens, &payload, None).await;

        let calls = messenger.calls();
        let msg = &calls[0][0];
        assert_eq!(msg.data.get("related_id").unwrap(), "42");
        assert_eq!(msg.data.get("empty").unwrap(), "");
        assert_eq!(msg.link, "/");
    }

    #[tokio::test]
    async fn batch_failure_becomes_synthetic_summary() {
        let messenger = MockMessenger::default();
        messenger.fail_next_batch("token exchange down");
        let registry = MockTokenRegistry::default();
        let tokens = vec![token("a"), token("b"), "kısa".to_string()];

        let summary =
            send_notifications_and_cleanup(&messenger, &registry, &tokens, &payload(), Some("u1"))
                .await;

        // Only the tokens that survived the shape filter are counted.
        assert_eq!(summary.failure_count, 2);
        assert_eq!(summary.success_count, 0);
        assert!(summary.error.is_some());
    }

    #[tokio::test]
    async fn invalid_registrations_are_cleaned_up_for_known_user() {
        let messenger = MockMessenger::default();
        let registry = MockTokenRegistry::default();
        let dead = token("dead");
        let live = token("live");
        registry.seed_active("u1", &[dead.as_str(), live.as_str()]);

        messenger.script_outcome(vec![
            SendResponse {
                token: dead.clone(),
                success: false,
                error: Some(SendErrorCode::Unregistered),
            },
            SendResponse {
                token: live.clone(),
                success: true,
                error: None,
            },
        ]);

        let tokens = vec![dead.clone(), live.clone()];
        let summary =
            send_notifications_and_cleanup(&messenger, &registry, &tokens, &payload(), Some("u1"))
                .await;

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(registry.deleted(), vec![("u1".to_string(), dead)]);
    }

    #[tokio::test]
    async fn broadcast_sends_skip_cleanup() {
        let messenger = MockMessenger::default();
        let registry = MockTokenRegistry::default();
        let dead = token("dead");
        registry.seed_active("u1", &[dead.as_str()]);

        messenger.script_outcome(vec![SendResponse {
            token: dead.clone(),
            success: false,
            error: Some(SendErrorCode::Unregistered),
        }]);

        send_notifications_and_cleanup(&messenger, &registry, &[dead], &payload(), None).await;

        assert!(registry.deleted().is_empty());
    }

    #[tokio::test]
    async fn transient_failures_are_not_cleaned_up() {
        let messenger = MockMessenger::default();
        let registry = MockTokenRegistry::default();
        let flaky = token("flaky");
        registry.seed_active("u1", &[flaky.as_str()]);

        messenger.script_outcome(vec![SendResponse {
            token: flaky.clone(),
            success: false,
            error: Some(SendErrorCode::Unavailable),
        }]);

        let summary =
            send_notifications_and_cleanup(&messenger, &registry, &[flaky], &payload(), Some("u1"))
                .await;

        assert_eq!(summary.failure_count, 1);
        assert!(registry.deleted().is_empty());
    }

    #[tokio::test]
    async fn empty_token_list_is_a_quiet_no_op() {
        let messenger = MockMessenger::default();
        let registry = MockTokenRegistry::default();

        let summary =
            send_notifications_and_cleanup(&messenger, &registry, &[], &payload(), Some("u1"))
                .await;

        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.failure_count, 0);
        assert!(summary.error.is_none());
        assert!(messenger.calls().is_empty());
    }
}
