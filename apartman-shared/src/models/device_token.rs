use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::database::errors::DynamoDbError;

/// FCM registration tokens are long opaque strings; anything shorter is a
/// client bug or corrupted write and is never sent to the provider.
pub const MIN_TOKEN_LEN: usize = 100;

/// At most this many active tokens are kept per user long-term; older ones
/// are deactivated when a fresh token is stored.
pub const MAX_ACTIVE_TOKENS_PER_USER: usize = 2;

pub fn is_plausible_token(token: &str) -> bool {
    token.len() >= MIN_TOKEN_LEN
}

/// Last few characters for log lines; whole tokens never go to the logs.
pub fn token_tail(token: &str) -> &str {
    token
        .char_indices()
        .rev()
        .nth(9)
        .map(|(i, _)| &token[i..])
        .unwrap_or(token)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceTokenRecord {
    pub token_id: String,
    pub token: String,
    pub device: String,
    pub active: bool,
    pub refreshed_at: DateTime<Utc>,
}

impl DeviceTokenRecord {
    pub fn new(token: String, device: String, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            token_id: uuid::Uuid::new_v4().to_string(),
            token,
            device,
            active: true,
            refreshed_at,
        }
    }

    /// Strictly-older-than comparison; a token refreshed exactly at the
    /// cutoff is retained.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.refreshed_at < cutoff
    }

    pub fn from_item(item: HashMap<String, AttributeValue>) -> Result<Self, DynamoDbError> {
        let token_id = item
            .get("token_id")
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| DynamoDbError::MalformedItem("Missing token_id".into()))?
            .to_string();

        let token = item
            .get("token")
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| DynamoDbError::MalformedItem("Missing token".into()))?
            .to_string();

        let device = item
            .get("device")
            .and_then(|v| v.as_s().ok())
            .map_or(String::new(), |s| s.to_string());

        let active = item
            .get("active")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false);

        let refreshed_at = item
            .get("refreshed_at")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| DynamoDbError::MalformedItem("Missing refreshed_at".into()))?;

        Ok(DeviceTokenRecord {
            token_id,
            token,
            device,
            active,
            refreshed_at,
        })
    }

    pub fn to_item(&self, user_id: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                "PK".to_string(),
                AttributeValue::S(format!("User#{}", user_id)),
            ),
            (
                "SK".to_string(),
                AttributeValue::S(format!("Token#{}", self.token_id)),
            ),
            (
                "token_id".to_string(),
                AttributeValue::S(self.token_id.clone()),
            ),
            ("token".to_string(), AttributeValue::S(self.token.clone())),
            ("device".to_string(), AttributeValue::S(self.device.clone())),
            ("active".to_string(), AttributeValue::Bool(self.active)),
            (
                "refreshed_at".to_string(),
                AttributeValue::S(
                    self.refreshed_at
                        .to_rfc3339_opts(SecondsFormat::Millis, true),
                ),
            ),
        ])
    }
}

/// Which active tokens to deactivate so only the `MAX_ACTIVE_TOKENS_PER_USER`
/// most recently refreshed stay active. Returns token ids.
pub fn tokens_to_deactivate(records: &[DeviceTokenRecord]) -> Vec<String> {
    let mut active: Vec<&DeviceTokenRecord> = records.iter().filter(|r| r.active).collect();
    active.sort_by(|a, b| b.refreshed_at.cmp(&a.refreshed_at));
    active
        .iter()
        .skip(MAX_ACTIVE_TOKENS_PER_USER)
        .map(|r| r.token_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record(id: &str, active: bool, refreshed_at: DateTime<Utc>) -> DeviceTokenRecord {
        DeviceTokenRecord {
            token_id: id.to_string(),
            token: "x".repeat(MIN_TOKEN_LEN),
            device: "web".to_string(),
            active,
            refreshed_at,
        }
    }

    #[test]
    fn token_shape_check() {
        assert!(is_plausible_token(&"a".repeat(100)));
        assert!(!is_plausible_token(&"a".repeat(99)));
        assert!(!is_plausible_token(""));
    }

    #[test]
    fn stale_comparison_is_strict() {
        let cutoff = Utc.with_ymd_and_hms(2026, 5, 25, 4, 0, 0).unwrap();
        assert!(!record("t", true, cutoff).is_stale(cutoff));
        assert!(record("t", true, cutoff - Duration::milliseconds(1)).is_stale(cutoff));
    }

    #[test]
    fn deactivation_keeps_two_most_recent_active() {
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let records = vec![
            record("oldest", true, base),
            record("newest", true, base + Duration::days(3)),
            record("middle", true, base + Duration::days(1)),
            record("inactive", false, base + Duration::days(2)),
        ];

        assert_eq!(tokens_to_deactivate(&records), vec!["oldest".to_string()]);
    }

    #[test]
    fn no_deactivation_below_limit() {
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let records = vec![record("a", true, base), record("b", true, base)];
        assert!(tokens_to_deactivate(&records).is_empty());
    }
}
