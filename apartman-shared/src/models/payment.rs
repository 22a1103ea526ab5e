use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::UserProfile;
use crate::utilities::formatting::month_name_tr;

pub const DUES_TYPE: &str = "aidat";

/// Payment document as written to the `payments` collection and as carried in
/// trigger events. `is_paid` is 0/1; an absent field reads as unpaid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub apartment_number: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, rename = "type")]
    pub payment_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_paid: i64,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn is_settled(&self) -> bool {
        self.is_paid == 1
    }

    pub fn type_label(&self) -> &str {
        if self.payment_type.is_empty() {
            "Ödeme"
        } else {
            &self.payment_type
        }
    }

    /// Deterministic id for a recurring dues payment. Keying on user and
    /// calendar month makes the monthly job a conditional insert instead of a
    /// scan-then-insert race.
    pub fn dues_id(user_id: &str, year: i32, month: u32) -> String {
        format!("{}-{}-{}-{:02}", DUES_TYPE, user_id, year, month)
    }

    pub fn monthly_dues(profile: &UserProfile, amount: f64, now: DateTime<Utc>) -> Self {
        let description = format!(
            "{} {} ayı aidat ödemesi",
            month_name_tr(now.month()),
            now.year()
        );

        Payment {
            user_id: profile.user_id.clone(),
            user_name: profile.display_name(),
            apartment_number: profile.apartment_label().to_string(),
            amount,
            payment_type: DUES_TYPE.to_string(),
            description,
            is_paid: 0,
            created_date: Some(now),
            payment_date: None,
        }
    }

    pub fn to_item(&self, payment_id: &str) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::from([
            (
                "payment_id".to_string(),
                AttributeValue::S(payment_id.to_string()),
            ),
            ("user_id".to_string(), AttributeValue::S(self.user_id.clone())),
            (
                "user_name".to_string(),
                AttributeValue::S(self.user_name.clone()),
            ),
            (
                "apartment_number".to_string(),
                AttributeValue::S(self.apartment_number.clone()),
            ),
            (
                "amount".to_string(),
                AttributeValue::N(self.amount.to_string()),
            ),
            (
                "type".to_string(),
                AttributeValue::S(self.payment_type.clone()),
            ),
            (
                "description".to_string(),
                AttributeValue::S(self.description.clone()),
            ),
            (
                "is_paid".to_string(),
                AttributeValue::N(self.is_paid.to_string()),
            ),
        ]);

        if let Some(created) = self.created_date {
            item.insert(
                "created_date".to_string(),
                AttributeValue::S(created.to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
        if let Some(paid_at) = self.payment_date {
            item.insert(
                "payment_date".to_string(),
                AttributeValue::S(paid_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }

        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use chrono::TimeZone;

    fn resident() -> UserProfile {
        UserProfile {
            user_id: "u42".to_string(),
            first_name: "Mehmet".to_string(),
            last_name: "Demir".to_string(),
            apartment_number: "A-3".to_string(),
            phone: "5320001122".to_string(),
            role: Role::User,
            fee: None,
        }
    }

    #[test]
    fn dues_id_is_period_keyed() {
        assert_eq!(Payment::dues_id("u42", 2026, 8), "aidat-u42-2026-08");
        assert_eq!(Payment::dues_id("u42", 2026, 11), "aidat-u42-2026-11");
    }

    #[test]
    fn monthly_dues_fills_turkish_description() {
        let now = Utc.with_ymd_and_hms(2026, 8, 10, 9, 10, 0).unwrap();
        let payment = Payment::monthly_dues(&resident(), 250.0, now);

        assert_eq!(payment.amount, 250.0);
        assert_eq!(payment.payment_type, "aidat");
        assert_eq!(payment.is_paid, 0);
        assert!(payment.payment_date.is_none());
        assert_eq!(payment.description, "Ağustos 2026 ayı aidat ödemesi");
        assert_eq!(payment.user_name, "Mehmet Demir");
    }

    #[test]
    fn absent_is_paid_reads_as_unpaid() {
        let payment: Payment =
            serde_json::from_value(serde_json::json!({ "user_id": "u1", "amount": 100 })).unwrap();
        assert!(!payment.is_settled());
        assert_eq!(payment.type_label(), "Ödeme");
    }
}
