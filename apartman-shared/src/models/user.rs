use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};

use crate::database::errors::DynamoDbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Profile document mirrored from the auth system into the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub apartment_number: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
    #[serde(default)]
    pub fee: Option<f64>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string();
        if name.is_empty() {
            "Belirsiz Kullanıcı".to_string()
        } else {
            name
        }
    }

    pub fn apartment_label(&self) -> &str {
        if self.apartment_number.is_empty() {
            "Bilinmiyor"
        } else {
            &self.apartment_number
        }
    }

    pub fn from_item(item: HashMap<String, AttributeValue>) -> Result<Self, DynamoDbError> {
        let user_id = item
            .get("user_id")
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| DynamoDbError::MalformedItem("Missing user_id".into()))?
            .to_string();

        let role = match item.get("role").and_then(|v| v.as_s().ok()) {
            Some(r) if r == "admin" => Role::Admin,
            _ => Role::User,
        };

        let string_field = |name: &str| {
            item.get(name)
                .and_then(|v| v.as_s().ok())
                .map_or(String::new(), |s| s.to_string())
        };

        let fee = item
            .get("fee")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse::<f64>().ok());

        Ok(UserProfile {
            user_id,
            first_name: string_field("first_name"),
            last_name: string_field("last_name"),
            apartment_number: string_field("apartment_number"),
            phone: string_field("phone"),
            role,
            fee,
        })
    }
}
