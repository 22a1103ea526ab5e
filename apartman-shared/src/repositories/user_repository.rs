use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;

use crate::database::errors::DynamoDbError;
use crate::models::user::{Role, UserProfile};

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, DynamoDbError>;

    /// All profiles with role `user` (announcement and dues recipients).
    async fn residents(&self) -> Result<Vec<UserProfile>, DynamoDbError>;

    /// Every user id, admins included (token housekeeping and the fee mirror
    /// walk all of them).
    async fn all_user_ids(&self) -> Result<Vec<String>, DynamoDbError>;

    /// Rewrites the denormalized `fee` field on one profile.
    async fn set_fee(&self, user_id: &str, amount: f64) -> Result<(), DynamoDbError>;
}

pub struct DynamoUserDirectory {
    db: Arc<DynamoDbClient>,
    table_name: String,
}

impl DynamoUserDirectory {
    pub fn new(db: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self { db, table_name }
    }
}

#[async_trait]
impl UserDirectory for DynamoUserDirectory {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, DynamoDbError> {
        let res = self
            .db
            .get_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| DynamoDbError::ReadFailed(format!("Failed to fetch profile: {}", e)))?;

        match res.item {
            Some(item) => Ok(Some(UserProfile::from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn residents(&self) -> Result<Vec<UserProfile>, DynamoDbError> {
        // "role" is a DynamoDB reserved word, hence the name placeholder.
        let res = self
            .db
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#r = :role")
            .expression_attribute_names("#r", "role")
            .expression_attribute_values(":role", AttributeValue::S(Role::User.as_str().to_string()))
            .send()
            .await
            .map_err(|e| DynamoDbError::ReadFailed(format!("Failed to scan residents: {}", e)))?;

        res.items()
            .iter()
            .map(|item| UserProfile::from_item(item.clone()))
            .collect()
    }

    async fn all_user_ids(&self) -> Result<Vec<String>, DynamoDbError> {
        let res = self
            .db
            .scan()
            .table_name(&self.table_name)
            .projection_expression("user_id")
            .send()
            .await
            .map_err(|e| DynamoDbError::ReadFailed(format!("Failed to scan users: {}", e)))?;

        Ok(res
            .items()
            .iter()
            .filter_map(|item| item.get("user_id").and_then(|v| v.as_s().ok()))
            .map(|s| s.to_string())
            .collect())
    }

    async fn set_fee(&self, user_id: &str, amount: f64) -> Result<(), DynamoDbError> {
        self.db
            .update_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .update_expression("SET fee = :fee")
            .expression_attribute_values(":fee", AttributeValue::N(amount.to_string()))
            .send()
            .await
            .map_err(|e| DynamoDbError::WriteFailed(format!("Failed to update fee: {}", e)))?;
        Ok(())
    }
}
