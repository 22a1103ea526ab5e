use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::database::errors::DynamoDbError;
use crate::models::device_token::{
    is_plausible_token, token_tail, tokens_to_deactivate, DeviceTokenRecord,
};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    /// Tokens matching the staleness filter.
    pub queried: usize,
    /// Tokens actually deleted.
    pub deleted: usize,
}

/// Per-user registry of push-notification device tokens.
#[async_trait]
pub trait TokenRegistry: Send + Sync {
    async fn active_tokens(&self, user_id: &str) -> Result<Vec<DeviceTokenRecord>, DynamoDbError>;

    /// Stores a token and deactivates older active ones beyond the per-user
    /// limit.
    async fn store_token(
        &self,
        user_id: &str,
        record: &DeviceTokenRecord,
    ) -> Result<(), DynamoDbError>;

    /// Deletes the registry entry holding `token_value`. Returns whether a
    /// matching entry existed; a missing token is not an error.
    async fn delete_token(&self, user_id: &str, token_value: &str) -> Result<bool, DynamoDbError>;

    /// Deletes tokens last refreshed strictly before `cutoff`.
    async fn purge_refreshed_before(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<PurgeOutcome, DynamoDbError>;
}

/// Forgiving read path for callers that always want a (possibly empty) token
/// list: a blank user id or a failed query logs and yields no tokens, and
/// implausibly short token strings are discarded.
pub async fn get_user_tokens(registry: &dyn TokenRegistry, user_id: &str) -> Vec<String> {
    if user_id.trim().is_empty() {
        log::warn!("get_user_tokens: geçersiz veya boş kullanıcı id'si");
        return Vec::new();
    }

    match registry.active_tokens(user_id).await {
        Ok(records) => {
            let tokens: Vec<String> = records
                .into_iter()
                .filter(|r| {
                    if is_plausible_token(&r.token) {
                        true
                    } else {
                        log::warn!(
                            "get_user_tokens: kullanıcı ({}) için geçersiz token formatı ({})",
                            user_id,
                            r.token_id
                        );
                        false
                    }
                })
                .map(|r| r.token)
                .collect();
            log::info!(
                "get_user_tokens: kullanıcı ({}) için {} geçerli token bulundu",
                user_id,
                tokens.len()
            );
            tokens
        }
        Err(e) => {
            log::error!("get_user_tokens: token sorgusu başarısız ({}): {}", user_id, e);
            Vec::new()
        }
    }
}

/// DynamoDB-backed implementation. Tokens live under the user's partition as
/// `PK=User#{id}`, `SK=Token#{token_id}`.
pub struct DynamoTokenRegistry {
    db: Arc<DynamoDbClient>,
    table_name: String,
}

impl DynamoTokenRegistry {
    pub fn new(db: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self { db, table_name }
    }

    async fn all_tokens(&self, user_id: &str) -> Result<Vec<DeviceTokenRecord>, DynamoDbError> {
        let res = self
            .db
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk)")
            .expression_attribute_values(":pk", AttributeValue::S(format!("User#{}", user_id)))
            .expression_attribute_values(":sk", AttributeValue::S("Token#".to_string()))
            .send()
            .await
            .map_err(|e| DynamoDbError::ReadFailed(format!("Failed to query tokens: {}", e)))?;

        res.items()
            .iter()
            .map(|item| DeviceTokenRecord::from_item(item.clone()))
            .collect()
    }

    async fn delete_by_id(&self, user_id: &str, token_id: &str) -> Result<(), DynamoDbError> {
        self.db
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(format!("User#{}", user_id)))
            .key("SK", AttributeValue::S(format!("Token#{}", token_id)))
            .send()
            .await
            .map_err(|e| DynamoDbError::DeleteFailed(format!("Failed to delete token: {}", e)))?;
        Ok(())
    }

    async fn set_inactive(&self, user_id: &str, token_id: &str) -> Result<(), DynamoDbError> {
        self.db
            .update_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(format!("User#{}", user_id)))
            .key("SK", AttributeValue::S(format!("Token#{}", token_id)))
            .update_expression("SET active = :inactive")
            .expression_attribute_values(":inactive", AttributeValue::Bool(false))
            .send()
            .await
            .map_err(|e| DynamoDbError::WriteFailed(format!("Failed to deactivate token: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl TokenRegistry for DynamoTokenRegistry {
    async fn active_tokens(&self, user_id: &str) -> Result<Vec<DeviceTokenRecord>, DynamoDbError> {
        Ok(self
            .all_tokens(user_id)
            .await?
            .into_iter()
            .filter(|r| r.active)
            .collect())
    }

    async fn store_token(
        &self,
        user_id: &str,
        record: &DeviceTokenRecord,
    ) -> Result<(), DynamoDbError> {
        self.db
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record.to_item(user_id)))
            .send()
            .await
            .map_err(|e| DynamoDbError::WriteFailed(format!("Failed to store token: {}", e)))?;

        // Keep only the most recently refreshed tokens active.
        let mut records = self.all_tokens(user_id).await?;
        records.retain(|r| r.token_id != record.token_id);
        records.push(record.clone());

        for token_id in tokens_to_deactivate(&records) {
            if let Err(e) = self.set_inactive(user_id, &token_id).await {
                log::error!("store_token: eski token pasifleştirilemedi ({}): {}", token_id, e);
            }
        }

        Ok(())
    }

    async fn delete_token(&self, user_id: &str, token_value: &str) -> Result<bool, DynamoDbError> {
        // Per-send responses carry the token value, not the document id, so
        // resolve it with a lookup first.
        let records = self.all_tokens(user_id).await?;
        match records.iter().find(|r| r.token == token_value) {
            Some(record) => {
                self.delete_by_id(user_id, &record.token_id).await?;
                Ok(true)
            }
            None => {
                log::warn!(
                    "delete_token: silinecek token bulunamadı ({}): ...{}",
                    user_id,
                    token_tail(token_value)
                );
                Ok(false)
            }
        }
    }

    async fn purge_refreshed_before(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<PurgeOutcome, DynamoDbError> {
        let stale: Vec<DeviceTokenRecord> = self
            .all_tokens(user_id)
            .await?
            .into_iter()
            .filter(|r| r.is_stale(cutoff))
            .collect();

        let queried = stale.len();
        let deletes = stale
            .iter()
            .map(|record| self.delete_by_id(user_id, &record.token_id));

        let mut deleted = 0;
        for result in join_all(deletes).await {
            match result {
                Ok(()) => deleted += 1,
                Err(e) => log::error!("purge: token silme hatası ({}): {}", user_id, e),
            }
        }

        Ok(PurgeOutcome { queried, deleted })
    }
}
