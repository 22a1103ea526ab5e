use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::join_all;

use crate::database::errors::DynamoDbError;

#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    /// Ids of announcements still flagged active whose expiry is in the past.
    async fn expired_active_ids(&self, now: DateTime<Utc>) -> Result<Vec<String>, DynamoDbError>;

    /// Sets `is_active = 0` on every given id; returns how many were updated.
    async fn deactivate_all(&self, ids: &[String]) -> Result<usize, DynamoDbError>;
}

pub struct DynamoAnnouncementStore {
    db: Arc<DynamoDbClient>,
    table_name: String,
}

impl DynamoAnnouncementStore {
    pub fn new(db: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self { db, table_name }
    }
}

#[async_trait]
impl AnnouncementStore for DynamoAnnouncementStore {
    async fn expired_active_ids(&self, now: DateTime<Utc>) -> Result<Vec<String>, DynamoDbError> {
        // RFC3339 UTC timestamps compare correctly as strings.
        let res = self
            .db
            .scan()
            .table_name(&self.table_name)
            .filter_expression("is_active = :active AND expiry_date < :now")
            .expression_attribute_values(":active", AttributeValue::N("1".to_string()))
            .expression_attribute_values(
                ":now",
                AttributeValue::S(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            )
            .projection_expression("announcement_id")
            .send()
            .await
            .map_err(|e| {
                DynamoDbError::ReadFailed(format!("Failed to scan announcements: {}", e))
            })?;

        Ok(res
            .items()
            .iter()
            .filter_map(|item| item.get("announcement_id").and_then(|v| v.as_s().ok()))
            .map(|s| s.to_string())
            .collect())
    }

    async fn deactivate_all(&self, ids: &[String]) -> Result<usize, DynamoDbError> {
        let updates = ids.iter().map(|id| {
            self.db
                .update_item()
                .table_name(&self.table_name)
                .key("announcement_id", AttributeValue::S(id.clone()))
                .update_expression("SET is_active = :inactive")
                .expression_attribute_values(":inactive", AttributeValue::N("0".to_string()))
                .send()
        });

        let mut updated = 0;
        for result in join_all(updates).await {
            match result {
                Ok(_) => updated += 1,
                Err(e) => log::error!("deactivate_all: duyuru güncellenemedi: {}", e),
            }
        }
        Ok(updated)
    }
}
