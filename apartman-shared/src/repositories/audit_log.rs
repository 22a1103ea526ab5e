use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::database::errors::DynamoDbError;

/// One row per announcement fan-out, written after the last chunk.
#[derive(Debug, Clone)]
pub struct NotificationLogEntry {
    pub notification_type: String,
    pub related_id: String,
    pub target: String,
    pub title: String,
    pub success_count: usize,
    pub failure_count: usize,
    pub sent_at: DateTime<Utc>,
}

/// One row per monthly dues run that created at least one payment.
#[derive(Debug, Clone)]
pub struct DuesRunLogEntry {
    pub fee_amount: f64,
    pub user_count: usize,
    pub month: String,
    pub year: i32,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record_notification(&self, entry: &NotificationLogEntry) -> Result<(), DynamoDbError>;
    async fn record_dues_run(&self, entry: &DuesRunLogEntry) -> Result<(), DynamoDbError>;
}

pub struct DynamoAuditLog {
    db: Arc<DynamoDbClient>,
    notification_logs_table: String,
    logs_table: String,
}

impl DynamoAuditLog {
    pub fn new(
        db: Arc<DynamoDbClient>,
        notification_logs_table: String,
        logs_table: String,
    ) -> Self {
        Self {
            db,
            notification_logs_table,
            logs_table,
        }
    }
}

#[async_trait]
impl AuditLog for DynamoAuditLog {
    async fn record_notification(&self, entry: &NotificationLogEntry) -> Result<(), DynamoDbError> {
        self.db
            .put_item()
            .table_name(&self.notification_logs_table)
            .item("log_id", AttributeValue::S(Uuid::new_v4().to_string()))
            .item("type", AttributeValue::S(entry.notification_type.clone()))
            .item("related_id", AttributeValue::S(entry.related_id.clone()))
            .item("target", AttributeValue::S(entry.target.clone()))
            .item("title", AttributeValue::S(entry.title.clone()))
            .item(
                "success_count",
                AttributeValue::N(entry.success_count.to_string()),
            )
            .item(
                "failure_count",
                AttributeValue::N(entry.failure_count.to_string()),
            )
            .item(
                "sent_at",
                AttributeValue::S(entry.sent_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            )
            .send()
            .await
            .map_err(|e| {
                DynamoDbError::WriteFailed(format!("Failed to write notification log: {}", e))
            })?;
        Ok(())
    }

    async fn record_dues_run(&self, entry: &DuesRunLogEntry) -> Result<(), DynamoDbError> {
        self.db
            .put_item()
            .table_name(&self.logs_table)
            .item("log_id", AttributeValue::S(Uuid::new_v4().to_string()))
            .item(
                "action",
                AttributeValue::S("create_monthly_fees".to_string()),
            )
            .item(
                "timestamp",
                AttributeValue::S(entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
            )
            .item(
                "fee_amount",
                AttributeValue::N(entry.fee_amount.to_string()),
            )
            .item(
                "user_count",
                AttributeValue::N(entry.user_count.to_string()),
            )
            .item("month", AttributeValue::S(entry.month.clone()))
            .item("year", AttributeValue::N(entry.year.to_string()))
            .send()
            .await
            .map_err(|e| DynamoDbError::WriteFailed(format!("Failed to write dues log: {}", e)))?;
        Ok(())
    }
}
