use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;

use crate::database::errors::DynamoDbError;

const FEE_SETTING_ID: &str = "fee";

/// Singleton settings documents; only the recurring-dues amount lives here.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn fee_amount(&self) -> Result<Option<f64>, DynamoDbError>;
    async fn set_fee_amount(&self, amount: f64) -> Result<(), DynamoDbError>;
}

pub struct DynamoSettingsStore {
    db: Arc<DynamoDbClient>,
    table_name: String,
}

impl DynamoSettingsStore {
    pub fn new(db: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self { db, table_name }
    }
}

#[async_trait]
impl SettingsStore for DynamoSettingsStore {
    async fn fee_amount(&self) -> Result<Option<f64>, DynamoDbError> {
        let res = self
            .db
            .get_item()
            .table_name(&self.table_name)
            .key("setting_id", AttributeValue::S(FEE_SETTING_ID.to_string()))
            .send()
            .await
            .map_err(|e| DynamoDbError::ReadFailed(format!("Failed to fetch fee setting: {}", e)))?;

        Ok(res
            .item
            .and_then(|item| item.get("amount").and_then(|v| v.as_n().ok()).cloned())
            .and_then(|n| n.parse::<f64>().ok()))
    }

    async fn set_fee_amount(&self, amount: f64) -> Result<(), DynamoDbError> {
        self.db
            .put_item()
            .table_name(&self.table_name)
            .item("setting_id", AttributeValue::S(FEE_SETTING_ID.to_string()))
            .item("amount", AttributeValue::N(amount.to_string()))
            .send()
            .await
            .map_err(|e| DynamoDbError::WriteFailed(format!("Failed to store fee setting: {}", e)))?;
        Ok(())
    }
}
