use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;

use crate::database::errors::DynamoDbError;
use crate::models::payment::Payment;

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Conditionally inserts a payment under `payment_id`. Returns false when
    /// a document with that id already exists — the uniqueness constraint the
    /// monthly dues job relies on instead of a scan-then-insert check.
    async fn create_if_absent(
        &self,
        payment_id: &str,
        payment: &Payment,
    ) -> Result<bool, DynamoDbError>;
}

pub struct DynamoPaymentStore {
    db: Arc<DynamoDbClient>,
    table_name: String,
}

impl DynamoPaymentStore {
    pub fn new(db: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self { db, table_name }
    }
}

#[async_trait]
impl PaymentStore for DynamoPaymentStore {
    async fn create_if_absent(
        &self,
        payment_id: &str,
        payment: &Payment,
    ) -> Result<bool, DynamoDbError> {
        let result = self
            .db
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(payment.to_item(payment_id)))
            .condition_expression("attribute_not_exists(payment_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    Ok(false)
                } else {
                    Err(DynamoDbError::WriteFailed(format!(
                        "Failed to create payment: {}",
                        service_error
                    )))
                }
            }
        }
    }
}
