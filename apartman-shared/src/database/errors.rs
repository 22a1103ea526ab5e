use thiserror::Error;

#[derive(Debug, Error)]
pub enum DynamoDbError {
    #[error("DynamoDB read failed: {0}")]
    ReadFailed(String),

    #[error("DynamoDB write failed: {0}")]
    WriteFailed(String),

    #[error("DynamoDB delete failed: {0}")]
    DeleteFailed(String),

    #[error("Malformed item: {0}")]
    MalformedItem(String),
}
