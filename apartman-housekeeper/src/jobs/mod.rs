use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use apartman_shared::database::errors::DynamoDbError;

pub mod expire_announcements;
pub mod monthly_dues;
pub mod purge_stale_tokens;

/// A scheduled housekeeping task. `run` receives the tick time so runs are
/// reproducible in tests.
#[async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(&self, now: DateTime<Utc>) -> Result<JobReport, JobError>;
}

/// Counters for one run: how many candidates were looked at and how many
/// were actually changed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct JobReport {
    pub scanned: usize,
    pub affected: usize,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("veri erişim hatası: {0}")]
    Store(#[from] DynamoDbError),
    #[error("aidat tutarı ayarı eksik veya geçersiz")]
    InvalidFeeSetting,
}
