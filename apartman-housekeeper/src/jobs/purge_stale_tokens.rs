use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};

use apartman_shared::repositories::token_registry::TokenRegistry;
use apartman_shared::repositories::user_repository::UserDirectory;

use crate::jobs::{Job, JobError, JobReport};

/// Tokens not refreshed for this long are presumed dead devices.
pub const STALE_AFTER_DAYS: i64 = 90;

const PURGE_CONCURRENCY: usize = 8;

/// Walks every user's token registrations and deletes the ones whose last
/// refresh is older than the cutoff. One user's failure never blocks the rest.
pub struct PurgeStaleTokensJob {
    registry: Arc<dyn TokenRegistry>,
    users: Arc<dyn UserDirectory>,
}

impl PurgeStaleTokensJob {
    pub fn new(registry: Arc<dyn TokenRegistry>, users: Arc<dyn UserDirectory>) -> Self {
        Self { registry, users }
    }
}

#[async_trait]
impl Job for PurgeStaleTokensJob {
    fn name(&self) -> &'static str {
        "purge-stale-tokens"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<JobReport, JobError> {
        let cutoff = now - Duration::days(STALE_AFTER_DAYS);
        let user_ids = self.users.all_user_ids().await?;
        log::info!(
            "🧹 {} kullanıcı için {} öncesi token'lar temizleniyor",
            user_ids.len(),
            cutoff
        );

        let purges: Vec<_> = user_ids
            .iter()
            .map(|user_id| async move {
                (
                    user_id.as_str(),
                    self.registry.purge_refreshed_before(user_id, cutoff).await,
                )
            })
            .collect();
        let outcomes = stream::iter(purges)
        .buffer_unordered(PURGE_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

        let mut queried = 0;
        let mut deleted = 0;
        for (user_id, outcome) in outcomes {
            match outcome {
                Ok(purge) => {
                    queried += purge.queried;
                    deleted += purge.deleted;
                }
                Err(e) => log::error!("🧹 Kullanıcı ({}) temizlenemedi: {}", user_id, e),
            }
        }

        log::info!(
            "🧹 Temizlik bitti: {} kullanıcı, {} eski token silindi",
            user_ids.len(),
            deleted
        );

        Ok(JobReport {
            scanned: queried,
            affected: deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use apartman_shared::models::device_token::DeviceTokenRecord;
    use apartman_shared::utilities::test::{MockTokenRegistry, MockUserDirectory};

    use super::*;

    fn token(label: &str, refreshed_at: chrono::DateTime<Utc>) -> DeviceTokenRecord {
        DeviceTokenRecord::new(
            format!("{}{}", label, "x".repeat(120)),
            "test-device".to_string(),
            refreshed_at,
        )
    }

    #[tokio::test]
    async fn deletes_tokens_older_than_ninety_days() {
        let registry = Arc::new(MockTokenRegistry::default());
        let users = Arc::new(MockUserDirectory::default());
        let now = Utc::now();

        users.resident("u1");
        registry.seed_record("u1", token("old", now - Duration::days(91)));
        registry.seed_record("u1", token("fresh", now - Duration::days(1)));

        let job = PurgeStaleTokensJob::new(registry.clone(), users);
        let report = job.run(now).await.unwrap();

        assert_eq!(report.affected, 1);
        assert_eq!(registry.records_for("u1").len(), 1);
    }

    #[tokio::test]
    async fn token_refreshed_exactly_at_the_cutoff_survives() {
        let registry = Arc::new(MockTokenRegistry::default());
        let users = Arc::new(MockUserDirectory::default());
        let now = Utc::now();
        let cutoff = now - Duration::days(STALE_AFTER_DAYS);

        users.resident("u1");
        registry.seed_record("u1", token("edge", cutoff));
        registry.seed_record("u1", token("older", cutoff - Duration::milliseconds(1)));

        let job = PurgeStaleTokensJob::new(registry.clone(), users);
        let report = job.run(now).await.unwrap();

        assert_eq!(report.affected, 1);
        let remaining = registry.records_for("u1");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].refreshed_at, cutoff);
    }

    #[tokio::test]
    async fn registry_failures_do_not_fail_the_run() {
        let registry = Arc::new(MockTokenRegistry::default());
        let users = Arc::new(MockUserDirectory::default());
        users.resident("u1");
        registry.fail_reads();

        let job = PurgeStaleTokensJob::new(registry, users);
        let report = job.run(Utc::now()).await.unwrap();

        assert_eq!(report, JobReport::default());
    }

    #[tokio::test]
    async fn no_users_means_nothing_to_do() {
        let registry = Arc::new(MockTokenRegistry::default());
        let users = Arc::new(MockUserDirectory::default());

        let job = PurgeStaleTokensJob::new(registry, users);
        let report = job.run(Utc::now()).await.unwrap();

        assert_eq!(report, JobReport::default());
    }
}
