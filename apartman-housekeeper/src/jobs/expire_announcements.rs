use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use apartman_shared::repositories::announcement_repository::AnnouncementStore;

use crate::jobs::{Job, JobError, JobReport};

/// Flips announcements whose expiry has passed to inactive so clients stop
/// showing them. Announcements without an expiry date are never touched.
pub struct ExpireAnnouncementsJob {
    store: Arc<dyn AnnouncementStore>,
}

impl ExpireAnnouncementsJob {
    pub fn new(store: Arc<dyn AnnouncementStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Job for ExpireAnnouncementsJob {
    fn name(&self) -> &'static str {
        "expire-announcements"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<JobReport, JobError> {
        let ids = self.store.expired_active_ids(now).await?;
        if ids.is_empty() {
            log::info!("📭 Süresi dolan duyuru yok");
            return Ok(JobReport::default());
        }

        let updated = self.store.deactivate_all(&ids).await?;
        log::info!("📪 {} duyuru pasife alındı", updated);

        Ok(JobReport {
            scanned: ids.len(),
            affected: updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use apartman_shared::utilities::test::MockAnnouncementStore;

    use super::*;

    #[tokio::test]
    async fn deactivates_expired_active_announcements() {
        let store = Arc::new(MockAnnouncementStore::default());
        let now = Utc::now();
        store.seed("a1", 1, Some(now - Duration::hours(1)));
        store.seed("a2", 1, Some(now + Duration::hours(1)));
        store.seed("a3", 1, None);
        store.seed("a4", 0, Some(now - Duration::hours(1)));

        let job = ExpireAnnouncementsJob::new(store.clone());
        let report = job.run(now).await.unwrap();

        assert_eq!(report, JobReport { scanned: 1, affected: 1 });
        let entries = store.entries();
        assert_eq!(entries[0].1, 0, "expired announcement must go inactive");
        assert_eq!(entries[1].1, 1, "future expiry must stay active");
        assert_eq!(entries[2].1, 1, "no expiry means never expires");
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let store = Arc::new(MockAnnouncementStore::default());
        let now = Utc::now();
        store.seed("a1", 1, Some(now - Duration::hours(1)));

        let job = ExpireAnnouncementsJob::new(store.clone());
        job.run(now).await.unwrap();
        let report = job.run(now).await.unwrap();

        assert_eq!(report, JobReport::default());
    }
}
