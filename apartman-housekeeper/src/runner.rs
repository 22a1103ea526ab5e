use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::jobs::{Job, JobError, JobReport};
use crate::schedule::Schedule;

/// A run that exceeds this is abandoned; the job gets its next slot anyway.
pub const JOB_BUDGET: StdDuration = StdDuration::from_secs(120);

#[derive(Debug)]
pub enum RunStatus {
    Completed(JobReport),
    Failed(JobError),
    TimedOut,
}

/// Owns the registered jobs and drives one sleep-until-slot loop per job.
pub struct JobRunner {
    jobs: Vec<(Schedule, Arc<dyn Job>)>,
    shutdown: Arc<Notify>,
}

impl JobRunner {
    pub fn new(shutdown: Arc<Notify>) -> Self {
        Self {
            jobs: Vec::new(),
            shutdown,
        }
    }

    pub fn register(&mut self, schedule: Schedule, job: Arc<dyn Job>) {
        info!("🗓️ {} kaydedildi ({})", job.name(), schedule);
        self.jobs.push((schedule, job));
    }

    pub fn spawn_all(self) -> Vec<JoinHandle<()>> {
        let JobRunner { jobs, shutdown } = self;
        jobs.into_iter()
            .map(|(schedule, job)| {
                let shutdown = shutdown.clone();
                tokio::spawn(run_loop(schedule, job, shutdown))
            })
            .collect()
    }
}

async fn run_loop(schedule: Schedule, job: Arc<dyn Job>, shutdown: Arc<Notify>) {
    loop {
        let stop = shutdown.notified();
        tokio::pin!(stop);

        let now = Utc::now();
        let next = schedule.next_after(now);
        let wait = (next - now).to_std().unwrap_or(StdDuration::ZERO);
        info!("⏳ {}: sıradaki çalışma {}", job.name(), next);

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = &mut stop => {
                info!("🛑 {}: kapanış sinyali alındı", job.name());
                return;
            }
        }

        run_once(job.as_ref(), Utc::now()).await;

        // A signal that arrived mid-run landed on the already registered
        // future; drain it here instead of sleeping until the next slot.
        if tokio::time::timeout(StdDuration::ZERO, &mut stop).await.is_ok() {
            info!("🛑 {}: kapanış sinyali alındı", job.name());
            return;
        }
    }
}

/// One budgeted run. Failures are logged and swallowed so a bad run never
/// kills the loop.
pub async fn run_once(job: &dyn Job, now: DateTime<Utc>) -> RunStatus {
    info!("▶️ {} başlıyor", job.name());
    match tokio::time::timeout(JOB_BUDGET, job.run(now)).await {
        Ok(Ok(report)) => {
            info!(
                "✅ {} bitti: {} tarandı, {} değişti",
                job.name(),
                report.scanned,
                report.affected
            );
            RunStatus::Completed(report)
        }
        Ok(Err(e)) => {
            error!("❌ {} başarısız: {}", job.name(), e);
            RunStatus::Failed(e)
        }
        Err(_) => {
            error!("⏰ {} zaman bütçesini aştı", job.name());
            RunStatus::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use super::*;

    struct SlowJob;

    #[async_trait]
    impl Job for SlowJob {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn run(&self, _now: DateTime<Utc>) -> Result<JobReport, JobError> {
            tokio::time::sleep(JOB_BUDGET + StdDuration::from_secs(1)).await;
            Ok(JobReport::default())
        }
    }

    struct QuickJob;

    #[async_trait]
    impl Job for QuickJob {
        fn name(&self) -> &'static str {
            "quick"
        }

        async fn run(&self, _now: DateTime<Utc>) -> Result<JobReport, JobError> {
            Ok(JobReport {
                scanned: 3,
                affected: 1,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn overrunning_job_is_cut_off_at_the_budget() {
        let status = run_once(&SlowJob, Utc::now()).await;
        assert!(matches!(status, RunStatus::TimedOut));
    }

    #[tokio::test]
    async fn completed_run_reports_counters() {
        let status = run_once(&QuickJob, Utc::now()).await;
        match status {
            RunStatus::Completed(report) => {
                assert_eq!(report, JobReport { scanned: 3, affected: 1 })
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    struct BlockingJob {
        started: Arc<tokio::sync::Notify>,
        release: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl Job for BlockingJob {
        fn name(&self) -> &'static str {
            "blocking"
        }

        async fn run(&self, _now: DateTime<Utc>) -> Result<JobReport, JobError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(JobReport::default())
        }
    }

    #[tokio::test]
    async fn shutdown_stops_a_waiting_loop() {
        let shutdown = Arc::new(tokio::sync::Notify::new());
        let mut runner = JobRunner::new(shutdown.clone());
        runner.register(
            crate::schedule::Schedule::Daily { hour: 0, minute: 0 },
            Arc::new(QuickJob),
        );

        let handles = runner.spawn_all();
        // notify_one stores a permit, so the loop sees it even if it has not
        // reached its select yet.
        shutdown.notify_one();
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_arriving_mid_run_is_not_missed() {
        let started = Arc::new(tokio::sync::Notify::new());
        let release = Arc::new(tokio::sync::Notify::new());
        let shutdown = Arc::new(tokio::sync::Notify::new());

        let mut runner = JobRunner::new(shutdown.clone());
        runner.register(
            crate::schedule::Schedule::Daily { hour: 0, minute: 0 },
            Arc::new(BlockingJob {
                started: started.clone(),
                release: release.clone(),
            }),
        );
        let handles = runner.spawn_all();

        started.notified().await;
        // The loop is inside run_once, so no task is parked on the select.
        shutdown.notify_waiters();
        release.notify_one();

        for handle in handles {
            handle.await.unwrap();
        }
    }
}
