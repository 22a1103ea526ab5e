use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use chrono::Weekday;
use tokio::signal;
use tokio::sync::Notify;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use apartman_shared::repositories::announcement_repository::DynamoAnnouncementStore;
use apartman_shared::repositories::audit_log::DynamoAuditLog;
use apartman_shared::repositories::payment_repository::DynamoPaymentStore;
use apartman_shared::repositories::settings_repository::DynamoSettingsStore;
use apartman_shared::repositories::token_registry::DynamoTokenRegistry;
use apartman_shared::repositories::user_repository::DynamoUserDirectory;
use apartman_shared::utilities::config;

use crate::jobs::expire_announcements::ExpireAnnouncementsJob;
use crate::jobs::monthly_dues::MonthlyDuesJob;
use crate::jobs::purge_stale_tokens::PurgeStaleTokensJob;
use crate::runner::JobRunner;
use crate::schedule::Schedule;

mod jobs;
mod runner;
mod schedule;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::init();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Apartman Housekeeper başlıyor...");

    let aws_config = aws_config::load_from_env().await;
    let dynamo = Arc::new(DynamoDbClient::new(&aws_config));

    let announcements = Arc::new(DynamoAnnouncementStore::new(
        dynamo.clone(),
        config::get_announcements_table(),
    ));
    let registry = Arc::new(DynamoTokenRegistry::new(
        dynamo.clone(),
        config::get_tokens_table(),
    ));
    let users = Arc::new(DynamoUserDirectory::new(
        dynamo.clone(),
        config::get_users_table(),
    ));
    let payments = Arc::new(DynamoPaymentStore::new(
        dynamo.clone(),
        config::get_payments_table(),
    ));
    let settings = Arc::new(DynamoSettingsStore::new(
        dynamo.clone(),
        config::get_settings_table(),
    ));
    let audit = Arc::new(DynamoAuditLog::new(
        dynamo.clone(),
        config::get_notification_logs_table(),
        config::get_logs_table(),
    ));

    let shutdown_notify = Arc::new(Notify::new());
    let mut runner = JobRunner::new(shutdown_notify.clone());

    runner.register(
        Schedule::Daily { hour: 0, minute: 0 },
        Arc::new(ExpireAnnouncementsJob::new(announcements)),
    );
    runner.register(
        Schedule::Weekly {
            weekday: Weekday::Sun,
            hour: 4,
            minute: 0,
        },
        Arc::new(PurgeStaleTokensJob::new(registry, users.clone())),
    );
    runner.register(
        Schedule::MonthlyOnDay {
            day: 10,
            hour: 9,
            minute: 10,
        },
        Arc::new(MonthlyDuesJob::new(settings, users, payments, audit)),
    );

    let handles = runner.spawn_all();

    signal::ctrl_c().await?;
    info!("🛑 Kapanış sinyali alındı, görevler durduruluyor...");
    shutdown_notify.notify_waiters();

    for handle in handles {
        let _ = handle.await;
    }

    Ok(())
}
