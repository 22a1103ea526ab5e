use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};

use apartman_shared::models::payment::Payment;
use apartman_shared::repositories::audit_log::{AuditLog, DuesRunLogEntry};
use apartman_shared::repositories::payment_repository::PaymentStore;
use apartman_shared::repositories::settings_repository::SettingsStore;
use apartman_shared::repositories::user_repository::UserDirectory;
use apartman_shared::utilities::formatting::month_name_tr;

use crate::jobs::{Job, JobError, JobReport};

/// Creates the month's dues payment for every resident. The payment id is
/// keyed on user and calendar month, so reruns within the same month insert
/// nothing and the job is safe to retry.
pub struct MonthlyDuesJob {
    settings: Arc<dyn SettingsStore>,
    users: Arc<dyn UserDirectory>,
    payments: Arc<dyn PaymentStore>,
    audit: Arc<dyn AuditLog>,
}

impl MonthlyDuesJob {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        users: Arc<dyn UserDirectory>,
        payments: Arc<dyn PaymentStore>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            settings,
            users,
            payments,
            audit,
        }
    }
}

#[async_trait]
impl Job for MonthlyDuesJob {
    fn name(&self) -> &'static str {
        "monthly-dues"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<JobReport, JobError> {
        let fee = self
            .settings
            .fee_amount()
            .await?
            .filter(|amount| *amount > 0.0)
            .ok_or(JobError::InvalidFeeSetting)?;

        let residents = self.users.residents().await?;
        log::info!(
            "💰 {} {} aidatı ({}) {} sakin için oluşturuluyor",
            month_name_tr(now.month()),
            now.year(),
            fee,
            residents.len()
        );

        let mut created = 0;
        for profile in &residents {
            let payment_id = Payment::dues_id(&profile.user_id, now.year(), now.month());
            let payment = Payment::monthly_dues(profile, fee, now);

            match self.payments.create_if_absent(&payment_id, &payment).await {
                Ok(true) => created += 1,
                Ok(false) => {
                    log::info!("💤 {} için bu ayın aidatı zaten mevcut", profile.user_id)
                }
                Err(e) => {
                    log::error!("💰 {} için aidat oluşturulamadı: {}", profile.user_id, e)
                }
            }
        }

        if created > 0 {
            let entry = DuesRunLogEntry {
                fee_amount: fee,
                user_count: created,
                month: month_name_tr(now.month()).to_string(),
                year: now.year(),
                timestamp: now,
            };
            if let Err(e) = self.audit.record_dues_run(&entry).await {
                log::error!("💰 Aidat çalışması kaydedilemedi: {}", e);
            }
        }

        log::info!("💰 Aidat bitti: {} yeni ödeme", created);

        Ok(JobReport {
            scanned: residents.len(),
            affected: created,
        })
    }
}
