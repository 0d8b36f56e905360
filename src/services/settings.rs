//! Settings service
//!
//! Thin layer over the settings repository. Notification settings are
//! read fresh on every send so admin changes take effect immediately.

use crate::db::repositories::SettingsRepository;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Setting key for the notification from-address
pub const SMTP_FROM_USER_KEY: &str = "smtp_from_user";
/// Setting key for the public site URL used in email links
pub const SYSTEM_URL_KEY: &str = "system_url";

/// The settings the notification path needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSettings {
    pub smtp_from_user: Option<String>,
    pub system_url: Option<String>,
}

/// Settings service
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Get a single setting value
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.repo.get(key).await
    }

    /// Set a setting value
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.repo.set(key, value).await
    }

    /// Read the settings the comment notification needs
    pub async fn notification_settings(&self) -> Result<NotificationSettings> {
        let mut values = self
            .repo
            .get_many(&[SMTP_FROM_USER_KEY, SYSTEM_URL_KEY])
            .await
            .context("Failed to read notification settings")?;

        Ok(NotificationSettings {
            smtp_from_user: values.remove(SMTP_FROM_USER_KEY),
            system_url: values.remove(SYSTEM_URL_KEY),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxSettingsRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> SettingsService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SettingsService::new(SqlxSettingsRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_notification_settings_empty() {
        let service = setup_test_service().await;

        let settings = service
            .notification_settings()
            .await
            .expect("Failed to read settings");

        assert!(settings.smtp_from_user.is_none());
        assert!(settings.system_url.is_none());
    }

    #[tokio::test]
    async fn test_notification_settings_populated() {
        let service = setup_test_service().await;

        service
            .set(SMTP_FROM_USER_KEY, "noreply@example.com")
            .await
            .expect("Failed to set");
        service
            .set(SYSTEM_URL_KEY, "https://blog.example.com")
            .await
            .expect("Failed to set");

        let settings = service
            .notification_settings()
            .await
            .expect("Failed to read settings");

        assert_eq!(
            settings.smtp_from_user.as_deref(),
            Some("noreply@example.com")
        );
        assert_eq!(
            settings.system_url.as_deref(),
            Some("https://blog.example.com")
        );
    }
}
