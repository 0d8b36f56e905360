//! Settings repository
//!
//! Key-value storage for site settings such as the notification
//! from-address and the public site URL.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

/// Settings repository trait
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Get a setting value by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Get several settings in one query; missing keys are absent
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, String>>;

    /// Set a setting value, inserting or updating as needed
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLx-based settings repository implementation
pub struct SqlxSettingsRepository {
    pool: DynDatabasePool,
}

impl SqlxSettingsRepository {
    /// Create a new SQLx settings repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SettingsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SettingsRepository for SqlxSettingsRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_sqlite(self.pool.as_sqlite().unwrap(), key).await,
            DatabaseDriver::Mysql => get_mysql(self.pool.as_mysql().unwrap(), key).await,
        }
    }

    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_many_sqlite(self.pool.as_sqlite().unwrap(), keys).await,
            DatabaseDriver::Mysql => get_many_mysql(self.pool.as_mysql().unwrap(), keys).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => set_sqlite(self.pool.as_sqlite().unwrap(), key, value).await,
            DatabaseDriver::Mysql => set_mysql(self.pool.as_mysql().unwrap(), key, value).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_sqlite(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .context("Failed to get setting")?;

    Ok(row.map(|r| r.get("value")))
}

async fn get_many_sqlite(pool: &SqlitePool, keys: &[&str]) -> Result<HashMap<String, String>> {
    let placeholders = vec!["?"; keys.len()].join(", ");
    let sql = format!(
        "SELECT key, value FROM settings WHERE key IN ({})",
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for key in keys {
        query = query.bind(*key);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get settings")?;

    Ok(rows
        .into_iter()
        .map(|r| (r.get("key"), r.get("value")))
        .collect())
}

async fn set_sqlite(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to set setting")?;

    Ok(())
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_mysql(pool: &MySqlPool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM settings WHERE `key` = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .context("Failed to get setting")?;

    Ok(row.map(|r| r.get("value")))
}

async fn get_many_mysql(pool: &MySqlPool, keys: &[&str]) -> Result<HashMap<String, String>> {
    let placeholders = vec!["?"; keys.len()].join(", ");
    let sql = format!(
        "SELECT `key`, value FROM settings WHERE `key` IN ({})",
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for key in keys {
        query = query.bind(*key);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get settings")?;

    Ok(rows
        .into_iter()
        .map(|r| (r.get("key"), r.get("value")))
        .collect())
}

async fn set_mysql(pool: &MySqlPool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (`key`, value, updated_at) VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE value = VALUES(value), updated_at = VALUES(updated_at)
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to set setting")?;

    Ok(())
}
