//! User repository
//!
//! Database operations for users. Only the site owner lookup is needed
//! by the notification path; `create` exists for provisioning.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, name: &str, email: &str) -> Result<User>;

    /// Get the first registered user (the site owner), if any
    async fn get_first(&self) -> Result<Option<User>>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, name: &str, email: &str) -> Result<User> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_user_sqlite(self.pool.as_sqlite().unwrap(), name, email).await
            }
            DatabaseDriver::Mysql => {
                create_user_mysql(self.pool.as_mysql().unwrap(), name, email).await
            }
        }
    }

    async fn get_first(&self) -> Result<Option<User>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_first_user_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => get_first_user_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_user_sqlite(pool: &SqlitePool, name: &str, email: &str) -> Result<User> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO users (name, email, created_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(email)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
        created_at: now,
    })
}

async fn get_first_user_sqlite(pool: &SqlitePool) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, name, email, created_at FROM users ORDER BY id ASC LIMIT 1",
    )
    .fetch_optional(pool)
    .await
    .context("Failed to get first user")?;

    Ok(row.map(|row| User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }))
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_user_mysql(pool: &MySqlPool, name: &str, email: &str) -> Result<User> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO users (name, email, created_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(email)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_id() as i64,
        name: name.to_string(),
        email: email.to_string(),
        created_at: now,
    })
}

async fn get_first_user_mysql(pool: &MySqlPool) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, name, email, created_at FROM users ORDER BY id ASC LIMIT 1",
    )
    .fetch_optional(pool)
    .await
    .context("Failed to get first user")?;

    Ok(row.map(|row| User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }))
}
