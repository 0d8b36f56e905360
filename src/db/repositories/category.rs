//! Category repository
//!
//! Database operations for categories.
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Category;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category with the given label
    async fn create(&self, label: &str) -> Result<Category>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Get categories matching the given IDs; missing IDs are skipped
    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Category>>;

    /// List all categories, oldest first
    async fn list(&self) -> Result<Vec<Category>>;

    /// Update a category
    async fn update(&self, category: &Category) -> Result<Category>;

    /// Delete a category
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check if a category label already exists
    async fn exists_by_label(&self, label: &str) -> Result<bool>;
}

/// SQLx-based category repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, label: &str) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_category_sqlite(self.pool.as_sqlite().unwrap(), label).await
            }
            DatabaseDriver::Mysql => {
                create_category_mysql(self.pool.as_mysql().unwrap(), label).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_category_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_category_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_categories_by_ids_sqlite(self.pool.as_sqlite().unwrap(), ids).await
            }
            DatabaseDriver::Mysql => {
                get_categories_by_ids_mysql(self.pool.as_mysql().unwrap(), ids).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_categories_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_categories_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_category_sqlite(self.pool.as_sqlite().unwrap(), category).await
            }
            DatabaseDriver::Mysql => {
                update_category_mysql(self.pool.as_mysql().unwrap(), category).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_category_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_category_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn exists_by_label(&self, label: &str) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                exists_by_label_sqlite(self.pool.as_sqlite().unwrap(), label).await
            }
            DatabaseDriver::Mysql => {
                exists_by_label_mysql(self.pool.as_mysql().unwrap(), label).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_category_sqlite(pool: &SqlitePool, label: &str) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO categories (label, created_at) VALUES (?, ?)")
        .bind(label)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_rowid(),
        label: label.to_string(),
        created_at: now,
    })
}

async fn get_category_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query("SELECT id, label, created_at FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get category by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_category_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_categories_by_ids_sqlite(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<Category>> {
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, label, created_at FROM categories WHERE id IN ({}) ORDER BY id ASC",
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get categories by IDs")?;

    let mut categories = Vec::new();
    for row in rows {
        categories.push(row_to_category_sqlite(&row)?);
    }

    Ok(categories)
}

async fn list_categories_sqlite(pool: &SqlitePool) -> Result<Vec<Category>> {
    let rows = sqlx::query("SELECT id, label, created_at FROM categories ORDER BY created_at ASC, id ASC")
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    let mut categories = Vec::new();
    for row in rows {
        categories.push(row_to_category_sqlite(&row)?);
    }

    Ok(categories)
}

async fn update_category_sqlite(pool: &SqlitePool, category: &Category) -> Result<Category> {
    sqlx::query("UPDATE categories SET label = ? WHERE id = ?")
        .bind(&category.label)
        .bind(category.id)
        .execute(pool)
        .await
        .context("Failed to update category")?;

    get_category_by_id_sqlite(pool, category.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Category not found after update"))
}

async fn delete_category_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete category")?;

    Ok(())
}

async fn exists_by_label_sqlite(pool: &SqlitePool, label: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM categories WHERE label = ?")
        .bind(label)
        .fetch_one(pool)
        .await
        .context("Failed to check category label existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

fn row_to_category_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        label: row.get("label"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_category_mysql(pool: &MySqlPool, label: &str) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO categories (label, created_at) VALUES (?, ?)")
        .bind(label)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_id() as i64,
        label: label.to_string(),
        created_at: now,
    })
}

async fn get_category_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query("SELECT id, label, created_at FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get category by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_category_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_categories_by_ids_mysql(pool: &MySqlPool, ids: &[i64]) -> Result<Vec<Category>> {
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, label, created_at FROM categories WHERE id IN ({}) ORDER BY id ASC",
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get categories by IDs")?;

    let mut categories = Vec::new();
    for row in rows {
        categories.push(row_to_category_mysql(&row)?);
    }

    Ok(categories)
}

async fn list_categories_mysql(pool: &MySqlPool) -> Result<Vec<Category>> {
    let rows = sqlx::query("SELECT id, label, created_at FROM categories ORDER BY created_at ASC, id ASC")
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    let mut categories = Vec::new();
    for row in rows {
        categories.push(row_to_category_mysql(&row)?);
    }

    Ok(categories)
}

async fn update_category_mysql(pool: &MySqlPool, category: &Category) -> Result<Category> {
    sqlx::query("UPDATE categories SET label = ? WHERE id = ?")
        .bind(&category.label)
        .bind(category.id)
        .execute(pool)
        .await
        .context("Failed to update category")?;

    get_category_by_id_mysql(pool, category.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Category not found after update"))
}

async fn delete_category_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete category")?;

    Ok(())
}

async fn exists_by_label_mysql(pool: &MySqlPool, label: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM categories WHERE label = ?")
        .bind(label)
        .fetch_one(pool)
        .await
        .context("Failed to check category label existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

fn row_to_category_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        label: row.get("label"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (DynDatabasePool, SqlxCategoryRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxCategoryRepository::new(pool.clone());
        (pool, repo)
    }

    #[tokio::test]
    async fn test_create_category() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo.create("Tech").await.expect("Failed to create category");

        assert!(created.id > 0);
        assert_eq!(created.label, "Tech");
    }

    #[tokio::test]
    async fn test_get_category_by_id() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create("Life").await.expect("Failed to create category");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get category")
            .expect("Category not found");

        assert_eq!(found.id, created.id);
        assert_eq!(found.label, "Life");
    }

    #[tokio::test]
    async fn test_get_category_by_id_not_found() {
        let (_pool, repo) = setup_test_repo().await;

        let found = repo.get_by_id(99999).await.expect("Failed to get category");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_categories_oldest_first() {
        let (_pool, repo) = setup_test_repo().await;

        let first = repo.create("First").await.expect("Failed to create");
        let second = repo.create("Second").await.expect("Failed to create");
        let third = repo.create("Third").await.expect("Failed to create");

        let categories = repo.list().await.expect("Failed to list categories");

        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].id, first.id);
        assert_eq!(categories[1].id, second.id);
        assert_eq!(categories[2].id, third.id);
    }

    #[tokio::test]
    async fn test_get_categories_by_ids() {
        let (_pool, repo) = setup_test_repo().await;

        let a = repo.create("A").await.expect("Failed to create");
        let b = repo.create("B").await.expect("Failed to create");
        repo.create("C").await.expect("Failed to create");

        let found = repo
            .get_by_ids(&[a.id, b.id, 99999])
            .await
            .expect("Failed to get by ids");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, a.id);
        assert_eq!(found[1].id, b.id);
    }

    #[tokio::test]
    async fn test_get_categories_by_ids_empty() {
        let (_pool, repo) = setup_test_repo().await;

        let found = repo.get_by_ids(&[]).await.expect("Failed to get by ids");

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_update_category() {
        let (_pool, repo) = setup_test_repo().await;
        let mut created = repo.create("Old Label").await.expect("Failed to create");

        created.label = "New Label".to_string();
        let updated = repo.update(&created).await.expect("Failed to update");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.label, "New Label");
    }

    #[tokio::test]
    async fn test_delete_category() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create("Delete Me").await.expect("Failed to create");

        repo.delete(created.id).await.expect("Failed to delete");

        let found = repo.get_by_id(created.id).await.expect("Failed to get");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_category_is_noop() {
        let (_pool, repo) = setup_test_repo().await;

        repo.delete(99999).await.expect("Delete should not fail");
    }

    #[tokio::test]
    async fn test_exists_by_label() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create("Existing").await.expect("Failed to create");

        assert!(repo
            .exists_by_label("Existing")
            .await
            .expect("Failed to check"));
        assert!(!repo
            .exists_by_label("Missing")
            .await
            .expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_unique_label_constraint() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create("Duplicate").await.expect("Failed to create first");

        let result = repo.create("Duplicate").await;

        assert!(result.is_err(), "Should fail due to duplicate label");
    }
}
