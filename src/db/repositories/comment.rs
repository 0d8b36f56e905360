//! Comment repository
//!
//! Database operations for comments.
//!
//! This module provides:
//! - `CommentRepository` trait defining the interface for comment data access
//! - `SqlxCommentRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Comment;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment (the `id` and `created_at` fields are assigned)
    async fn create(&self, comment: &Comment) -> Result<Comment>;

    /// Get comment by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// Get comments matching the given IDs; missing IDs are skipped
    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Comment>>;

    /// List all comments, newest first
    async fn list(&self) -> Result<Vec<Comment>>;

    /// List passed comments for an article, oldest first
    async fn list_passed_by_article(&self, article_id: i64) -> Result<Vec<Comment>>;

    /// Update a comment
    async fn update(&self, comment: &Comment) -> Result<Comment>;

    /// Delete a comment
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based comment repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    /// Create a new SQLx comment repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<Comment> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_comment_sqlite(self.pool.as_sqlite().unwrap(), comment).await
            }
            DatabaseDriver::Mysql => {
                create_comment_mysql(self.pool.as_mysql().unwrap(), comment).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_comment_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_comment_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Comment>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_comments_by_ids_sqlite(self.pool.as_sqlite().unwrap(), ids).await
            }
            DatabaseDriver::Mysql => {
                get_comments_by_ids_mysql(self.pool.as_mysql().unwrap(), ids).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_comments_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_comments_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn list_passed_by_article(&self, article_id: i64) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_passed_by_article_sqlite(self.pool.as_sqlite().unwrap(), article_id).await
            }
            DatabaseDriver::Mysql => {
                list_passed_by_article_mysql(self.pool.as_mysql().unwrap(), article_id).await
            }
        }
    }

    async fn update(&self, comment: &Comment) -> Result<Comment> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_comment_sqlite(self.pool.as_sqlite().unwrap(), comment).await
            }
            DatabaseDriver::Mysql => {
                update_comment_mysql(self.pool.as_mysql().unwrap(), comment).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_comment_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_comment_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_comment_sqlite(pool: &SqlitePool, comment: &Comment) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO comments (article_id, parent_comment_id, name, email, content, html, pass, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(comment.article_id)
    .bind(comment.parent_comment_id)
    .bind(&comment.name)
    .bind(&comment.email)
    .bind(&comment.content)
    .bind(&comment.html)
    .bind(comment.pass)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_rowid(),
        created_at: now,
        ..comment.clone()
    })
}

async fn get_comment_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(
        r#"
        SELECT id, article_id, parent_comment_id, name, email, content, html, pass, created_at
        FROM comments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get comment by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_comment_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_comments_by_ids_sqlite(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<Comment>> {
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, article_id, parent_comment_id, name, email, content, html, pass, created_at \
         FROM comments WHERE id IN ({}) ORDER BY id ASC",
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get comments by IDs")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_sqlite(&row)?);
    }

    Ok(comments)
}

async fn list_comments_sqlite(pool: &SqlitePool) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, parent_comment_id, name, email, content, html, pass, created_at
        FROM comments
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_sqlite(&row)?);
    }

    Ok(comments)
}

async fn list_passed_by_article_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, parent_comment_id, name, email, content, html, pass, created_at
        FROM comments
        WHERE article_id = ? AND pass = 1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments for article")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_sqlite(&row)?);
    }

    Ok(comments)
}

async fn update_comment_sqlite(pool: &SqlitePool, comment: &Comment) -> Result<Comment> {
    sqlx::query(
        r#"
        UPDATE comments
        SET parent_comment_id = ?, name = ?, email = ?, content = ?, html = ?, pass = ?
        WHERE id = ?
        "#,
    )
    .bind(comment.parent_comment_id)
    .bind(&comment.name)
    .bind(&comment.email)
    .bind(&comment.content)
    .bind(&comment.html)
    .bind(comment.pass)
    .bind(comment.id)
    .execute(pool)
    .await
    .context("Failed to update comment")?;

    get_comment_by_id_sqlite(pool, comment.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Comment not found after update"))
}

async fn delete_comment_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete comment")?;

    Ok(())
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        article_id: row.get("article_id"),
        parent_comment_id: row.get("parent_comment_id"),
        name: row.get("name"),
        email: row.get("email"),
        content: row.get("content"),
        html: row.get("html"),
        pass: row.get("pass"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_comment_mysql(pool: &MySqlPool, comment: &Comment) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO comments (article_id, parent_comment_id, name, email, content, html, pass, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(comment.article_id)
    .bind(comment.parent_comment_id)
    .bind(&comment.name)
    .bind(&comment.email)
    .bind(&comment.content)
    .bind(&comment.html)
    .bind(comment.pass)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_id() as i64,
        created_at: now,
        ..comment.clone()
    })
}

async fn get_comment_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(
        r#"
        SELECT id, article_id, parent_comment_id, name, email, content, html, pass, created_at
        FROM comments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get comment by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_comment_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_comments_by_ids_mysql(pool: &MySqlPool, ids: &[i64]) -> Result<Vec<Comment>> {
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, article_id, parent_comment_id, name, email, content, html, pass, created_at \
         FROM comments WHERE id IN ({}) ORDER BY id ASC",
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to get comments by IDs")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_mysql(&row)?);
    }

    Ok(comments)
}

async fn list_comments_mysql(pool: &MySqlPool) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, parent_comment_id, name, email, content, html, pass, created_at
        FROM comments
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_mysql(&row)?);
    }

    Ok(comments)
}

async fn list_passed_by_article_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, parent_comment_id, name, email, content, html, pass, created_at
        FROM comments
        WHERE article_id = ? AND pass = 1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments for article")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_mysql(&row)?);
    }

    Ok(comments)
}

async fn update_comment_mysql(pool: &MySqlPool, comment: &Comment) -> Result<Comment> {
    sqlx::query(
        r#"
        UPDATE comments
        SET parent_comment_id = ?, name = ?, email = ?, content = ?, html = ?, pass = ?
        WHERE id = ?
        "#,
    )
    .bind(comment.parent_comment_id)
    .bind(&comment.name)
    .bind(&comment.email)
    .bind(&comment.content)
    .bind(&comment.html)
    .bind(comment.pass)
    .bind(comment.id)
    .execute(pool)
    .await
    .context("Failed to update comment")?;

    get_comment_by_id_mysql(pool, comment.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Comment not found after update"))
}

async fn delete_comment_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete comment")?;

    Ok(())
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        article_id: row.get("article_id"),
        parent_comment_id: row.get("parent_comment_id"),
        name: row.get("name"),
        email: row.get("email"),
        content: row.get("content"),
        html: row.get("html"),
        pass: row.get("pass"),
        created_at: row.get("created_at"),
    })
}
