//! Category service
//!
//! Business logic for category management:
//! - Create with label uniqueness validation
//! - List, single and batch lookup
//! - Merge-style update
//! - No-op-safe delete

use crate::db::repositories::CategoryRepository;
use crate::models::{Category, CreateCategoryInput, UpdateCategoryInput};
use anyhow::Context;
use std::sync::Arc;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category label already exists
    #[error("Category label already exists: {0}")]
    DuplicateLabel(String),

    /// Category not found
    #[error("Category not found: {0}")]
    NotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Category service for managing article categories
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Create a new category
    ///
    /// # Errors
    /// - `DuplicateLabel` if a category with the same label already
    ///   exists; nothing is written in that case.
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        if self
            .repo
            .exists_by_label(&input.label)
            .await
            .context("Failed to check label uniqueness")?
        {
            return Err(CategoryServiceError::DuplicateLabel(input.label));
        }

        let created = self
            .repo
            .create(&input.label)
            .await
            .context("Failed to create category")?;

        tracing::debug!(id = created.id, "Created category");
        Ok(created)
    }

    /// All categories, oldest first
    pub async fn find_all(&self) -> Result<Vec<Category>, CategoryServiceError> {
        Ok(self
            .repo
            .list()
            .await
            .context("Failed to list categories")?)
    }

    /// Look up a single category; absent ids yield `Ok(None)`
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>, CategoryServiceError> {
        Ok(self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?)
    }

    /// Batch lookup; missing ids are simply absent from the result
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Category>, CategoryServiceError> {
        Ok(self
            .repo
            .get_by_ids(ids)
            .await
            .context("Failed to get categories")?)
    }

    /// Update a category, merging present fields over the stored record
    ///
    /// # Errors
    /// - `NotFound` if the id does not exist.
    pub async fn update_by_id(
        &self,
        id: i64,
        patch: UpdateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .ok_or(CategoryServiceError::NotFound(id))?;

        if let Some(label) = patch.label {
            category.label = label;
        }

        let updated = self
            .repo
            .update(&category)
            .await
            .context("Failed to update category")?;

        Ok(updated)
    }

    /// Delete a category; returns false when the id was already absent
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, CategoryServiceError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?;

        if existing.is_none() {
            return Ok(false);
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete category")?;

        tracing::debug!(id, "Deleted category");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxCategoryRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> CategoryService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        CategoryService::new(SqlxCategoryRepository::boxed(pool))
    }

    fn input(label: &str) -> CreateCategoryInput {
        CreateCategoryInput {
            label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_category() {
        let service = setup_test_service().await;

        let created = service.create(input("Tech")).await.expect("Failed to create");

        assert!(created.id > 0);
        assert_eq!(created.label, "Tech");
    }

    #[tokio::test]
    async fn test_create_duplicate_label_rejected() {
        let service = setup_test_service().await;
        service.create(input("Tech")).await.expect("Failed to create");

        let result = service.create(input("Tech")).await;

        assert!(matches!(
            result,
            Err(CategoryServiceError::DuplicateLabel(label)) if label == "Tech"
        ));

        // The duplicate attempt must not have written anything
        let all = service.find_all().await.expect("Failed to list");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_oldest_first() {
        let service = setup_test_service().await;

        service.create(input("First")).await.expect("Failed to create");
        service.create(input("Second")).await.expect("Failed to create");

        let all = service.find_all().await.expect("Failed to list");

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].label, "First");
        assert_eq!(all[1].label, "Second");
    }

    #[tokio::test]
    async fn test_find_by_id_absent_is_none() {
        let service = setup_test_service().await;

        let found = service.find_by_id(12345).await.expect("Lookup failed");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_missing() {
        let service = setup_test_service().await;

        let a = service.create(input("A")).await.expect("Failed to create");
        let b = service.create(input("B")).await.expect("Failed to create");

        let found = service
            .find_by_ids(&[a.id, 99999, b.id])
            .await
            .expect("Lookup failed");

        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_present_fields() {
        let service = setup_test_service().await;
        let created = service.create(input("Old")).await.expect("Failed to create");

        let updated = service
            .update_by_id(
                created.id,
                UpdateCategoryInput {
                    label: Some("New".to_string()),
                },
            )
            .await
            .expect("Failed to update");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.label, "New");
    }

    #[tokio::test]
    async fn test_update_with_empty_patch_keeps_record() {
        let service = setup_test_service().await;
        let created = service.create(input("Keep")).await.expect("Failed to create");

        let updated = service
            .update_by_id(created.id, UpdateCategoryInput::default())
            .await
            .expect("Failed to update");

        assert_eq!(updated.label, "Keep");
    }

    #[tokio::test]
    async fn test_update_missing_category_is_not_found() {
        let service = setup_test_service().await;

        let result = service
            .update_by_id(
                404,
                UpdateCategoryInput {
                    label: Some("X".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(CategoryServiceError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_delete_existing_category() {
        let service = setup_test_service().await;
        let created = service.create(input("Bye")).await.expect("Failed to create");

        let deleted = service
            .delete_by_id(created.id)
            .await
            .expect("Failed to delete");

        assert!(deleted);
        assert!(service
            .find_by_id(created.id)
            .await
            .expect("Lookup failed")
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_noop() {
        let service = setup_test_service().await;

        let deleted = service.delete_by_id(777).await.expect("Failed to delete");

        assert!(!deleted);
    }
}
