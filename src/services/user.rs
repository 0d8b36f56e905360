//! User service
//!
//! Only the owner lookup is exposed: the first registered user is the
//! site owner and receives new-comment notifications.

use crate::db::repositories::UserRepository;
use anyhow::Result;
use std::sync::Arc;

/// User service
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Email address of the site owner, if any user exists
    pub async fn owner_email(&self) -> Result<Option<String>> {
        Ok(self.repo.get_first().await?.map(|u| u.email))
    }
}
