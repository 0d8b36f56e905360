//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity
///
/// The first registered user is the site owner and receives new-comment
/// notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
