//! Repository implementations
//!
//! Each repository exposes a trait for its entity plus a SQLx-backed
//! implementation that dispatches to SQLite or MySQL.

pub mod category;
pub mod comment;
pub mod settings;
pub mod user;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use settings::{SettingsRepository, SqlxSettingsRepository};
pub use user::{SqlxUserRepository, UserRepository};
