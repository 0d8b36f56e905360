//! Domain models

pub mod category;
pub mod comment;
pub mod user;

pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use comment::{Comment, CommentNode, CreateCommentInput, UpdateCommentInput};
pub use user::User;
