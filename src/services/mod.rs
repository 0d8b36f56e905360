//! Business logic services

pub mod category;
pub mod comment;
pub mod mailer;
pub mod markdown;
pub mod settings;
pub mod user;

pub use category::{CategoryService, CategoryServiceError};
pub use comment::{build_tree, CommentService, CommentServiceError};
pub use mailer::{EmailMessage, Mailer, SmtpMailer};
pub use markdown::MarkdownRenderer;
pub use settings::{NotificationSettings, SettingsService};
pub use user::UserService;
