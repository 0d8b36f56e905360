//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity
///
/// `html` is derived from `content` at write time. `pass` is the
/// moderation flag: only passed comments appear on the public article
/// page, and every comment starts out with `pass = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    pub parent_comment_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub content: String,
    pub html: String,
    pub pass: bool,
    pub created_at: DateTime<Utc>,
}

/// A comment with its nested replies, for display under an article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn new(comment: Comment) -> Self {
        Self {
            comment,
            children: Vec::new(),
        }
    }

    pub fn with_children(comment: Comment, children: Vec<CommentNode>) -> Self {
        Self { comment, children }
    }
}

/// Input for creating a comment
///
/// The required fields are optional here so that the service can report
/// which of them a caller left out, instead of failing deserialization.
/// `reply` is the address of the person being answered; when present the
/// notification goes to them instead of the site owner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCommentInput {
    pub article_id: Option<i64>,
    pub parent_comment_id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub content: Option<String>,
    pub reply: Option<String>,
}

/// Input for updating a comment
///
/// Fields left as `None` keep their stored value. Changing `content`
/// re-renders `html`; flipping `pass` to true is how a comment becomes
/// publicly visible.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCommentInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub content: Option<String>,
    pub parent_comment_id: Option<i64>,
    pub pass: Option<bool>,
}
