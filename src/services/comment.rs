//! Comment service
//!
//! Business logic for visitor comments:
//! - Submission with required-field validation, Markdown rendering,
//!   and moderation gating (every new comment starts unapproved)
//! - Flat-to-tree assembly for the public article page
//! - Fire-and-forget email notification to the replied-to visitor or
//!   the site owner
//! - Merge-style update and no-op-safe delete

use crate::db::repositories::CommentRepository;
use crate::models::{Comment, CommentNode, CreateCommentInput, UpdateCommentInput};
use crate::services::mailer::{EmailMessage, Mailer};
use crate::services::markdown::MarkdownRenderer;
use crate::services::settings::SettingsService;
use crate::services::user::UserService;
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// A required submission field is missing or empty
    #[error("Missing required parameters")]
    MissingParams,

    /// Comment not found
    #[error("Comment not found: {0}")]
    NotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Comment service for managing article comments
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
    users: Arc<UserService>,
    settings: Arc<SettingsService>,
    mailer: Arc<dyn Mailer>,
    renderer: MarkdownRenderer,
}

impl CommentService {
    /// Create a new comment service
    pub fn new(
        repo: Arc<dyn CommentRepository>,
        users: Arc<UserService>,
        settings: Arc<SettingsService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            repo,
            users,
            settings,
            mailer,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Submit a new comment
    ///
    /// The content is rendered to HTML, the comment is stored unapproved,
    /// and a notification email is dispatched on a background task. A send
    /// failure is logged and never affects the stored comment.
    ///
    /// # Errors
    /// - `MissingParams` if `article_id`, `name`, `email`, or `content`
    ///   is absent or empty; nothing is written in that case.
    pub async fn create(&self, input: CreateCommentInput) -> Result<Comment, CommentServiceError> {
        let article_id = input.article_id.ok_or(CommentServiceError::MissingParams)?;
        let name = require_field(input.name)?;
        let email = require_field(input.email)?;
        let content = require_field(input.content)?;

        let html = self.renderer.render(&content);

        let comment = Comment {
            id: 0,
            article_id,
            parent_comment_id: input.parent_comment_id,
            name,
            email,
            content,
            html,
            pass: false,
            created_at: Utc::now(),
        };

        let created = self
            .repo
            .create(&comment)
            .await
            .context("Failed to create comment")?;

        tracing::debug!(id = created.id, article_id, "Created comment");
        self.spawn_notification(created.clone(), input.reply);

        Ok(created)
    }

    /// Approved comments of one article, as a reply tree
    pub async fn get_article_comments(
        &self,
        article_id: i64,
    ) -> Result<Vec<CommentNode>, CommentServiceError> {
        let comments = self
            .repo
            .list_passed_by_article(article_id)
            .await
            .context("Failed to list article comments")?;

        Ok(build_tree(comments))
    }

    /// All comments, newest first
    pub async fn find_all(&self) -> Result<Vec<Comment>, CommentServiceError> {
        Ok(self.repo.list().await.context("Failed to list comments")?)
    }

    /// Look up a single comment; absent ids yield `Ok(None)`
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, CommentServiceError> {
        Ok(self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get comment")?)
    }

    /// Batch lookup; missing ids are simply absent from the result
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Comment>, CommentServiceError> {
        Ok(self
            .repo
            .get_by_ids(ids)
            .await
            .context("Failed to get comments")?)
    }

    /// Update a comment, merging present fields over the stored record
    ///
    /// Changing `content` re-renders the stored HTML.
    ///
    /// # Errors
    /// - `NotFound` if the id does not exist.
    pub async fn update_by_id(
        &self,
        id: i64,
        patch: UpdateCommentInput,
    ) -> Result<Comment, CommentServiceError> {
        let mut comment = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get comment")?
            .ok_or(CommentServiceError::NotFound(id))?;

        if let Some(name) = patch.name {
            comment.name = name;
        }
        if let Some(email) = patch.email {
            comment.email = email;
        }
        if let Some(content) = patch.content {
            comment.html = self.renderer.render(&content);
            comment.content = content;
        }
        if let Some(parent_id) = patch.parent_comment_id {
            comment.parent_comment_id = Some(parent_id);
        }
        if let Some(pass) = patch.pass {
            comment.pass = pass;
        }

        let updated = self
            .repo
            .update(&comment)
            .await
            .context("Failed to update comment")?;

        Ok(updated)
    }

    /// Delete a comment; returns false when the id was already absent
    ///
    /// Replies are not cascaded: they become orphans and are promoted to
    /// roots on the next tree build.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, CommentServiceError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get comment")?;

        if existing.is_none() {
            return Ok(false);
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete comment")?;

        tracing::debug!(id, "Deleted comment");
        Ok(true)
    }

    /// Dispatch the notification email without blocking the caller
    fn spawn_notification(&self, comment: Comment, reply: Option<String>) {
        let users = self.users.clone();
        let settings = self.settings.clone();
        let mailer = self.mailer.clone();

        tokio::spawn(async move {
            if let Err(e) = notify(users, settings, mailer, comment, reply).await {
                tracing::warn!(error = %e, "Failed to send comment notification");
            }
        });
    }
}

fn require_field(value: Option<String>) -> Result<String, CommentServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CommentServiceError::MissingParams),
    }
}

/// Resolve recipient and content, then send the notification email.
///
/// A reply notification goes to the replied-to visitor; otherwise the
/// site owner is notified, falling back to the from-address when no
/// user is registered yet.
async fn notify(
    users: Arc<UserService>,
    settings: Arc<SettingsService>,
    mailer: Arc<dyn Mailer>,
    comment: Comment,
    reply: Option<String>,
) -> Result<()> {
    let notification = settings.notification_settings().await?;
    let from = notification.smtp_from_user.unwrap_or_default();
    let system_url = notification.system_url.unwrap_or_default();

    let message = match reply {
        Some(to) => reply_notification(&from, &to, &system_url, comment.article_id),
        None => {
            let to = users.owner_email().await?.unwrap_or_else(|| from.clone());
            new_comment_notification(&from, &to, &system_url, &comment)
        }
    };

    mailer.send(message).await
}

/// Email telling a visitor their comment received a reply
pub fn reply_notification(
    from: &str,
    to: &str,
    system_url: &str,
    article_id: i64,
) -> EmailMessage {
    let article_link = format!("{}/article/{}", system_url, article_id);
    let page_link = format!("{}/page/{}", system_url, article_id);

    EmailMessage {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Your comment has a new reply".to_string(),
        html: format!(
            "<p>Your comment has a new reply. View it at \
             <a href=\"{0}\">{0}</a> or <a href=\"{1}\">{1}</a>.</p>",
            article_link, page_link
        ),
    }
}

/// Email telling the site owner a new comment is awaiting moderation
pub fn new_comment_notification(
    from: &str,
    to: &str,
    system_url: &str,
    comment: &Comment,
) -> EmailMessage {
    let admin_link = format!("{}/admin/comment", system_url);

    EmailMessage {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Your blog has a new comment".to_string(),
        html: format!(
            "<p><strong>{name}</strong> left a new comment:</p>\
             <blockquote>{content}</blockquote>\
             <p>Review it at <a href=\"{link}\">{link}</a>.</p>",
            name = comment.name,
            content = comment.content,
            link = admin_link,
        ),
    }
}

/// Assemble a flat comment list into a reply tree.
///
/// A comment whose parent is present in the input becomes that parent's
/// child; a comment whose parent is missing from the input is promoted
/// to a root. Comments caught in a parent cycle (reachable from no
/// root) are promoted as well once the regular roots are attached, so
/// no comment is ever dropped. Input order is preserved among roots and
/// among siblings.
pub fn build_tree(comments: Vec<Comment>) -> Vec<CommentNode> {
    let input_order: Vec<i64> = comments.iter().map(|c| c.id).collect();
    let ids: HashSet<i64> = input_order.iter().copied().collect();

    let mut root_ids: Vec<i64> = Vec::new();
    let mut child_ids: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut by_id: HashMap<i64, Comment> = HashMap::new();

    for comment in comments {
        match comment.parent_comment_id {
            Some(parent_id) if ids.contains(&parent_id) && parent_id != comment.id => {
                child_ids.entry(parent_id).or_default().push(comment.id);
            }
            _ => root_ids.push(comment.id),
        }
        by_id.insert(comment.id, comment);
    }

    // A node already consumed by an earlier attach yields None
    fn attach(
        id: i64,
        by_id: &mut HashMap<i64, Comment>,
        child_ids: &HashMap<i64, Vec<i64>>,
    ) -> Option<CommentNode> {
        let comment = by_id.remove(&id)?;
        let nodes = child_ids
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|kid| attach(*kid, by_id, child_ids))
            .collect();
        Some(CommentNode::with_children(comment, nodes))
    }

    let mut tree: Vec<CommentNode> = root_ids
        .iter()
        .filter_map(|id| attach(*id, &mut by_id, &child_ids))
        .collect();

    // Whatever the root pass could not reach sits in a parent cycle;
    // promote those nodes in input order instead of losing them.
    for id in input_order {
        if by_id.contains_key(&id) {
            if let Some(node) = attach(id, &mut by_id, &child_ids) {
                tree.push(node);
            }
        }
    }

    tree
}
