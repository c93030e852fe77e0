//! Comment sources: where comments come from and where replies go.

use crate::error::{BotError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub author: Option<String>,
    pub body: String,
    pub created: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self { id: id.into(), author: None, body: body.into(), created: None }
    }
}

/// A live, ordered sequence of comments plus a way to answer them.
#[async_trait]
pub trait CommentSource: Send {
    /// Next comment. `Ok(None)` means the source is exhausted.
    async fn next_comment(&mut self) -> Result<Option<Comment>>;

    async fn reply(&mut self, comment: &Comment, body: &str) -> Result<()>;
}

/// Reply recorded by [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub comment_id: String,
    pub body: String,
}

/// Finite in-memory source. Replies are recorded in a shared log so callers
/// can inspect them after the source has been moved into the bot.
#[derive(Debug, Default)]
pub struct MemorySource {
    queue: VecDeque<Comment>,
    sent: Arc<Mutex<Vec<SentReply>>>,
    fail_replies_for: Vec<String>,
}

impl MemorySource {
    pub fn new(comments: impl IntoIterator<Item = Comment>) -> Self {
        Self { queue: comments.into_iter().collect(), ..Default::default() }
    }

    /// Replies to these ids fail with an API error.
    pub fn failing_replies(mut self, ids: &[&str]) -> Self {
        self.fail_replies_for = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn sent(&self) -> Arc<Mutex<Vec<SentReply>>> {
        self.sent.clone()
    }
}

#[async_trait]
impl CommentSource for MemorySource {
    async fn next_comment(&mut self) -> Result<Option<Comment>> {
        Ok(self.queue.pop_front())
    }

    async fn reply(&mut self, comment: &Comment, body: &str) -> Result<()> {
        if self.fail_replies_for.contains(&comment.id) {
            return Err(BotError::Api { status: 500, message: format!("reply to {} refused", comment.id) });
        }
        self.sent
            .lock()
            .map_err(|_| BotError::Source("reply log poisoned".into()))?
            .push(SentReply { comment_id: comment.id.clone(), body: body.to_string() });
        Ok(())
    }
}
