//! Live comment stream: polls the subreddit's newest comments and yields each once.

use super::client::RedditClient;
use crate::bot::BotConfig;
use crate::core::consts::reddit::{MAX_POLL_DELAY_MS, MIN_POLL_DELAY_MS, STREAM_MEMORY};
use crate::error::{BotError, Result};
use crate::source::{Comment, CommentSource};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bounded memory of recently yielded ids; the oldest id is forgotten first.
#[derive(Debug)]
pub struct RecentIds {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl RecentIds {
    pub fn new(capacity: usize) -> Self {
        Self { order: VecDeque::with_capacity(capacity), ids: HashSet::with_capacity(capacity), capacity }
    }

    /// Remember `id`. Returns false if it was already remembered.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.capacity == 0 || self.ids.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(old) = self.order.pop_front() {
                self.ids.remove(&old);
            }
        }
        self.order.push_back(id.to_string());
        self.ids.insert(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Doubling poll delay, capped, reset whenever something new arrives.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    min: Duration,
    max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(MIN_POLL_DELAY_MS), Duration::from_millis(MAX_POLL_DELAY_MS))
    }
}

impl Backoff {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { current: min, min, max }
    }

    /// Delay to wait now; the following call waits twice as long.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.min;
    }
}

/// [`CommentSource`] over a subreddit's comment feed.
///
/// Fetch errors are logged and retried after the backoff delay, so
/// `next_comment` only returns once a comment is available.
pub struct RedditSource {
    client: RedditClient,
    subreddit: String,
    pending: VecDeque<Comment>,
    recent: RecentIds,
    backoff: Backoff,
}

impl RedditSource {
    pub fn new(client: RedditClient, subreddit: impl Into<String>) -> Self {
        Self {
            client,
            subreddit: subreddit.into(),
            pending: VecDeque::new(),
            recent: RecentIds::new(STREAM_MEMORY),
            backoff: Backoff::default(),
        }
    }

    /// Log in and verify the account before streaming.
    pub async fn connect(config: &BotConfig) -> Result<Self> {
        let credentials = config
            .credentials
            .clone()
            .ok_or_else(|| BotError::Config("Reddit credentials not configured".into()))?;
        let mut client = RedditClient::new(credentials, &config.user_agent)?;
        let name = client.me().await?;
        info!(account = %name, subreddit = %config.subreddit, "Connected to Reddit");
        Ok(Self::new(client, config.subreddit.clone()))
    }

    async fn poll(&mut self) -> Result<usize> {
        let batch = self.client.latest_comments(&self.subreddit).await?;
        let fresh = admit(&mut self.recent, self.client.username(), batch);
        let count = fresh.len();
        self.pending.extend(fresh);
        Ok(count)
    }
}

/// Comments from `batch` not yielded before and not written by `own_name`.
/// Every id is remembered, own comments included.
pub fn admit(recent: &mut RecentIds, own_name: &str, batch: Vec<Comment>) -> Vec<Comment> {
    batch
        .into_iter()
        .filter(|comment| recent.insert(&comment.id))
        .filter(|comment| !comment.author.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(own_name)))
        .collect()
}

#[async_trait]
impl CommentSource for RedditSource {
    async fn next_comment(&mut self) -> Result<Option<Comment>> {
        loop {
            if let Some(comment) = self.pending.pop_front() {
                return Ok(Some(comment));
            }
            match self.poll().await {
                Ok(0) => {
                    let delay = self.backoff.next_delay();
                    debug!(delay_ms = delay.as_millis() as u64, "No new comments");
                    tokio::time::sleep(delay).await;
                }
                Ok(n) => {
                    debug!(count = n, "New comments");
                    self.backoff.reset();
                }
                Err(e) => {
                    let delay = self.backoff.next_delay();
                    warn!(error = %e, delay_ms = delay.as_millis() as u64, "Fetching comments failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn reply(&mut self, comment: &Comment, body: &str) -> Result<()> {
        self.client.reply(&comment.id, body).await
    }
}
