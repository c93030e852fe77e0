//! Bot - the polling loop
//!
//! ```text
//! IDLE ──pull──▶ PROCESSING(comment) ──▶ IDLE
//!   │                  │
//!   │                  ├─ already seen      → skip
//!   │                  ├─ no mentions       → skip (not marked seen)
//!   │                  └─ reply → mark seen → save seen file
//!   │
//!   └─ shutdown token ──▶ STOPPED
//! ```
//!
//! One comment is fully handled before the next is pulled. A failure while
//! handling a comment is logged with its id and the loop carries on.

mod config;

pub use config::{load_dotenv, BotConfig, Credentials};

use crate::core::mention;
use crate::core::reply::ReplyFormatter;
use crate::error::Result;
use crate::knowledge::KnowledgeTable;
use crate::runtime::Shutdown;
use crate::seen::{SeenSet, SeenStore};
use crate::source::{Comment, CommentSource};
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotState {
    Idle,
    Processing(String),
    Stopped,
}

/// What happened to one comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AlreadySeen,
    NoMentions,
    Replied { mentions: Vec<String> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub seen: usize,
    pub replied: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Bot {
    table: KnowledgeTable,
    formatter: ReplyFormatter,
    store: SeenStore,
    seen: SeenSet,
    state: BotState,
}

impl Bot {
    /// Build the bot and load the persisted seen set.
    pub fn new(table: KnowledgeTable, formatter: ReplyFormatter, store: SeenStore) -> Result<Self> {
        let seen = store.load()?;
        info!(count = seen.len(), path = %store.path().display(), "Loaded responded comments");
        Ok(Self { table, formatter, store, seen, state: BotState::Idle })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let table = config.knowledge_table()?;
        info!(entries = table.len(), "Knowledge table ready");
        Self::new(table, ReplyFormatter::new(&config.bot_name), SeenStore::new(&config.seen_path))
    }

    pub fn state(&self) -> &BotState { &self.state }
    pub fn seen(&self) -> &SeenSet { &self.seen }
    pub fn table(&self) -> &KnowledgeTable { &self.table }

    /// Handle a single comment: skip, or reply and record it as seen.
    ///
    /// The id is only kept in the seen set once the reply was sent and the
    /// seen file was written.
    pub async fn handle<S>(&mut self, comment: &Comment, source: &mut S) -> Result<Outcome>
    where
        S: CommentSource + ?Sized,
    {
        if self.seen.contains(&comment.id) {
            debug!(comment_id = %comment.id, "Already responded");
            return Ok(Outcome::AlreadySeen);
        }

        info!(comment_id = %comment.id, "Processing comment");
        let names = mention::extract(&comment.body, &self.table);
        let Some(body) = self.formatter.format(&names, &self.table) else {
            return Ok(Outcome::NoMentions);
        };

        source.reply(comment, &body).await?;
        self.seen.insert(comment.id.clone());
        if let Err(e) = self.store.save(&self.seen) {
            self.seen.remove(&comment.id);
            return Err(e);
        }

        info!(comment_id = %comment.id, cards = ?names, "Replied");
        Ok(Outcome::Replied { mentions: names.into_iter().map(String::from).collect() })
    }

    /// Pull comments until the source is exhausted or `shutdown` fires.
    ///
    /// Returns an error only when the source itself fails; per-comment
    /// failures are logged and counted.
    pub async fn run<S>(&mut self, source: &mut S, shutdown: &Shutdown) -> Result<RunStats>
    where
        S: CommentSource + ?Sized,
    {
        let mut stats = RunStats::default();
        self.state = BotState::Idle;

        loop {
            if shutdown.is_triggered() {
                info!("Bot stopped by operator");
                break;
            }

            let next = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Bot stopped by operator");
                    break;
                }
                next = source.next_comment() => next,
            };

            let comment = match next {
                Ok(Some(comment)) => comment,
                Ok(None) => {
                    info!("Comment source exhausted");
                    break;
                }
                Err(e) => {
                    self.state = BotState::Stopped;
                    error!(error = %e, "Comment source failed");
                    return Err(e);
                }
            };

            stats.seen += 1;
            self.state = BotState::Processing(comment.id.clone());
            match self.handle(&comment, &mut *source).await {
                Ok(Outcome::Replied { .. }) => stats.replied += 1,
                Ok(_) => stats.skipped += 1,
                Err(e) => {
                    stats.failed += 1;
                    error!(comment_id = %comment.id, error = %e, "An error occurred while processing comment");
                }
            }
            self.state = BotState::Idle;
        }

        self.state = BotState::Stopped;
        info!(seen = stats.seen, replied = stats.replied, skipped = stats.skipped, failed = stats.failed, "Run finished");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use tempfile::TempDir;

    fn bot(dir: &TempDir) -> Bot {
        Bot::new(
            KnowledgeTable::builtin().unwrap(),
            ReplyFormatter::default(),
            SeenStore::new(dir.path().join("seen.txt")),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn replies_then_marks_seen() {
        let dir = TempDir::new().unwrap();
        let mut bot = bot(&dir);
        let mut source = MemorySource::default();
        let comment = Comment::new("c1", "I like [[Fool]] and [[mult]]");

        let outcome = bot.handle(&comment, &mut source).await.unwrap();
        assert_eq!(outcome, Outcome::Replied { mentions: vec!["The Fool".into(), "Mult".into()] });
        assert!(bot.seen().contains("c1"));
        assert_eq!(source.sent().lock().unwrap().len(), 1);

        let again = bot.handle(&comment, &mut source).await.unwrap();
        assert_eq!(again, Outcome::AlreadySeen);
        assert_eq!(source.sent().lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_mentions_is_not_marked_seen() {
        let dir = TempDir::new().unwrap();
        let mut bot = bot(&dir);
        let mut source = MemorySource::default();

        let outcome = bot.handle(&Comment::new("c2", "just chatting [[nothing here]]"), &mut source).await.unwrap();
        assert_eq!(outcome, Outcome::NoMentions);
        assert!(bot.seen().is_empty());
        assert!(source.sent().lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_reply_is_not_marked_seen() {
        let dir = TempDir::new().unwrap();
        let mut bot = bot(&dir);
        let mut source = MemorySource::default().failing_replies(&["c3"]);

        assert!(bot.handle(&Comment::new("c3", "[[Foil]]"), &mut source).await.is_err());
        assert!(bot.seen().is_empty());
        assert!(!dir.path().join("seen.txt").exists());
    }

    #[tokio::test]
    async fn failed_save_rolls_back_seen() {
        let dir = TempDir::new().unwrap();
        let mut bot = Bot::new(
            KnowledgeTable::builtin().unwrap(),
            ReplyFormatter::default(),
            SeenStore::new(dir.path().join("missing-dir").join("seen.txt")),
        )
        .unwrap();
        let mut source = MemorySource::default();

        assert!(bot.handle(&Comment::new("c4", "[[Foil]]"), &mut source).await.is_err());
        assert!(bot.seen().is_empty());
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let dir = TempDir::new().unwrap();
        let mut bot = bot(&dir);
        let mut source = MemorySource::new([Comment::new("c5", "[[Foil]]")]);
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let stats = bot.run(&mut source, &shutdown).await.unwrap();
        assert_eq!(stats, RunStats::default());
        assert_eq!(bot.state(), &BotState::Stopped);
        assert!(source.sent().lock().unwrap().is_empty());
    }
}
