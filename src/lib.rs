//! Cardbot: answers `[[Card Name]]` mentions on a subreddit with card details.
//!
//! # Architecture
//!
//! ```text
//! main
//!   │
//!   ├── BotConfig (env + .env)
//!   │
//!   ├── Bot (polling loop)
//!   │     ├── KnowledgeTable   (card name → description, table order)
//!   │     ├── core::mention    ([[token]] → canonical names)
//!   │     ├── ReplyFormatter   (names → reply body)
//!   │     └── SeenStore        (answered comment ids, one per line)
//!   │
//!   ├── CommentSource
//!   │     ├── RedditSource     (OAuth, comment stream, replies)
//!   │     └── MemorySource     (in-memory replay)
//!   │
//!   └── Shutdown (SIGINT/SIGTERM)
//! ```
//!
//! # Features
//!
//! - `reddit` (default) - Reddit client via reqwest. Required by the binary.
//!
//! # Usage
//!
//! ```ignore
//! use cardbot::{Bot, BotConfig, MemorySource, Comment, Shutdown};
//!
//! let mut bot = Bot::from_config(&BotConfig::default())?;
//! let mut source = MemorySource::new([Comment::new("abc", "what does [[Foil]] do?")]);
//! let stats = bot.run(&mut source, &Shutdown::new()).await?;
//! ```

pub mod bot;
pub mod core;
pub mod error;
pub mod knowledge;
pub mod logging;
pub mod runtime;
pub mod seen;
pub mod source;

#[cfg(feature = "reddit")]
pub mod reddit;

pub use bot::{Bot, BotConfig, BotState, Credentials, Outcome, RunStats};
pub use crate::core::reply::ReplyFormatter;
pub use error::{BotError, Result};
pub use knowledge::{Entry, HandInfo, KnowledgeTable};
pub use runtime::{install_signal_handlers, Shutdown};
pub use seen::{SeenSet, SeenStore};
pub use source::{Comment, CommentSource, MemorySource, SentReply};

#[cfg(feature = "reddit")]
pub use reddit::{RedditClient, RedditSource};
