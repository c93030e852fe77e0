//! Error taxonomy for the bot.
//!
//! Startup errors (missing credentials, unreadable knowledge file) end the process.
//! Everything raised while handling a single comment is logged and the loop moves on.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("knowledge table: {0}")]
    Knowledge(String),

    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "reddit")]
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("comment source: {0}")]
    Source(String),
}

impl BotError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cause() {
        assert_eq!(
            BotError::MissingEnv("REDDIT_CLIENT_ID").to_string(),
            "missing required environment variable REDDIT_CLIENT_ID"
        );
        let api = BotError::Api { status: 403, message: "forbidden".into() };
        assert_eq!(api.to_string(), "api rejected request (403): forbidden");
        let io = BotError::io("seen.txt", std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(io.to_string().starts_with("seen.txt:"));
    }
}
