//! Bot configuration - built by the binary from the environment

use crate::core::consts::{defaults, env, reply::DEFAULT_BOT_NAME};
use crate::error::{BotError, Result};
use crate::knowledge::KnowledgeTable;
use std::path::{Path, PathBuf};

/// Reddit script-app credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub subreddit: String,
    pub seen_path: PathBuf,
    pub user_agent: String,
    pub bot_name: String,
    pub knowledge_path: Option<PathBuf>,
    pub credentials: Option<Credentials>,
}

impl Default for BotConfig {
    fn default() -> Self { Self::new(defaults::SUBREDDIT) }
}

impl BotConfig {
    pub fn new(subreddit: impl Into<String>) -> Self {
        Self {
            subreddit: subreddit.into(),
            seen_path: PathBuf::from(defaults::SEEN_FILE),
            user_agent: defaults::USER_AGENT.into(),
            bot_name: DEFAULT_BOT_NAME.into(),
            knowledge_path: None,
            credentials: None,
        }
    }
    pub fn with_seen_path(mut self, p: impl Into<PathBuf>) -> Self { self.seen_path = p.into(); self }
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self { self.user_agent = ua.into(); self }
    pub fn with_bot_name(mut self, name: impl Into<String>) -> Self { self.bot_name = name.into(); self }
    pub fn with_knowledge_path(mut self, p: impl Into<PathBuf>) -> Self { self.knowledge_path = Some(p.into()); self }
    pub fn with_credentials(mut self, c: Credentials) -> Self { self.credentials = Some(c); self }

    /// Read configuration from the process environment. All four credentials are required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |(preferred, legacy): (&'static str, &'static str)| {
            get(preferred).or_else(|| get(legacy)).ok_or(BotError::MissingEnv(preferred))
        };

        let credentials = Credentials {
            client_id: required(env::CLIENT_ID)?,
            client_secret: required(env::CLIENT_SECRET)?,
            username: required(env::USERNAME)?,
            password: required(env::PASSWORD)?,
        };

        let subreddit = get(env::SUBREDDIT).unwrap_or_else(|| defaults::SUBREDDIT.into());
        let subreddit = subreddit.trim_start_matches("r/").to_string();
        if subreddit.contains('/') || subreddit.contains(char::is_whitespace) {
            return Err(BotError::Config(format!("invalid subreddit name '{}'", subreddit)));
        }

        let mut config = Self::new(subreddit).with_credentials(credentials);
        if let Some(p) = get(env::SEEN_FILE) { config = config.with_seen_path(p); }
        if let Some(ua) = get(env::USER_AGENT) { config = config.with_user_agent(ua); }
        if let Some(name) = get(env::BOT_NAME) { config = config.with_bot_name(name); }
        if let Some(p) = get(env::KNOWLEDGE_FILE) { config = config.with_knowledge_path(p); }
        Ok(config)
    }

    /// Override file if configured, otherwise the built-in table.
    pub fn knowledge_table(&self) -> Result<KnowledgeTable> {
        match &self.knowledge_path {
            Some(path) => KnowledgeTable::from_path(path),
            None => KnowledgeTable::builtin(),
        }
    }
}

/// Load `KEY=value` lines from a dotenv file into the environment.
/// Variables already set win; a missing file is ignored. Returns the number of keys set.
pub fn load_dotenv(path: impl AsRef<Path>) -> usize {
    let Ok(contents) = std::fs::read_to_string(path.as_ref()) else { return 0 };
    let mut loaded = 0;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().trim_start_matches("export ").trim();
            let value = value.trim().trim_matches('"');
            if !key.is_empty() && !value.is_empty() && std::env::var(key).is_err() {
                std::env::set_var(key, value);
                loaded += 1;
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    const LEGACY: &[(&str, &str)] = &[
        ("client_id", "id"),
        ("client_secret", "secret"),
        ("username", "BalatroBot"),
        ("password", "hunter2"),
    ];

    #[test]
    fn legacy_names_and_defaults() {
        let config = BotConfig::from_lookup(lookup(LEGACY)).unwrap();
        let creds = config.credentials.as_ref().unwrap();
        assert_eq!(creds.username, "BalatroBot");
        assert_eq!(config.subreddit, "balatro");
        assert_eq!(config.seen_path, PathBuf::from("responded_comments.txt"));
        assert!(config.knowledge_path.is_none());
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }

    #[test]
    fn preferred_names_win() {
        let mut pairs = LEGACY.to_vec();
        pairs.push(("REDDIT_USERNAME", "OtherBot"));
        pairs.push(("CARDBOT_SUBREDDIT", "r/balatro_test"));
        let config = BotConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.credentials.unwrap().username, "OtherBot");
        assert_eq!(config.subreddit, "balatro_test");
    }

    #[test]
    fn missing_credential_is_an_error() {
        let err = BotConfig::from_lookup(lookup(&LEGACY[..3])).unwrap_err();
        assert!(matches!(err, BotError::MissingEnv("REDDIT_PASSWORD")));

        let mut blank = LEGACY.to_vec();
        blank[0] = ("client_id", "   ");
        assert!(matches!(BotConfig::from_lookup(lookup(&blank)), Err(BotError::MissingEnv("REDDIT_CLIENT_ID"))));
    }

    #[test]
    fn rejects_bad_subreddit() {
        let mut pairs = LEGACY.to_vec();
        pairs.push(("CARDBOT_SUBREDDIT", "a/b"));
        assert!(matches!(BotConfig::from_lookup(lookup(&pairs)), Err(BotError::Config(_))));
    }
}
