//! String constants: reply text, environment variables, defaults, endpoints.

/// Reply body text
pub mod reply {
    pub const HEADER: &str = "Here is some information about the cards you mentioned:";
    pub const NO_INFORMATION: &str = "No information available";
    pub const DEFAULT_BOT_NAME: &str = "BalatroBot";
}

/// Environment variables read at startup
pub mod env {
    /// (preferred, legacy) names for each credential
    pub const CLIENT_ID: (&str, &str) = ("REDDIT_CLIENT_ID", "client_id");
    pub const CLIENT_SECRET: (&str, &str) = ("REDDIT_CLIENT_SECRET", "client_secret");
    pub const USERNAME: (&str, &str) = ("REDDIT_USERNAME", "username");
    pub const PASSWORD: (&str, &str) = ("REDDIT_PASSWORD", "password");

    pub const SUBREDDIT: &str = "CARDBOT_SUBREDDIT";
    pub const SEEN_FILE: &str = "CARDBOT_SEEN_FILE";
    pub const USER_AGENT: &str = "CARDBOT_USER_AGENT";
    pub const KNOWLEDGE_FILE: &str = "CARDBOT_KNOWLEDGE_FILE";
    pub const BOT_NAME: &str = "CARDBOT_BOT_NAME";
    pub const LOG_JSON: &str = "CARDBOT_LOG_JSON";

    pub const DOTENV_FILE: &str = ".env";
}

pub mod defaults {
    pub const SUBREDDIT: &str = "balatro";
    pub const SEEN_FILE: &str = "responded_comments.txt";
    pub const USER_AGENT: &str = "Balatro Helper (by u/eBanta)";
}

/// Reddit API endpoints and stream tuning
pub mod reddit {
    pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
    pub const OAUTH_BASE: &str = "https://oauth.reddit.com";
    pub const COMMENT_PREFIX: &str = "t1_";
    pub const LISTING_LIMIT: u32 = 100;
    /// Fullnames remembered by the stream to suppress re-yields
    pub const STREAM_MEMORY: usize = 301;
    pub const MIN_POLL_DELAY_MS: u64 = 1_000;
    pub const MAX_POLL_DELAY_MS: u64 = 16_000;
    /// Refresh the token this long before it expires
    pub const TOKEN_SLACK_SECS: i64 = 60;
}
