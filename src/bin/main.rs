//! Cardbot - watches a subreddit and answers `[[Card Name]]` mentions
//!
//! Configuration is read from the environment (and `.env` if present):
//!   REDDIT_CLIENT_ID / client_id           (required)
//!   REDDIT_CLIENT_SECRET / client_secret   (required)
//!   REDDIT_USERNAME / username             (required)
//!   REDDIT_PASSWORD / password             (required)
//!   CARDBOT_SUBREDDIT        subreddit to watch (default: balatro)
//!   CARDBOT_SEEN_FILE        answered comment ids (default: responded_comments.txt)
//!   CARDBOT_USER_AGENT       HTTP user agent
//!   CARDBOT_KNOWLEDGE_FILE   JSON card table replacing the built-in one
//!   CARDBOT_BOT_NAME         account name shown in the reply footer
//!   CARDBOT_LOG_JSON=1       JSON log lines
//!   RUST_LOG                 log filter (default: info)
//!
//! Stop with Ctrl+C (SIGINT) or SIGTERM.

use anyhow::Context;
use cardbot::bot::load_dotenv;
use cardbot::core::consts::env::DOTENV_FILE;
use cardbot::logging::init_logging;
use cardbot::{install_signal_handlers, Bot, BotConfig, RedditSource};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match std::env::args().nth(1).as_deref() {
        Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        Some("--version") | Some("-V") => {
            println!("cardbot {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(other) => anyhow::bail!("unexpected argument '{}' (see --help)", other),
        None => {}
    }

    load_dotenv(DOTENV_FILE);
    init_logging();

    let config = BotConfig::from_env().context("Failed to load configuration")?;
    let mut bot = Bot::from_config(&config).context("Failed to initialise bot")?;
    let mut source = RedditSource::connect(&config).await.context("Failed to connect to Reddit")?;
    let shutdown = install_signal_handlers();

    info!("{} started", config.bot_name);
    info!(subreddit = %config.subreddit, "{} is now listening for comments", config.bot_name);

    bot.run(&mut source, &shutdown).await.context("Comment stream failed")?;
    Ok(())
}

fn print_usage() {
    println!(
        r#"cardbot {}

Watches a subreddit's comments and replies to [[Card Name]] mentions.

USAGE:
    cardbot            Run until Ctrl+C
    cardbot --help     Show this help
    cardbot --version  Show version

Credentials come from REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET, REDDIT_USERNAME
and REDDIT_PASSWORD (or client_id, client_secret, username, password), read
from the environment or a .env file in the working directory.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
