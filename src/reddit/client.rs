//! Reddit OAuth client - reqwest over HTTPS
//!
//! Minimal implementation: password-grant login, comment listings, replies.

use super::{check_comment_response, parse_comment_listing, parse_token, AccessToken};
use crate::bot::Credentials;
use crate::core::consts::reddit::{COMMENT_PREFIX, LISTING_LIMIT, OAUTH_BASE, TOKEN_SLACK_SECS, TOKEN_URL};
use crate::error::{BotError, Result};
use crate::source::Comment;
use chrono::Utc;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct RedditClient {
    http: HttpClient,
    credentials: Credentials,
    token: Option<AccessToken>,
}

impl std::fmt::Debug for RedditClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditClient")
            .field("username", &self.credentials.username)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl RedditClient {
    pub fn new(credentials: Credentials, user_agent: &str) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, credentials, token: None })
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Exchange the account credentials for a bearer token.
    pub async fn authenticate(&mut self) -> Result<()> {
        let resp = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?;
        let body = error_for_status(resp).await?;
        self.token = Some(parse_token(&body, Utc::now())?);
        info!(username = %self.credentials.username, "Authenticated with Reddit");
        Ok(())
    }

    async fn bearer(&mut self) -> Result<String> {
        let fresh = self.token.as_ref().map(|t| t.is_fresh(Utc::now(), TOKEN_SLACK_SECS)).unwrap_or(false);
        if !fresh {
            self.authenticate().await?;
        }
        self.token
            .as_ref()
            .map(|t| t.value.clone())
            .ok_or_else(|| BotError::Source("no access token after login".into()))
    }

    /// Send an authorised request, logging in again once on 401.
    async fn send(&mut self, build: impl Fn(&HttpClient) -> RequestBuilder) -> Result<String> {
        let token = self.bearer().await?;
        let resp = build(&self.http).bearer_auth(&token).send().await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return error_for_status(resp).await;
        }

        debug!("Token rejected, logging in again");
        self.token = None;
        let token = self.bearer().await?;
        let resp = build(&self.http).bearer_auth(&token).send().await?;
        error_for_status(resp).await
    }

    /// Account name the token belongs to.
    pub async fn me(&mut self) -> Result<String> {
        let body = self.send(|http| http.get(format!("{}/api/v1/me", OAUTH_BASE))).await?;
        let me: Value = serde_json::from_str(&body)?;
        me.get("name")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| BotError::Source("identity response has no name".into()))
    }

    /// Latest comments in a subreddit, oldest first.
    pub async fn latest_comments(&mut self, subreddit: &str) -> Result<Vec<Comment>> {
        let url = format!("{}/r/{}/comments", OAUTH_BASE, subreddit);
        let limit = LISTING_LIMIT.to_string();
        let body = self
            .send(|http| http.get(&url).query(&[("limit", limit.as_str()), ("raw_json", "1")]))
            .await?;
        parse_comment_listing(&body)
    }

    pub async fn reply(&mut self, comment_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/api/comment", OAUTH_BASE);
        let thing_id = format!("{}{}", COMMENT_PREFIX, comment_id);
        let body = self
            .send(|http| {
                http.post(&url).form(&[("api_type", "json"), ("thing_id", thing_id.as_str()), ("text", text)])
            })
            .await?;
        check_comment_response(200, &serde_json::from_str(&body)?)
    }
}

async fn error_for_status(resp: Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        let message = if body.chars().count() > 200 { format!("{}...", body.chars().take(200).collect::<String>()) } else { body };
        Err(BotError::Api { status: status.as_u16(), message })
    }
}
