//! Reddit - board client for the bot
//!
//! - OAuth2 password grant (script app), token refreshed before expiry or on 401
//! - Live comment stream over `/r/{sub}/comments`, oldest first, deduplicated
//! - Replies via `/api/comment`
//!
//! # Wire shapes
//!
//! | Endpoint | Shape |
//! |----------|-------|
//! | `POST /api/v1/access_token` | `{access_token, expires_in}` or `{error}` |
//! | `GET /r/{sub}/comments` | `Listing` of `t1` things, newest first |
//! | `POST /api/comment` | `{json: {errors: [[code, message, field]], data}}` |

pub mod client;
mod stream;

pub use client::RedditClient;
pub use stream::{Backoff, RecentIds, RedditSource};

use crate::error::{BotError, Result};
use crate::source::Comment;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    kind: String,
    data: T,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    id: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    created_utc: Option<f64>,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            id: raw.id,
            author: raw.author,
            body: raw.body,
            created: raw.created_utc.and_then(|secs| DateTime::<Utc>::from_timestamp(secs.trunc() as i64, 0)),
        }
    }
}

/// Parse a comment listing. Reddit lists newest first; the result is oldest first.
pub fn parse_comment_listing(json: &str) -> Result<Vec<Comment>> {
    let listing: Listing<Value> = serde_json::from_str(json)?;
    let mut comments = Vec::with_capacity(listing.data.children.len());
    for thing in listing.data.children.into_iter().rev() {
        if thing.kind != "t1" {
            continue;
        }
        let raw: RawComment = serde_json::from_value(thing.data)?;
        comments.push(raw.into());
    }
    Ok(comments)
}

/// Access token response. Reddit answers a bad login with 200 and `{"error": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<Value>,
}

#[derive(Debug, Clone)]
pub(crate) struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_fresh(&self, now: DateTime<Utc>, slack_secs: i64) -> bool {
        now + chrono::Duration::seconds(slack_secs) < self.expires_at
    }
}

pub(crate) fn parse_token(json: &str, now: DateTime<Utc>) -> Result<AccessToken> {
    let resp: TokenResponse = serde_json::from_str(json)?;
    match (resp.access_token, resp.error) {
        (Some(value), None) => Ok(AccessToken {
            value,
            expires_at: now + chrono::Duration::seconds(resp.expires_in.unwrap_or(3600)),
        }),
        (_, error) => Err(BotError::Api {
            status: 401,
            message: error.map(|e| e.to_string()).unwrap_or_else(|| "no access_token in response".into()),
        }),
    }
}

/// Check a `/api/comment` response body (`api_type=json`) for rejections.
pub fn check_comment_response(status: u16, body: &Value) -> Result<()> {
    let errors = body.pointer("/json/errors").and_then(Value::as_array);
    match errors {
        Some(errors) if !errors.is_empty() => {
            let message = errors
                .iter()
                .map(|e| match e.as_array() {
                    Some(parts) => parts.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(": "),
                    None => e.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; ");
            Err(BotError::Api { status, message })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_is_reversed_and_filtered() {
        let listing = json!({
            "kind": "Listing",
            "data": {"children": [
                {"kind": "t1", "data": {"id": "new", "author": "a", "body": "[[Foil]]", "created_utc": 1700000100.0}},
                {"kind": "t3", "data": {"id": "post", "title": "a post"}},
                {"kind": "t1", "data": {"id": "old", "author": "b", "body": "hi", "created_utc": 1700000000.0}}
            ]}
        });
        let comments = parse_comment_listing(&listing.to_string()).unwrap();
        let ids: Vec<&str> = comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["old", "new"]);
        assert_eq!(comments[1].body, "[[Foil]]");
        assert_eq!(comments[0].created.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn token_success_and_bad_login() {
        let now = Utc::now();
        let token = parse_token(r#"{"access_token":"abc","token_type":"bearer","expires_in":86400}"#, now).unwrap();
        assert_eq!(token.value, "abc");
        assert!(token.is_fresh(now, 60));
        assert!(!token.is_fresh(now + chrono::Duration::seconds(86_380), 60));

        let err = parse_token(r#"{"error":"invalid_grant"}"#, now).unwrap_err();
        assert!(matches!(err, BotError::Api { status: 401, ref message } if message.contains("invalid_grant")));
    }

    #[test]
    fn comment_response_errors() {
        assert!(check_comment_response(200, &json!({"json": {"errors": [], "data": {}}})).is_ok());
        let err = check_comment_response(
            200,
            &json!({"json": {"errors": [["RATELIMIT", "you are doing that too much", "ratelimit"]]}}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("RATELIMIT: you are doing that too much"));
    }
}
