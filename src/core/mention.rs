//! Mention extraction: `[[Name]]` tokens → canonical table names
//!
//! Each token is matched as a case-insensitive whole word against the table
//! keys in table order; the first key that contains it wins. Tokens that
//! match nothing are dropped.

use crate::knowledge::KnowledgeTable;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\[\[(.*?)\]\]").expect("mention token regex"))
}

/// Raw bracketed tokens in order of appearance. Unterminated brackets yield nothing.
pub fn tokens(text: &str) -> Vec<&str> {
    token_regex()
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Compiled whole-word matcher for one token.
#[derive(Debug, Clone)]
pub struct Mention {
    pub token: String,
    word: Option<Regex>,
}

impl Mention {
    pub fn new(token: &str) -> Self {
        // An empty token names nothing. Whitespace is kept as written: `[[ ]]`
        // matches the first key containing a space between two words.
        let word = if token.is_empty() {
            None
        } else {
            RegexBuilder::new(&format!(r"\b{}\b", regex::escape(token)))
                .case_insensitive(true)
                .build()
                .map_err(|e| tracing::debug!(token, error = %e, "mention regex rejected"))
                .ok()
        };
        Self { token: token.to_string(), word }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.word.as_ref().map(|w| w.is_match(key)).unwrap_or(false)
    }

    /// First table key containing the token as a whole word.
    pub fn resolve<'t>(&self, table: &'t KnowledgeTable) -> Option<&'t str> {
        table.names().find(|key| self.matches(key))
    }
}

/// Canonical names for every resolvable mention in `text`, duplicates kept.
pub fn extract<'t>(text: &str, table: &'t KnowledgeTable) -> Vec<&'t str> {
    tokens(text)
        .into_iter()
        .filter_map(|token| Mention::new(token).resolve(table))
        .collect()
}
