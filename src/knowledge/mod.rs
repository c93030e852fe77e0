//! Knowledge Table: canonical card name → description
//!
//! Built once at startup and never mutated. Entry order is the document order
//! and matters: mention resolution takes the first name that matches.
//!
//! # Document shape
//!
//! ```text
//! [
//!   {"name": "Foil", "description": "+50 Chips"},
//!   {"name": "Pair", "base_score": "10 Chips x 2 Mult", "how_to_play": "..."}
//! ]
//! ```

use crate::error::{BotError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_CARDS: &str = include_str!("cards.json");

/// Poker hand record. Fields render in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandInfo {
    pub base_score: String,
    pub how_to_play: String,
}

impl HandInfo {
    pub fn fields(&self) -> [(&'static str, &str); 2] {
        [
            ("Base Score", self.base_score.as_str()),
            ("How to Play the Hand", self.how_to_play.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Description(String),
    Hand(HandInfo),
}

/// Raw document row (for deserialization)
#[derive(Debug, Clone, Deserialize)]
pub struct EntryDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_score: Option<String>,
    #[serde(default)]
    pub how_to_play: Option<String>,
}

impl EntryDef {
    fn into_entry(self) -> Result<(String, Entry)> {
        let entry = match (self.description, self.base_score, self.how_to_play) {
            (Some(d), None, None) => Entry::Description(d),
            (None, Some(base_score), Some(how_to_play)) => Entry::Hand(HandInfo { base_score, how_to_play }),
            _ => {
                return Err(BotError::Knowledge(format!(
                    "'{}' needs either a description or both base_score and how_to_play",
                    self.name
                )))
            }
        };
        Ok((self.name, entry))
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeTable {
    entries: Vec<(String, Entry)>,
    index: HashMap<String, usize>,
}

impl KnowledgeTable {
    /// The Balatro card table shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CARDS)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let defs: Vec<EntryDef> = serde_json::from_str(json)?;
        let entries = defs.into_iter().map(EntryDef::into_entry).collect::<Result<Vec<_>>>()?;
        Self::from_entries(entries)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| BotError::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Entry)>) -> Result<Self> {
        let mut table = Self { entries: Vec::new(), index: HashMap::new() };
        for (name, entry) in entries {
            if name.trim().is_empty() {
                return Err(BotError::Knowledge("entry with empty name".into()));
            }
            if table.index.contains_key(&name) {
                return Err(BotError::Knowledge(format!("duplicate entry '{}'", name)));
            }
            table.index.insert(name.clone(), table.entries.len());
            table.entries.push((name, entry));
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Canonical names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
