//! Seen-set persistence: one comment id per line, rewritten whole on every save.

use crate::error::{BotError, Result};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

pub type SeenSet = HashSet<String>;

#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read persisted ids. A missing file is an empty set.
    pub fn load(&self) -> Result<SeenSet> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents
                .lines()
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SeenSet::new()),
            Err(e) => Err(BotError::io(&self.path, e)),
        }
    }

    /// Overwrite the file with `seen`. Written to a sibling temp file and renamed
    /// into place so a crash mid-write leaves the previous state intact.
    pub fn save(&self, seen: &SeenSet) -> Result<()> {
        let mut ids: Vec<&str> = seen.iter().map(String::as_str).collect();
        ids.sort_unstable();

        let tmp = self.tmp_path();
        let write = || -> std::io::Result<()> {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(ids.join("\n").as_bytes())?;
            file.sync_all()
        };
        write().map_err(|e| BotError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| BotError::io(&self.path, e))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SeenStore::new(dir.path().join("responded_comments.txt"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_load_twice_is_stable() {
        let dir = TempDir::new().unwrap();
        let store = SeenStore::new(dir.path().join("seen.txt"));
        let ids: SeenSet = ["abc", "k9x2", "zz1"].iter().map(|s| s.to_string()).collect();
        store.save(&ids).unwrap();

        store.save(&store.load().unwrap()).unwrap();
        store.save(&store.load().unwrap()).unwrap();
        assert_eq!(store.load().unwrap(), ids);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn reads_legacy_file_with_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.txt");
        std::fs::write(&path, "a1\n\nb2\r\nc3\n").unwrap();
        let seen = SeenStore::new(&path).load().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.contains("b2"));
    }

    #[test]
    fn ids_are_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = SeenStore::new(dir.path().join("seen.txt"));
        let ids: SeenSet = [" a", "b ", "c"].iter().map(|s| s.to_string()).collect();
        store.save(&ids).unwrap();
        assert_eq!(store.load().unwrap(), ids);
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        let store = SeenStore::new(dir.path());
        assert!(matches!(store.load(), Err(BotError::Io { .. })));
    }
}
