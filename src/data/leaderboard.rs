use std::path::Path;

use super::codec::{Record, parse_or};
use super::{RecordFile, StoreError};
use crate::models::{LeaderboardEntry, rank};

pub const DEFAULT_LEADERBOARD_PATH: &str = "leaderboard.txt";

impl Record for LeaderboardEntry {
    const MIN_FIELDS: usize = 4;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.score.to_string(),
            self.total.to_string(),
            self.timestamp.clone(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Self {
        LeaderboardEntry::new(
            fields[0],
            parse_or(fields[1], 0),
            parse_or(fields[2], 0),
            fields[3],
        )
    }
}

/// The leaderboard file, kept ranked on every save.
#[derive(Debug, Clone)]
pub struct LeaderboardRepository {
    file: RecordFile<LeaderboardEntry>,
}

impl LeaderboardRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: RecordFile::new(path.as_ref()),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn load(&self) -> Vec<LeaderboardEntry> {
        self.file.load()
    }

    /// Rank `entries` and overwrite the leaderboard with them.
    pub fn save(&self, mut entries: Vec<LeaderboardEntry>) -> Result<(), StoreError> {
        rank(&mut entries);
        self.file.save(&entries)
    }

    /// Append one result and re-rank.
    pub fn record(&self, entry: LeaderboardEntry) -> Result<(), StoreError> {
        let mut entries = self.load();
        entries.push(entry);
        self.save(entries)
    }
}

impl Default for LeaderboardRepository {
    fn default() -> Self {
        Self::new(DEFAULT_LEADERBOARD_PATH)
    }
}
