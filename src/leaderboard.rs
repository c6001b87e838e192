//! Win leaderboard
//!
//! One entry per player, matched by trimmed, case-insensitive name, sorted by
//! wins (most first).

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::{self, StorageError};

/// Number of players shown on the leaderboard screen
pub const DEFAULT_TOP: usize = 5;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Name as first entered
    pub name: String,
    pub wins: u32,
    /// Time of the latest win
    pub last_played: DateTime<Utc>,
}

impl LeaderboardEntry {
    /// Latest win in local time, e.g. `2026-10-18 14:05`
    pub fn last_played_label(&self) -> String {
        self.last_played
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}

/// Win-count leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `name`, ignoring case and surrounding whitespace
    pub fn find(&self, name: &str) -> Option<&LeaderboardEntry> {
        let key = name.trim().to_lowercase();
        self.entries.iter().find(|e| e.name.to_lowercase() == key)
    }

    /// Credit a win. Blank names are ignored. Returns the player's win total.
    pub fn add_win(&mut self, name: &str, at: DateTime<Utc>) -> Option<u32> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let key = name.to_lowercase();

        let wins = match self.entries.iter_mut().find(|e| e.name.to_lowercase() == key) {
            Some(entry) => {
                entry.wins += 1;
                entry.last_played = at;
                entry.wins
            }
            None => {
                self.entries.push(LeaderboardEntry {
                    name: name.to_string(),
                    wins: 1,
                    last_played: at,
                });
                1
            }
        };

        // Stable: ties keep their earlier order
        self.entries.sort_by(|a, b| b.wins.cmp(&a.wins));
        Some(wins)
    }

    /// Best `limit` players
    pub fn top(&self, limit: usize) -> &[LeaderboardEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Load from disk; a missing or corrupt file gives an empty board
    pub fn load(path: &Path) -> Self {
        let mut board: Self = persistence::load_or_default(path);
        board.entries.sort_by(|a, b| b.wins.cmp(&a.wins));
        log::info!("Loaded {} leaderboard entries", board.entries.len());
        board
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        persistence::save_json(path, self)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    #[test]
    fn test_add_win_case_insensitive() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_win("Alice", at(10)), Some(1));
        assert_eq!(board.add_win("  alice ", at(20)), Some(2));
        assert_eq!(board.entries.len(), 1);
        let entry = board.find("ALICE").expect("entry");
        assert_eq!(entry.name, "Alice");
        assert_eq!(entry.wins, 2);
        assert_eq!(entry.last_played, at(20));
    }

    #[test]
    fn test_blank_name_ignored() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_win("   ", at(1)), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_sorted_by_wins() {
        let mut board = Leaderboard::new();
        board.add_win("Bo", at(1));
        board.add_win("Cy", at(2));
        board.add_win("Cy", at(3));
        board.add_win("Di", at(4));
        let names: Vec<_> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Cy", "Bo", "Di"]);
        assert_eq!(board.top(2).len(), 2);
        assert_eq!(board.top(DEFAULT_TOP).len(), 3);
    }

    #[test]
    fn test_json_is_plain_list() {
        let mut board = Leaderboard::new();
        board.add_win("Eve", at(5));
        let json = serde_json::to_string(&board).expect("json");
        assert!(json.starts_with('['));
        let back: Leaderboard = serde_json::from_str(&json).expect("parse");
        assert_eq!(back.entries, board.entries);
    }

    #[test]
    fn test_last_played_label() {
        let mut board = Leaderboard::new();
        board.add_win("Fay", Utc::now());
        let label = board.entries[0].last_played_label();
        assert_eq!(label.len(), "2026-10-18 14:05".len());
        assert_eq!(&label[4..5], "-");
        assert_eq!(&label[10..11], " ");
    }
}
