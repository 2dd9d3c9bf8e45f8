use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Entries kept after an append; lowest scores fall off the end.
const MAX_ENTRIES: usize = 20;
/// Player names longer than this are truncated on append.
const MAX_NAME_CHARS: usize = 20;

#[derive(Clone, Serialize, Deserialize)]
pub struct LeaderEntry {
    pub name: String,
    pub score: u32,
    /// Unix seconds at the time of the append.
    pub timestamp: u64,
}

/// Persistent top-20 score list for the snake game, stored as one JSON
/// array in a file next to the executable. Reads that fail or do not
/// parse are treated as an empty board; writes are fire-and-forget.
pub struct Leaderboard {
    entries: Vec<LeaderEntry>,
    path: PathBuf,
}

impl Leaderboard {
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        let entries = fs::read(&path)
            .ok()
            .and_then(|data| serde_json::from_slice::<Vec<LeaderEntry>>(&data).ok())
            .unwrap_or_default();
        let mut board = Leaderboard { entries, path };
        // Re-apply ordering and cap in case the file was edited by hand
        board.normalize();
        board
    }

    fn default_path() -> PathBuf {
        // Store next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join("retrocade.leaderboard.json");
            }
        }
        PathBuf::from("retrocade.leaderboard.json")
    }

    /// Insert a score, keep the list sorted descending, drop past 20, persist.
    pub fn append(&mut self, name: &str, score: u32) {
        let name: String = name.chars().take(MAX_NAME_CHARS).collect();
        let name = if name.is_empty() { "Player".to_string() } else { name };
        self.entries.push(LeaderEntry {
            name,
            score,
            timestamp: unix_now(),
        });
        self.normalize();
        self.persist();
    }

    /// Entries in descending score order, at most 20.
    pub fn list(&self) -> &[LeaderEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    fn normalize(&mut self) {
        // Stable sort: equal scores keep append order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }

    fn persist(&self) {
        if let Ok(data) = serde_json::to_vec_pretty(&self.entries) {
            let _ = fs::write(&self.path, data);
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_board(tag: &str) -> Leaderboard {
        let path = std::env::temp_dir().join(format!(
            "retrocade-test-{}-{}.json",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        Leaderboard::load_from(path)
    }

    #[test]
    fn test_append_sorts_descending() {
        let mut board = temp_board("sort");
        board.append("A", 10);
        board.append("B", 30);
        board.append("C", 20);

        let names: Vec<(&str, u32)> = board
            .list()
            .iter()
            .map(|e| (e.name.as_str(), e.score))
            .collect();
        assert_eq!(names, vec![("B", 30), ("C", 20), ("A", 10)]);
    }

    #[test]
    fn test_capped_at_twenty_lowest_evicted() {
        let mut board = temp_board("cap");
        for i in 0..30u32 {
            board.append(&format!("P{i}"), i);
        }
        assert_eq!(board.list().len(), 20);
        // Scores 0..=9 were evicted; the floor of the kept range is 10
        assert!(board.list().iter().all(|e| e.score >= 10));
        assert_eq!(board.list()[0].score, 29);
        assert_eq!(board.list()[19].score, 10);
    }

    #[test]
    fn test_name_truncated_to_twenty_chars() {
        let mut board = temp_board("name");
        board.append("ABCDEFGHIJKLMNOPQRSTUVWXYZ", 5);
        assert_eq!(board.list()[0].name, "ABCDEFGHIJKLMNOPQRST");
    }

    #[test]
    fn test_persists_across_load() {
        let path = std::env::temp_dir().join(format!(
            "retrocade-test-persist-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        {
            let mut board = Leaderboard::load_from(path.clone());
            board.append("KEEP", 42);
        }
        let board = Leaderboard::load_from(path.clone());
        assert_eq!(board.list().len(), 1);
        assert_eq!(board.list()[0].name, "KEEP");
        assert_eq!(board.list()[0].score, 42);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unreadable_file_is_empty_board() {
        let path = std::env::temp_dir().join(format!(
            "retrocade-test-garbage-{}.json",
            std::process::id()
        ));
        fs::write(&path, b"not json at all").unwrap();
        let board = Leaderboard::load_from(path.clone());
        assert!(board.list().is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_clear_empties_and_persists() {
        let mut board = temp_board("clear");
        board.append("A", 1);
        board.clear();
        assert!(board.list().is_empty());
        let board2 = Leaderboard::load_from(board.path.clone());
        assert!(board2.list().is_empty());
    }
}
