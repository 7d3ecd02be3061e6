use serde::{Deserialize, Serialize};
use slidepuzzle_core::GridSize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// How many finished games are kept in the history
const HISTORY_LIMIT: usize = 200;

/// Result of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Abandoned,
}

/// Record of a single played game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: u64,
    pub size: GridSize,
    pub result: GameResult,
    pub moves: usize,
    pub time_secs: u64,
    /// Whether the tiles were animated
    pub animated: bool,
    /// Unix timestamp when the game ended
    pub timestamp: u64,
}

/// Statistics for one board size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeStats {
    pub total_games: usize,
    pub wins: usize,
    pub abandoned: usize,
    pub best_time_secs: Option<u64>,
    pub fewest_moves: Option<usize>,
    pub total_time_secs: u64,
    pub total_moves: usize,
}

impl SizeStats {
    pub fn avg_time_secs(&self) -> Option<u64> {
        if self.wins > 0 {
            Some(self.total_time_secs / self.wins as u64)
        } else {
            None
        }
    }

    pub fn win_rate(&self) -> f32 {
        if self.total_games > 0 {
            self.wins as f32 / self.total_games as f32 * 100.0
        } else {
            0.0
        }
    }
}

/// Per-size statistics and game history.
///
/// A manager from [`StatsManager::load`] writes back to the same file on
/// [`StatsManager::save`]; a default one lives in memory only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsManager {
    /// Keyed by the size's display form, e.g. "4x3"
    by_size: BTreeMap<String, SizeStats>,
    history: Vec<GameRecord>,
    next_id: u64,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for StatsManager {
    fn default() -> Self {
        Self {
            by_size: BTreeMap::new(),
            history: Vec::new(),
            next_id: 1,
            path: None,
        }
    }
}

impl StatsManager {
    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("slidepuzzle_stats.json")
    }

    pub fn load() -> Self {
        let path = Self::save_path();
        let mut stats: Self = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable stats file: {}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        stats.path = Some(path);
        stats
    }

    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let result = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::from)
            .and_then(|json| fs::write(path, json));
        if let Err(e) = result {
            log::warn!("could not save stats to {}: {}", path.display(), e);
        }
    }

    /// Add a finished game to the totals and history
    pub fn record_game(
        &mut self,
        size: GridSize,
        result: GameResult,
        moves: usize,
        time_secs: u64,
        animated: bool,
    ) -> &GameRecord {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let stats = self.by_size.entry(size.to_string()).or_default();
        stats.total_games += 1;
        match result {
            GameResult::Win => {
                stats.wins += 1;
                stats.total_time_secs += time_secs;
                stats.total_moves += moves;
                stats.best_time_secs =
                    Some(stats.best_time_secs.map_or(time_secs, |t| t.min(time_secs)));
                stats.fewest_moves = Some(stats.fewest_moves.map_or(moves, |m| m.min(moves)));
            }
            GameResult::Abandoned => stats.abandoned += 1,
        }

        log::info!(
            "recorded {:?} on {} after {} moves in {}s",
            result,
            size,
            moves,
            time_secs
        );

        if self.history.len() >= HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(GameRecord {
            id: self.next_id,
            size,
            result,
            moves,
            time_secs,
            animated,
            timestamp,
        });
        self.next_id += 1;
        &self.history[self.history.len() - 1]
    }

    pub fn size_stats(&self, size: GridSize) -> SizeStats {
        self.by_size
            .get(&size.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Every size played so far with its statistics
    pub fn all_sizes(&self) -> impl Iterator<Item = (&str, &SizeStats)> {
        self.by_size.iter().map(|(key, stats)| (key.as_str(), stats))
    }

    pub fn total_games(&self) -> usize {
        self.by_size.values().map(|s| s.total_games).sum()
    }

    pub fn total_wins(&self) -> usize {
        self.by_size.values().map(|s| s.wins).sum()
    }

    pub fn recent_games(&self, limit: usize) -> &[GameRecord] {
        let start = self.history.len().saturating_sub(limit);
        &self.history[start..]
    }
}

/// Format seconds as MM:SS or H:MM:SS
pub fn format_time(secs: u64) -> String {
    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        let secs = secs % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}
