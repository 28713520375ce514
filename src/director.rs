//! Local difficulty director
//!
//! Same policy the backend applies when it hands out level configs: look at
//! the last few finished sessions, nudge the difficulty multiplier, and
//! scale enemy count and speed with it. Used by the native demo and as an
//! offline stand-in for the service.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_ENEMIES;
use crate::sim::{LevelConfig, SessionSummary};

/// Lowest and highest difficulty multiplier handed out
pub const MIN_DIFFICULTY: f32 = 0.5;
pub const MAX_DIFFICULTY: f32 = 2.0;
/// Multiplier for a player with no history
pub const DEFAULT_DIFFICULTY: f32 = 1.0;
/// Only the most recent sessions steer the difficulty
pub const RECENT_WINDOW: usize = 5;
/// How many sessions the performance report looks at
pub const REPORT_WINDOW: usize = 20;

const BASE_ENEMY_COUNT: u32 = 3;
const BASE_ENEMY_SPEED: f32 = 1.0;

/// The parts of a finished session the policy reads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub deaths: u32,
    pub completion_time: f64,
    pub difficulty_level: f32,
}

impl From<&SessionSummary> for SessionRecord {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            deaths: summary.deaths,
            completion_time: summary.completion_time,
            difficulty_level: summary.difficulty_level,
        }
    }
}

/// Aggregate stats over a player's recent sessions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPerformance {
    pub avg_completion_time: f64,
    pub avg_deaths_per_level: f64,
    /// Share of sessions finished with fewer than 3 deaths
    pub success_rate: f64,
    pub difficulty_progression: f32,
    pub suggested_difficulty: f32,
}

/// Difficulty multiplier for the next level given past sessions (oldest first)
pub fn suggested_difficulty(history: &[SessionRecord]) -> f32 {
    let Some(last) = history.last() else {
        return DEFAULT_DIFFICULTY;
    };
    let recent = &history[history.len().saturating_sub(RECENT_WINDOW)..];
    let count = recent.len() as f64;
    let avg_deaths = recent.iter().map(|s| f64::from(s.deaths)).sum::<f64>() / count;
    let avg_time = recent.iter().map(|s| s.completion_time).sum::<f64>() / count;
    let current = last.difficulty_level;

    // Struggling: ease off
    if avg_deaths > 3.0 {
        return (current - 0.2).max(MIN_DIFFICULTY);
    }
    // Breezing through
    if avg_deaths < 1.0 && avg_time < 30.0 {
        return (current + 0.3).min(MAX_DIFFICULTY);
    }

    let performance = (1.0 / avg_deaths.max(0.1)) * (60.0 / avg_time.max(1.0));
    if performance > 2.0 {
        (current + 0.1).min(MAX_DIFFICULTY)
    } else if performance < 0.5 {
        (current - 0.1).max(MIN_DIFFICULTY)
    } else {
        current
    }
}

/// Enemy count (capped at `MAX_ENEMIES`) and speed for `level` (1-based)
/// at a difficulty multiplier
pub fn level_config(level: u32, difficulty: f32) -> LevelConfig {
    let base_count = BASE_ENEMY_COUNT + level.saturating_sub(1);
    LevelConfig {
        enemy_count: ((base_count as f32 * difficulty).floor().max(0.0) as u32).min(MAX_ENEMIES),
        enemy_speed: BASE_ENEMY_SPEED * difficulty,
        difficulty_level: difficulty,
    }
}

/// Summarize up to the last `REPORT_WINDOW` sessions
pub fn performance(history: &[SessionRecord]) -> PlayerPerformance {
    let recent = &history[history.len().saturating_sub(REPORT_WINDOW)..];
    let Some(last) = recent.last() else {
        return PlayerPerformance {
            avg_completion_time: 60.0,
            avg_deaths_per_level: 2.0,
            success_rate: 0.5,
            difficulty_progression: DEFAULT_DIFFICULTY,
            suggested_difficulty: DEFAULT_DIFFICULTY,
        };
    };
    let count = recent.len() as f64;
    PlayerPerformance {
        avg_completion_time: recent.iter().map(|s| s.completion_time).sum::<f64>() / count,
        avg_deaths_per_level: recent.iter().map(|s| f64::from(s.deaths)).sum::<f64>() / count,
        success_rate: recent.iter().filter(|s| s.deaths < 3).count() as f64 / count,
        difficulty_progression: last.difficulty_level,
        suggested_difficulty: suggested_difficulty(recent),
    }
}

/// In-memory stand-in for the difficulty service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Director {
    history: Vec<SessionRecord>,
}

impl Director {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for the next level, based on everything recorded so far
    pub fn config_for(&self, level: u32) -> LevelConfig {
        level_config(level, suggested_difficulty(&self.history))
    }

    /// Remember a finished run
    pub fn record(&mut self, summary: &SessionSummary) {
        self.history.push(SessionRecord::from(summary));
        log::debug!("Director history: {} sessions", self.history.len());
    }

    pub fn performance(&self) -> PlayerPerformance {
        performance(&self.history)
    }

    pub fn history(&self) -> &[SessionRecord] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(deaths: u32, completion_time: f64, difficulty_level: f32) -> SessionRecord {
        SessionRecord {
            deaths,
            completion_time,
            difficulty_level,
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_no_history_is_default() {
        assert_eq!(suggested_difficulty(&[]), DEFAULT_DIFFICULTY);
    }

    #[test]
    fn test_struggling_player_gets_easier() {
        let history = [record(4, 50.0, 1.0), record(5, 40.0, 1.0)];
        assert!(approx(suggested_difficulty(&history), 0.8));

        let floor = [record(6, 50.0, 0.6)];
        assert!(approx(suggested_difficulty(&floor), MIN_DIFFICULTY));
    }

    #[test]
    fn test_fast_clean_player_gets_harder() {
        let history = [record(0, 20.0, 1.0)];
        assert!(approx(suggested_difficulty(&history), 1.3));

        let ceiling = [record(0, 10.0, 1.9)];
        assert!(approx(suggested_difficulty(&ceiling), MAX_DIFFICULTY));
    }

    #[test]
    fn test_performance_score_band() {
        // 1 death in 20s: (1/1) * (60/20) = 3 > 2
        assert!(approx(suggested_difficulty(&[record(1, 20.0, 1.0)]), 1.1));
        // 3 deaths in 200s: (1/3) * (60/200) = 0.1 < 0.5
        assert!(approx(suggested_difficulty(&[record(3, 200.0, 1.0)]), 0.9));
        // 2 deaths in 60s: 0.5 -> unchanged
        assert!(approx(suggested_difficulty(&[record(2, 60.0, 1.2)]), 1.2));
    }

    #[test]
    fn test_only_recent_window_counts() {
        let mut history = vec![record(10, 100.0, 1.0); 10];
        history.extend(vec![record(0, 10.0, 1.0); RECENT_WINDOW]);
        assert!(approx(suggested_difficulty(&history), 1.3));
    }

    #[test]
    fn test_level_config_scaling() {
        let config = level_config(1, 1.0);
        assert_eq!(config.enemy_count, 3);
        assert_eq!(config.enemy_speed, 1.0);

        let config = level_config(3, 1.5);
        assert_eq!(config.enemy_count, 7);
        assert_eq!(config.enemy_speed, 1.5);
        assert_eq!(config.difficulty_level, 1.5);

        assert_eq!(level_config(1, 0.5).enemy_count, 1);
        assert_eq!(level_config(500, MAX_DIFFICULTY).enemy_count, MAX_ENEMIES);
    }

    #[test]
    fn test_performance_report() {
        let empty = performance(&[]);
        assert_eq!(empty.success_rate, 0.5);
        assert_eq!(empty.suggested_difficulty, DEFAULT_DIFFICULTY);

        let history = [record(1, 30.0, 1.0), record(3, 90.0, 1.1)];
        let report = performance(&history);
        assert_eq!(report.avg_completion_time, 60.0);
        assert_eq!(report.avg_deaths_per_level, 2.0);
        assert_eq!(report.success_rate, 0.5);
        assert_eq!(report.difficulty_progression, 1.1);
    }

    #[test]
    fn test_director_tracks_history() {
        let mut director = Director::new();
        assert_eq!(director.config_for(1).enemy_count, 3);

        let summary = SessionSummary {
            player_id: crate::api::PlayerId::parse("p").unwrap(),
            level: 1,
            score: 100,
            deaths: 0,
            completion_time: 12.0,
            difficulty_level: 1.0,
            final_lives: 3,
        };
        director.record(&summary);
        assert_eq!(director.history().len(), 1);
        let config = director.config_for(2);
        assert!(approx(config.difficulty_level, 1.3));
        // floor(4 * 1.3) = 5
        assert_eq!(config.enemy_count, 5);
    }
}
