//! Score, line and level tracking

use std::time::Duration;

/// Base points for clearing 0..=4 lines at once
const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];

/// Lines needed per level
const LINES_PER_LEVEL: u32 = 10;

/// Gravity period at level 0, the reduction per level, and the floor
const BASE_FALL_MS: u64 = 1000;
const FALL_STEP_MS: u64 = 80;
const MIN_FALL_MS: u64 = 120;

/// Score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Current score
    pub score: u64,
    /// Total lines cleared
    pub lines: u32,
    /// Current level, always lines / 10
    pub level: u32,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base value for a clear of `lines` rows
    pub fn line_value(lines: usize) -> u64 {
        LINE_SCORES.get(lines).copied().unwrap_or(0)
    }

    /// Stats after clearing `cleared` lines, plus the points awarded.
    /// The new level applies to the clear that reached it.
    pub fn with_clear(&self, cleared: usize) -> (Stats, u64) {
        if cleared == 0 {
            return (*self, 0);
        }

        let lines = self.lines + cleared as u32;
        let level = lines / LINES_PER_LEVEL;
        let points = Self::line_value(cleared) * (level as u64 + 1);

        let stats = Stats {
            score: self.score + points,
            lines,
            level,
        };
        (stats, points)
    }

    /// Get the gravity period for the current level
    pub fn fall_interval(&self) -> Duration {
        let reduction = FALL_STEP_MS.saturating_mul(self.level as u64);
        Duration::from_millis(BASE_FALL_MS.saturating_sub(reduction).max(MIN_FALL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clear() {
        let (stats, points) = Stats::new().with_clear(1);
        assert_eq!(points, 100);
        assert_eq!(stats.score, 100);
        assert_eq!(stats.lines, 1);
    }

    #[test]
    fn test_double_at_level_zero() {
        let (stats, points) = Stats::new().with_clear(2);
        assert_eq!(points, 300);
        assert_eq!(stats.level, 0);
    }

    #[test]
    fn test_tetris_into_level_one() {
        let before = Stats {
            score: 0,
            lines: 6,
            level: 0,
        };
        let (stats, points) = before.with_clear(4);
        assert_eq!(stats.level, 1);
        assert_eq!(points, 1600);
        assert_eq!(stats.score, 1600);
    }

    #[test]
    fn test_no_clear_changes_nothing() {
        let before = Stats {
            score: 42,
            lines: 3,
            level: 0,
        };
        assert_eq!(before.with_clear(0), (before, 0));
    }

    #[test]
    fn test_level_up() {
        let mut stats = Stats::new();
        for _ in 0..9 {
            stats = stats.with_clear(1).0;
        }
        assert_eq!(stats.level, 0);
        stats = stats.with_clear(1).0;
        assert_eq!(stats.lines, 10);
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn test_out_of_table_clear_scores_zero() {
        assert_eq!(Stats::line_value(5), 0);
    }

    #[test]
    fn test_fall_interval() {
        let at = |level| Stats {
            level,
            ..Stats::new()
        };
        assert_eq!(at(0).fall_interval(), Duration::from_millis(1000));
        assert_eq!(at(5).fall_interval(), Duration::from_millis(600));
        assert_eq!(at(11).fall_interval(), Duration::from_millis(120));
        assert_eq!(at(12).fall_interval(), Duration::from_millis(120));
        assert_eq!(at(u32::MAX).fall_interval(), Duration::from_millis(120));
    }
}
