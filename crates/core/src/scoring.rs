//! Scoring module - points, progress and levels
//!
//! Compatibility note:
//! The progress formula is applied to the *cumulative* score, exactly like the
//! browser game this engine replaces:
//! - `progress = min(100, score / 500 * 100)`
//! - reaching 100 increments the level once and resets progress to 0
//!
//! Once the score has passed the threshold every further award reaches 100
//! again, so each scoring update after that point levels up once.

use crate::types::{CascadeStep, LEVEL_THRESHOLD, STARTING_LEVEL};

/// Points for removing `count` cells
pub fn points_for_match(count: usize, points_per_tile: u32) -> u32 {
    (count as u32).saturating_mul(points_per_tile)
}

/// Progress percentage (0..=100) for a cumulative score
pub fn progress_for_score(score: u32) -> f64 {
    (score as f64 * 100.0 / LEVEL_THRESHOLD as f64).min(100.0)
}

/// Result of adding points to a session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreUpdate {
    pub points: u32,
    pub score: u32,
    /// Progress after the update (already reset to 0 on level up)
    pub progress: f64,
    pub level: u32,
    pub level_up: bool,
    pub new_high_score: bool,
}

/// Score, level and progress owned by the caller
///
/// Kept apart from the board so several engines (or tests) never share
/// bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    score: u32,
    level: u32,
    progress: f64,
    high_score: u32,
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_high_score(0)
    }

    /// Start a session remembering a previously stored high score
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            score: 0,
            level: STARTING_LEVEL,
            progress: 0.0,
            high_score,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Floored percentage, as shown next to the progress ring
    pub fn progress_percent(&self) -> u32 {
        self.progress.floor() as u32
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Add points and recompute progress and level
    pub fn apply_points(&mut self, points: u32) -> ScoreUpdate {
        self.score = self.score.saturating_add(points);

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }

        self.progress = progress_for_score(self.score);
        let level_up = self.progress >= 100.0;
        if level_up {
            self.level += 1;
            self.progress = 0.0;
        }

        ScoreUpdate {
            points,
            score: self.score,
            progress: self.progress,
            level: self.level,
            level_up,
            new_high_score,
        }
    }

    /// Apply one cascade round
    pub fn apply_step(&mut self, step: &CascadeStep) -> ScoreUpdate {
        self.apply_points(step.points)
    }

    /// Reset score, level and progress; the high score survives
    pub fn restart(&mut self) {
        *self = Self::with_high_score(self.high_score);
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::POINTS_PER_TILE;

    #[test]
    fn test_match_points() {
        assert_eq!(points_for_match(3, POINTS_PER_TILE), 30);
        assert_eq!(points_for_match(5, POINTS_PER_TILE), 50);
        assert_eq!(points_for_match(0, POINTS_PER_TILE), 0);
        assert_eq!(points_for_match(4, 25), 100);
    }

    #[test]
    fn test_progress_formula() {
        assert_eq!(progress_for_score(0), 0.0);
        assert_eq!(progress_for_score(250), 50.0);
        assert_eq!(progress_for_score(30), 6.0);
        assert_eq!(progress_for_score(500), 100.0);
        assert_eq!(progress_for_score(900), 100.0);
    }

    #[test]
    fn test_session_starts_at_level_one() {
        let session = GameSession::new();
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn test_level_up_once_on_crossing() {
        let mut session = GameSession::new();

        let update = session.apply_points(490);
        assert!(!update.level_up);
        assert_eq!(session.progress_percent(), 98);

        let update = session.apply_points(30);
        assert!(update.level_up);
        assert_eq!(update.level, 2);
        assert_eq!(update.progress, 0.0);
        assert_eq!(session.level(), 2);
    }

    #[test]
    fn test_cumulative_formula_keeps_levelling_past_threshold() {
        let mut session = GameSession::new();
        session.apply_points(500);
        assert_eq!(session.level(), 2);

        // Cumulative score stays above 500, so the next award is 100% again.
        let update = session.apply_points(30);
        assert!(update.level_up);
        assert_eq!(session.level(), 3);
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn test_high_score_tracking() {
        let mut session = GameSession::with_high_score(100);
        assert!(!session.apply_points(60).new_high_score);
        assert!(session.apply_points(60).new_high_score);
        assert_eq!(session.high_score(), 120);

        session.restart();
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.high_score(), 120);
    }

    #[test]
    fn test_apply_step_uses_step_points() {
        let mut session = GameSession::new();
        let step = CascadeStep {
            removed: vec![0, 1, 2],
            points: 30,
            combo: None,
            changes: Vec::new(),
        };
        let update = session.apply_step(&step);
        assert_eq!(update.points, 30);
        assert_eq!(session.score(), 30);
    }
}
