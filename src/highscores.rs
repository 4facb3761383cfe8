//! Score bookkeeping and the persisted high score
//!
//! Score is distance travelled down the map plus collected bonuses. The high
//! score is one numeric slot per level in a [`PersistentStore`], read for
//! the HUD and read-then-written once per game over.

use serde::{Deserialize, Serialize};

use crate::persistence::PersistentStore;

/// When a finished run replaces the stored high score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HighScorePolicy {
    /// Ties replace the stored value
    #[default]
    AtLeast,
    /// Only strictly better scores replace it
    Strictly,
}

impl HighScorePolicy {
    /// Whether `score` should replace `stored`
    pub fn improves(&self, score: u64, stored: u64) -> bool {
        match self {
            HighScorePolicy::AtLeast => score >= stored,
            HighScorePolicy::Strictly => score > stored,
        }
    }
}

/// Score, bonus and high score for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreKeeper {
    /// Current score
    pub score: u64,
    /// Bonus points collected this run
    pub bonus_points: u64,
    /// Last known high score (for display)
    pub high_score: u64,
    key: String,
    policy: HighScorePolicy,
    epsilon: f32,
}

impl ScoreKeeper {
    pub fn new(key: impl Into<String>, policy: HighScorePolicy, epsilon: f32) -> Self {
        Self {
            score: 0,
            bonus_points: 0,
            high_score: 0,
            key: key.into(),
            policy,
            epsilon,
        }
    }

    /// Parse the stored high score; malformed values count as absent
    fn read_stored(&self, store: &dyn PersistentStore) -> Option<u64> {
        let raw = store.get(&self.key)?;
        match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring malformed high score '{}' under '{}'", raw, self.key);
                None
            }
        }
    }

    /// Refresh the displayed high score from the store
    pub fn load_high_score(&mut self, store: &dyn PersistentStore) -> u64 {
        self.high_score = self.read_stored(store).unwrap_or(0);
        self.high_score
    }

    /// Add collected bonus points
    pub fn add_bonus(&mut self, points: u64) {
        self.bonus_points += points;
    }

    /// Recompute the score: `floor(current_y - start_y) + bonus_points`
    pub fn update(&mut self, current_y: f32, start_y: f32, bonus_points: u64) -> u64 {
        let distance = (current_y - start_y).floor().max(0.0) as u64;
        self.score = distance + bonus_points;
        self.score
    }

    /// Whether the hero is far enough past its spawn point to score
    pub fn in_scoring_range(&self, hero_y: f32, spawn_y: f32) -> bool {
        hero_y >= spawn_y + self.epsilon
    }

    /// Score the hero's position if it has left the spawn area
    ///
    /// `spawn_y` is the current respawn point (moves with checkpoints),
    /// `origin_y` the level's absolute start that distance is measured from.
    pub fn update_from_position(
        &mut self,
        hero_y: f32,
        spawn_y: f32,
        origin_y: f32,
    ) -> Option<u64> {
        if !self.in_scoring_range(hero_y, spawn_y) {
            return None;
        }
        Some(self.update(hero_y, origin_y, self.bonus_points))
    }

    /// Finish a run: persist `score` if it beats the stored value
    ///
    /// Returns the high score to show in the run summary.
    pub fn record_attempt_end(&mut self, score: u64, store: &mut dyn PersistentStore) -> u64 {
        let high = match self.read_stored(store) {
            Some(stored) if !self.policy.improves(score, stored) => stored,
            previous => {
                store.set(&self.key, &score.to_string());
                log::info!(
                    "High score '{}' set to {} (was {:?})",
                    self.key,
                    score,
                    previous
                );
                score
            }
        };
        self.high_score = high;
        high
    }

    /// Zero the run's score and bonus (high score is kept)
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.bonus_points = 0;
    }
}
