//! Data-driven level configuration
//!
//! Every level variant is the same engine with different numbers: speeds,
//! lives, the effect table mapping tiles/objects to effects, and a couple of
//! behaviour flags. Levels load from JSON; `Default` is the first map.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::highscores::HighScorePolicy;

/// What touching a tile or object does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectKind {
    /// Adds bonus points and disappears
    Bonus { points: u32 },
    /// Adds a life and disappears
    ExtraLife,
    /// Starts a speed-up modifier
    SpeedUp,
    /// Starts a slow-down modifier
    SlowDown,
    /// Inverts controls until the next direction change
    Reverse,
    /// Moves the respawn point here
    Checkpoint,
    /// Costs a life
    Obstacle,
    /// Passable decoration (tunnels); dims when crossed
    Passage,
}

/// Lookup from collaborator ids to effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectTable {
    /// Tile index -> effect
    pub tiles: BTreeMap<u32, EffectKind>,
    /// Object type name -> effect
    pub objects: BTreeMap<String, EffectKind>,
}

impl Default for EffectTable {
    fn default() -> Self {
        let tiles = BTreeMap::from([
            (1, EffectKind::Obstacle),
            (2, EffectKind::Passage),
            (3, EffectKind::Reverse),
            (4, EffectKind::Checkpoint),
        ]);
        let objects = [
            ("bonus1", EffectKind::Bonus { points: 50 }),
            ("bonus2", EffectKind::Bonus { points: 100 }),
            ("1up", EffectKind::ExtraLife),
            ("fast", EffectKind::SpeedUp),
            ("slow", EffectKind::SlowDown),
            ("smallWall", EffectKind::Obstacle),
            ("badguy", EffectKind::Obstacle),
            ("badguy_ltr", EffectKind::Obstacle),
            ("badguy_rtl", EffectKind::Obstacle),
        ]
        .into_iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect();
        Self { tiles, objects }
    }
}

/// Errors raised while loading a level
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("level config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level config field `{field}` is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Static per-level tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Level name (for logs)
    pub name: String,
    /// Absolute hero spawn point
    pub hero_start: Vec2,
    /// Hero sprite size (pixels)
    pub hero_size: f32,
    /// Lives at the start of a run
    pub initial_lives: u32,
    /// Visible play field height (pixels)
    pub view_height: f32,
    /// Map tile edge (pixels); checkpoint spawns centre the hero in it
    pub tile_size: f32,

    // === Speeds (pixels/s) ===
    pub base_speed: f32,
    pub fast_speed: f32,
    pub slow_speed: f32,
    /// How long a speed modifier lasts (seconds)
    pub modifier_duration_secs: f32,

    // === Camera ===
    /// Camera scrolls once the hero's y reaches this
    pub camera_trigger_y: f32,
    /// Camera scroll per tick (pixels)
    pub game_speed: f32,

    // === Scoring ===
    /// Distance below the spawn point before scoring starts
    pub score_epsilon: f32,
    /// Number of bonus/1up pickups on the map
    pub collectible_count: u32,
    pub high_score_policy: HighScorePolicy,
    /// Store key for this level's high score slot
    pub high_score_key: String,

    // === Enemies (pixels/s) ===
    pub enemy_speed: f32,
    pub enemy_respawn_speed: f32,

    /// Effect lookup
    pub effects: EffectTable,

    /// After a non-final respawn, wait for Start instead of resuming
    pub show_start_prompt_on_respawn: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: "otee-map-1".to_string(),
            hero_start: Vec2::new(HERO_START_X, HERO_START_Y),
            hero_size: HERO_SIZE,
            initial_lives: INITIAL_LIVES,
            view_height: VIEW_HEIGHT,
            tile_size: TILE_SIZE,

            base_speed: HERO_SPEED_DEFAULT,
            fast_speed: HERO_SPEED_FAST,
            slow_speed: HERO_SPEED_SLOW,
            modifier_duration_secs: MODIFIER_DURATION_SECS,

            camera_trigger_y: CAMERA_TRIGGER_Y,
            game_speed: GAME_SPEED,

            score_epsilon: SCORE_EPSILON,
            collectible_count: 0,
            high_score_policy: HighScorePolicy::default(),
            high_score_key: "highScore".to_string(),

            enemy_speed: ENEMY_SPEED,
            enemy_respawn_speed: ENEMY_RESPAWN_SPEED,

            effects: EffectTable::default(),

            show_start_prompt_on_respawn: true,
        }
    }
}

impl LevelConfig {
    /// Parse and validate a level from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::info!("Loaded level config '{}'", config.name);
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tunables the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("base_speed", self.base_speed),
            ("fast_speed", self.fast_speed),
            ("slow_speed", self.slow_speed),
            ("modifier_duration_secs", self.modifier_duration_secs),
            ("hero_size", self.hero_size),
            ("view_height", self.view_height),
            ("tile_size", self.tile_size),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }

        let non_negative = [
            ("game_speed", self.game_speed),
            ("score_epsilon", self.score_epsilon),
            ("enemy_speed", self.enemy_speed),
            ("enemy_respawn_speed", self.enemy_respawn_speed),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be zero or more, got {}", value),
                });
            }
        }

        if self.initial_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "initial_lives",
                reason: "a run needs at least one life".to_string(),
            });
        }
        if !self.hero_start.is_finite() {
            return Err(ConfigError::Invalid {
                field: "hero_start",
                reason: "must be a finite position".to_string(),
            });
        }
        if self.high_score_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "high_score_key",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LevelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = LevelConfig::from_json(r#"{ "name": "map-2", "initial_lives": 5 }"#).unwrap();
        assert_eq!(config.name, "map-2");
        assert_eq!(config.initial_lives, 5);
        assert_eq!(config.base_speed, HERO_SPEED_DEFAULT);
        assert_eq!(config.effects, EffectTable::default());
    }

    #[test]
    fn test_effect_table_from_json() {
        let json = r#"{
            "effects": {
                "tiles": { "7": { "kind": "obstacle" } },
                "objects": { "gem": { "kind": "bonus", "points": 250 } }
            }
        }"#;
        let config = LevelConfig::from_json(json).unwrap();
        assert_eq!(config.effects.tiles.get(&7), Some(&EffectKind::Obstacle));
        assert_eq!(
            config.effects.objects.get("gem"),
            Some(&EffectKind::Bonus { points: 250 })
        );
        assert!(config.effects.objects.get("bonus1").is_none());
    }

    #[test]
    fn test_rejects_zero_lives() {
        let err = LevelConfig::from_json(r#"{ "initial_lives": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "initial_lives", .. }));
    }

    #[test]
    fn test_rejects_negative_speed() {
        let err = LevelConfig::from_json(r#"{ "slow_speed": -10.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "slow_speed", .. }));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = LevelConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = LevelConfig {
            show_start_prompt_on_respawn: false,
            ..LevelConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(LevelConfig::from_json(&json).unwrap(), config);
    }
}
