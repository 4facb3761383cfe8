//! Otee - A tile-based endless runner
//!
//! Core modules:
//! - `sim`: Deterministic rule engine (movement, effects, lives, phases)
//! - `tuning`: Data-driven level configuration
//! - `highscores`: Score bookkeeping and the persisted high score
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `platform`: Input and clock abstraction
//! - `runner`: Fixed-timestep driver used by the hosts

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScorePolicy, ScoreKeeper};
pub use persistence::{MemoryStore, PersistentStore};
pub use runner::Runner;
pub use settings::Settings;
pub use tuning::{ConfigError, LevelConfig};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Hero speeds (pixels/s)
    pub const HERO_SPEED_DEFAULT: f32 = 180.0;
    pub const HERO_SPEED_FAST: f32 = 250.0;
    pub const HERO_SPEED_SLOW: f32 = 70.0;

    /// Hero sprite size (square, pixels)
    pub const HERO_SIZE: f32 = 16.0;
    /// Hero spawn point on the first map
    pub const HERO_START_X: f32 = 196.0;
    pub const HERO_START_Y: f32 = 55.0;
    pub const INITIAL_LIVES: u32 = 3;

    /// Map tile size (pixels)
    pub const TILE_SIZE: f32 = 45.0;
    /// Visible height of the play field
    pub const VIEW_HEIGHT: f32 = 640.0;

    /// Camera starts scrolling once the hero passes this y
    pub const CAMERA_TRIGGER_Y: f32 = 250.0;
    /// Camera scroll per tick once triggered (pixels)
    pub const GAME_SPEED: f32 = 1.0;

    /// Seconds a speed modifier stays active
    pub const MODIFIER_DURATION_SECS: f32 = 3.0;
    /// Hero must be this far below its spawn before scoring starts
    pub const SCORE_EPSILON: f32 = 5.0;

    /// Patrol enemy speed at level start and after a reset (pixels/s)
    pub const ENEMY_SPEED: f32 = 50.0;
    pub const ENEMY_RESPAWN_SPEED: f32 = 40.0;
    /// Follower lag behind the hero's velocity
    pub const FOLLOWER_OFFSET: f32 = 20.0;

    /// Floating text lifespans (ms)
    pub const PICKUP_TEXT_MS: u32 = 400;
    pub const BANNER_TEXT_MS: u32 = 1000;

    /// Camera shake on life loss
    pub const SHAKE_INTENSITY: f32 = 0.01;
    pub const SHAKE_DURATION_MS: u32 = 500;
}

/// Format elapsed play time as `<m>m <s>.<d>s`, minutes omitted when zero
///
/// The tenths digit rounds up and is capped at 9 so `3.95s` reads `3.9s`.
pub fn format_elapsed(ms: u64) -> String {
    let mins = ms / 60_000;
    let secs = (ms / 1000) % 60;
    let millis = ms % 1000;
    let tenths = millis.div_ceil(100).min(9);
    if mins > 0 {
        format!("{}m {}.{}s", mins, secs, tenths)
    } else {
        format!("{}.{}s", secs, tenths)
    }
}
