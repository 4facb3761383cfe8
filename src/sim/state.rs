//! Game state and core simulation types
//!
//! Everything the rule engine mutates during a run lives here. The
//! renderer never reads internals directly; it consumes [`GameEvent`]s and
//! the [`Hud`] projection.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::modifier::{ModifierKind, ModifierTimer};
use super::movement::{Direction, EnemyKind};
use super::touched::{ItemRef, TouchedItemTracker};
use crate::highscores::ScoreKeeper;
use crate::tuning::LevelConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-run: hero entering or waiting for Start
    Menu,
    /// Active gameplay
    Playing,
    /// Respawning at the last checkpoint after a life loss
    Checkpoint,
    /// Hit something, lives remain; waiting for Confirm
    LifeLost,
    /// Out of lives; waiting for Confirm
    GameOver,
}

/// Runtime speed and control rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    pub base_speed: f32,
    pub fast_speed: f32,
    pub slow_speed: f32,
    /// Speed applied to the hero this tick
    pub current_speed: f32,
    pub camera_trigger_y: f32,
    /// Camera scroll per tick
    pub game_speed: f32,
    /// Controls inverted
    pub reverse_active: bool,
    pub modifier_duration_secs: f32,
}

impl GameRules {
    pub fn from_config(config: &LevelConfig) -> Self {
        Self {
            base_speed: config.base_speed,
            fast_speed: config.fast_speed,
            slow_speed: config.slow_speed,
            current_speed: config.base_speed,
            camera_trigger_y: config.camera_trigger_y,
            game_speed: config.game_speed,
            reverse_active: false,
            modifier_duration_secs: config.modifier_duration_secs,
        }
    }

    /// Speed a modifier of this kind applies
    pub fn speed_for(&self, kind: ModifierKind) -> f32 {
        match kind {
            ModifierKind::SpeedUp => self.fast_speed,
            ModifierKind::SlowDown => self.slow_speed,
        }
    }

    pub fn restore_default_speed(&mut self) {
        self.current_speed = self.base_speed;
    }
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// Top-left corner (pixels, y grows down the map)
    pub position: Vec2,
    /// Respawn point (level start or last checkpoint)
    pub start_position: Vec2,
    pub velocity: Vec2,
    pub lives: u32,
    /// Respawn animation finished
    pub in_position: bool,
    /// `None` while frozen after a life loss
    pub direction: Option<Direction>,
    pub size: f32,
}

impl Hero {
    pub fn new(start: Vec2, lives: u32, size: f32) -> Self {
        Self {
            position: start,
            start_position: start,
            velocity: Vec2::ZERO,
            lives,
            in_position: false,
            direction: Some(Direction::Down),
            size,
        }
    }

    /// Where floating text above the hero is anchored
    pub fn text_anchor(&self) -> Vec2 {
        self.position + Vec2::new(self.size / 2.0, -10.0)
    }
}

/// An enemy whose body is simulated by the physics collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Last x-velocity intent sent to the physics engine
    pub velocity_x: f32,
}

/// Overlay prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    /// "SPACEBAR TO START"
    Start,
    /// "ENTER TO RESET"
    Reset,
}

impl Prompt {
    pub fn text(&self) -> &'static str {
        match self {
            Prompt::Start => "SPACEBAR TO START",
            Prompt::Reset => "ENTER TO RESET",
        }
    }
}

/// How a touched item should look until it is reset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TouchVisual {
    /// Leave as is
    Keep,
    /// Fade to this alpha
    Dim(f32),
    /// Hide (kill the sprite)
    Remove,
}

/// End-of-run summary shown on the game over panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub high_score: u64,
    pub elapsed_ms: u64,
    /// `elapsed_ms` formatted for display
    pub elapsed_text: String,
    pub items_collected: u32,
    pub items_total: u32,
}

impl RunSummary {
    /// "3/12", or just "3" when the level does not declare a total
    pub fn items_text(&self) -> String {
        if self.items_total == 0 {
            self.items_collected.to_string()
        } else {
            format!("{}/{}", self.items_collected, self.items_total)
        }
    }
}

/// Declarative commands for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Floating text that disappears after `lifespan_ms`
    ShowText {
        text: String,
        lifespan_ms: u32,
        at: Vec2,
    },
    /// Modifier banner ("SPEED UP" / "SLOW DOWN")
    ShowNotification { kind: ModifierKind, text: String },
    /// Countdown for the active modifier ("Slowed for: 3s")
    ModifierCountdown { kind: ModifierKind, text: String },
    RemoveNotification,
    ShakeCamera { intensity: f32, duration_ms: u32 },
    ScrollCamera { y: f32 },
    /// Hero position at a turn, for the trail
    TrailSample { at: Vec2 },
    ShowPrompt(Prompt),
    HidePrompt,
    ItemTouched { item: ItemRef, visual: TouchVisual },
    /// Restore these items to their untouched look
    ItemsRestored(Vec<ItemRef>),
    /// Play the hero's entry animation; report completion via `TickInput`
    RespawnHero { at: Vec2 },
    /// New x-velocity for an enemy body
    EnemyVelocity { id: u32, velocity_x: f32 },
    /// Move an enemy body back to x and stop it
    EnemyReset { id: u32, x: f32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
    RunSummary(RunSummary),
}

/// Numbers for the score panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub high_score: u64,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: LevelConfig,
    pub phase: GamePhase,
    pub rules: GameRules,
    pub hero: Hero,
    pub camera: Camera,
    pub modifier: ModifierTimer,
    pub touched: TouchedItemTracker,
    pub scores: ScoreKeeper,
    pub enemies: Vec<Enemy>,
    /// Play time of the current run (ms, paused outside Playing)
    pub play_time_ms: f64,
    /// Pickups collected this run
    pub items_collected: u32,
    /// Present while in GameOver
    pub summary: Option<RunSummary>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Renderer commands produced since the last drain
    events: Vec<GameEvent>,
    next_enemy_id: u32,
}

impl GameState {
    /// Create a level in the Menu phase with the hero entry animation queued
    pub fn new(config: LevelConfig) -> Self {
        let hero = Hero::new(config.hero_start, config.initial_lives, config.hero_size);
        let start = hero.start_position;
        let mut state = Self {
            phase: GamePhase::Menu,
            rules: GameRules::from_config(&config),
            hero,
            camera: Camera::new(config.view_height),
            modifier: ModifierTimer::default(),
            touched: TouchedItemTracker::default(),
            scores: ScoreKeeper::new(
                config.high_score_key.clone(),
                config.high_score_policy,
                config.score_epsilon,
            ),
            enemies: Vec::new(),
            play_time_ms: 0.0,
            items_collected: 0,
            summary: None,
            time_ticks: 0,
            events: Vec::new(),
            next_enemy_id: 1,
            config,
        };
        state.push(GameEvent::RespawnHero { at: start });
        state
    }

    /// Register an enemy body placed by the level loader
    pub fn spawn_enemy(&mut self, kind: EnemyKind) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        let velocity_x = kind.patrol_velocity_x(self.config.enemy_speed);
        self.enemies.push(Enemy {
            id,
            kind,
            velocity_x,
        });
        self.push(GameEvent::EnemyVelocity { id, velocity_x });
        id
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending renderer commands (oldest first)
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending renderer commands
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switch phase, announcing the change
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.push(GameEvent::PhaseChanged { from, to });
    }

    pub fn show_text(&mut self, text: impl Into<String>, lifespan_ms: u32) {
        let at = self.hero.text_anchor();
        self.push(GameEvent::ShowText {
            text: text.into(),
            lifespan_ms,
            at,
        });
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.scores.score,
            lives: self.hero.lives,
            high_score: self.scores.high_score,
        }
    }
}
