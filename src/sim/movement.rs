//! Hero and enemy movement intents
//!
//! The physics collaborator integrates bodies; this module only decides the
//! velocity each body should have.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameRules;
use crate::consts::FOLLOWER_OFFSET;
use crate::platform::{InputSource, Key};

/// Hero heading (screen space: `Down` is +y, forward through the level)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector for this heading
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    fn key(&self) -> Key {
        match self {
            Direction::Up => Key::Up,
            Direction::Down => Key::Down,
            Direction::Left => Key::Left,
            Direction::Right => Key::Right,
        }
    }
}

/// Priority order when several arrows are held
const DIRECTION_PRIORITY: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Read the held direction, first match in Left, Right, Up, Down order
pub fn sample_direction(input: &impl InputSource) -> Option<Direction> {
    DIRECTION_PRIORITY
        .into_iter()
        .find(|dir| input.is_pressed(dir.key()))
}

/// Velocity for a heading under the current rules
///
/// Reverse flips the sign on the same axis; magnitude is always
/// `current_speed`.
pub fn compute_velocity(direction: Direction, rules: &GameRules) -> Vec2 {
    let sign = if rules.reverse_active { -1.0 } else { 1.0 };
    direction.unit() * rules.current_speed * sign
}

/// Apply a sampled direction to the hero's heading
///
/// Returns true when the heading changed. A change clears reverse.
pub fn steer(
    current: &mut Option<Direction>,
    pressed: Option<Direction>,
    rules: &mut GameRules,
) -> bool {
    match pressed {
        Some(dir) if *current != Some(dir) => {
            *current = Some(dir);
            rules.reverse_active = false;
            true
        }
        _ => false,
    }
}

/// Enemy behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Shadows the hero horizontally
    Follower,
    /// Bounces between walls, starting leftward
    PatrolLeft,
    /// Bounces between walls, starting rightward
    PatrolRight,
}

impl EnemyKind {
    /// Level object name -> enemy kind
    pub fn from_object_name(name: &str) -> Option<Self> {
        match name {
            "badguy" => Some(EnemyKind::Follower),
            "badguy_ltr" => Some(EnemyKind::PatrolLeft),
            "badguy_rtl" => Some(EnemyKind::PatrolRight),
            _ => None,
        }
    }

    /// Initial x-velocity for a patrol at `speed`; followers start still
    pub fn patrol_velocity_x(&self, speed: f32) -> f32 {
        match self {
            EnemyKind::Follower => 0.0,
            EnemyKind::PatrolLeft => -speed,
            EnemyKind::PatrolRight => speed,
        }
    }
}

/// Follower x-velocity while the hero moves sideways
///
/// Not pathing: a linear mirror of the hero's x and velocity with a fixed
/// lag. `None` when the hero moves vertically.
pub fn follower_velocity_x(direction: Direction, hero_x: f32, hero_vx: f32) -> Option<f32> {
    match direction {
        Direction::Left => Some(hero_x + (hero_vx - FOLLOWER_OFFSET)),
        Direction::Right => Some(hero_x - (hero_vx - FOLLOWER_OFFSET)),
        Direction::Up | Direction::Down => None,
    }
}
