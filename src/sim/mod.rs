//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Input, contacts and animation completion arrive through `TickInput`
//! - Renderer commands leave through `GameEvent`
//! - No rendering or platform dependencies

pub mod camera;
pub mod effects;
pub mod modifier;
pub mod movement;
pub mod state;
pub mod tick;
pub mod touched;

pub use camera::{Camera, should_scroll};
pub use effects::{EffectDescriptor, ItemId, classify};
pub use modifier::{ModifierKind, ModifierTimer};
pub use movement::{Direction, EnemyKind, compute_velocity, follower_velocity_x};
pub use state::{
    GameEvent, GamePhase, GameRules, GameState, Hero, Hud, Prompt, RunSummary, TouchVisual,
};
pub use tick::{Contact, ContactTarget, EntityId, TickInput, tick};
pub use touched::{ItemRef, TouchCategory, TouchedItemTracker};
