//! Timed speed modifiers
//!
//! One modifier at a time. While active it owns `GameRules::current_speed`;
//! on expiry the base speed comes back exactly once.

use serde::{Deserialize, Serialize};

use super::state::GameRules;

/// Modifier types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierKind {
    SpeedUp,
    SlowDown,
}

impl ModifierKind {
    /// Banner shown when the modifier starts
    pub fn notification_text(&self) -> &'static str {
        match self {
            ModifierKind::SpeedUp => "SPEED UP",
            ModifierKind::SlowDown => "SLOW DOWN",
        }
    }

    fn countdown_label(&self) -> &'static str {
        match self {
            ModifierKind::SpeedUp => "Boosted for",
            ModifierKind::SlowDown => "Slowed for",
        }
    }
}

/// Result of advancing the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierTick {
    /// No modifier running
    Idle,
    /// Still running
    Running,
    /// Ran out this tick; base speed restored
    Expired(ModifierKind),
}

/// Single-slot modifier timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierTimer {
    active: bool,
    kind: ModifierKind,
    /// Seconds left
    remaining: f32,
    /// Speed applied while active
    magnitude: f32,
}

impl Default for ModifierTimer {
    fn default() -> Self {
        Self {
            active: false,
            kind: ModifierKind::SpeedUp,
            remaining: 0.0,
            magnitude: 0.0,
        }
    }
}

impl ModifierTimer {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Kind of the running modifier
    pub fn active_kind(&self) -> Option<ModifierKind> {
        self.active.then_some(self.kind)
    }

    /// Start a modifier and apply its speed
    ///
    /// Rejected (returns false, nothing changes) while another is active.
    pub fn start(
        &mut self,
        kind: ModifierKind,
        magnitude: f32,
        duration_secs: f32,
        rules: &mut GameRules,
    ) -> bool {
        if self.active {
            log::debug!(
                "Ignoring {:?}: {:?} still active for {:.2}s",
                kind,
                self.kind,
                self.remaining
            );
            return false;
        }
        self.active = true;
        self.kind = kind;
        self.remaining = duration_secs;
        self.magnitude = magnitude;
        rules.current_speed = magnitude;
        true
    }

    /// Count down; restores base speed on the tick the timer runs out
    pub fn tick(&mut self, dt: f32, rules: &mut GameRules) -> ModifierTick {
        if !self.active {
            return ModifierTick::Idle;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.active = false;
            self.remaining = 0.0;
            rules.restore_default_speed();
            return ModifierTick::Expired(self.kind);
        }
        ModifierTick::Running
    }

    /// Stop without restoring speed; returns true if one was running
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.remaining = 0.0;
        was_active
    }

    /// Whole seconds left, rounded up (for the countdown display)
    pub fn countdown_secs(&self) -> Option<u32> {
        self.active.then(|| self.remaining.ceil() as u32)
    }

    /// "Slowed for: 3s" / "Boosted for: 3s"
    pub fn countdown_text(&self) -> Option<String> {
        self.countdown_secs()
            .map(|secs| format!("{}: {}s", self.kind.countdown_label(), secs))
    }
}
